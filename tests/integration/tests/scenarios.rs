//! Reconciliation scenarios
//!
//! Each scenario drives the real services over the fake guild and in-memory
//! stores and asserts on the platform calls and the stored history.
//!
//! Run with: cargo test -p integration-tests --test scenarios

use std::sync::Arc;

use herald_core::{ActivityComposition, ActivityFilter, StreamProbe};
use herald_service::MemberOutcome;
use integration_tests::{
    fixtures::*, scripted, HarnessOptions, TestHarness,
};

// ============================================================================
// Scenario A: no link
// ============================================================================

#[tokio::test]
async fn test_unlinked_member_is_never_touched() {
    let id = unique_member_id();
    let (h, probe) = scripted(FakeGuild::new().with_member(nicknamed(id, "alex", "Alex")));
    probe.go_live("alex");

    let outcome = h
        .reconciler()
        .handle_presence(id, [TRACKED_GAME])
        .await
        .unwrap();
    assert!(outcome.is_none());

    let outcome = h.reconciler().reconcile_member(id).await.unwrap();
    assert_eq!(outcome, MemberOutcome::NotLinked);

    let report = h.reconciler().run_pass().await.unwrap();
    assert_eq!(report.members, 0);
    assert!(h.guild.calls().is_empty());
}

// ============================================================================
// Scenarios B, C, D: decorate, converge, restore
// ============================================================================

#[tokio::test]
async fn test_stream_lifecycle() {
    let id = unique_member_id();
    let (h, probe) = scripted(FakeGuild::new().with_member(nicknamed(id, "alex", "Alex")));
    h.seed_link(id, "alex").await;

    // B: goes live
    probe.go_live("alex");
    h.reconciler().run_pass().await.unwrap();
    assert_eq!(
        h.guild.calls(),
        vec![
            GuildCall::AddRole(id, STREAM_ROLE),
            GuildCall::SetNickname(id, Some("🔴 Alex".to_string())),
        ]
    );
    assert_eq!(h.saved_nickname(id).await, Some(Some("Alex".to_string())));

    // C: still live, nothing to do
    h.guild.clear_calls();
    let report = h.reconciler().run_pass().await.unwrap();
    assert_eq!(report.live, 1);
    assert_eq!(report.actions_applied, 0);
    assert!(h.guild.calls().is_empty());

    // D: goes offline
    probe.go_offline("alex");
    h.reconciler().run_pass().await.unwrap();
    assert_eq!(
        h.guild.calls(),
        vec![
            GuildCall::RemoveRole(id, STREAM_ROLE),
            GuildCall::SetNickname(id, Some("Alex".to_string())),
        ]
    );
    assert_eq!(h.saved_nickname(id).await, None);

    let member = h.guild.member(id);
    assert_eq!(member.nickname.as_deref(), Some("Alex"));
    assert!(!member.has_role(STREAM_ROLE));
}

// ============================================================================
// Scenario E: orphaned decoration
// ============================================================================

#[tokio::test]
async fn test_orphaned_decoration_is_stripped_without_history() {
    let id = unique_member_id();
    let (h, probe) = scripted(FakeGuild::new().with_member(nicknamed(id, "alex", "🔴 Alex")));
    h.seed_link(id, "alex").await;
    probe.go_offline("alex");

    h.reconciler().run_pass().await.unwrap();

    assert_eq!(
        h.guild.calls(),
        vec![GuildCall::SetNickname(id, Some("Alex".to_string()))]
    );
    assert_eq!(h.saved_nickname(id).await, None);
}

#[tokio::test]
async fn test_double_decoration_is_repaired() {
    let id = unique_member_id();
    let (h, probe) = scripted(FakeGuild::new().with_member(nicknamed(id, "alex", "🔴 🔴 Alex")));
    h.seed_link(id, "alex").await;
    probe.go_offline("alex");

    h.reconciler().run_pass().await.unwrap();
    assert_eq!(h.guild.member(id).nickname.as_deref(), Some("Alex"));
}

// ============================================================================
// Scenario F: activity push while the live status is unknown
// ============================================================================

#[tokio::test]
async fn test_presence_grants_activity_role_with_unknown_live_status() {
    let id = unique_member_id();
    let (h, probe) = scripted(
        FakeGuild::new().with_member(nicknamed(id, "alex", "🔴 Alex").with_role(STREAM_ROLE)),
    );
    h.seed_link(id, "alex").await;
    h.seed_history(id, Some("Alex")).await;
    probe.go_dark("alex");

    let outcome = h
        .reconciler()
        .handle_presence(id, ["Star Citizen - Alpha 4.0"])
        .await
        .unwrap();

    assert!(matches!(outcome, Some(MemberOutcome::Reconciled { .. })));
    assert_eq!(h.guild.calls(), vec![GuildCall::AddRole(id, GAME_ROLE)]);
    assert_eq!(h.guild.member(id).nickname.as_deref(), Some("🔴 Alex"));
    assert_eq!(h.saved_nickname(id).await, Some(Some("Alex".to_string())));
}

#[tokio::test]
async fn test_activity_role_follows_presence() {
    let id = unique_member_id();
    let (h, _probe) = scripted(FakeGuild::new().with_member(member(id, "alex")));
    h.seed_link(id, "alex").await;

    // Before any presence is seen the activity axis is left alone
    h.reconciler().run_pass().await.unwrap();
    assert!(h.guild.calls().is_empty());

    h.reconciler()
        .handle_presence(id, ["star citizen"])
        .await
        .unwrap();
    assert!(h.guild.member(id).has_role(GAME_ROLE));

    // Same status again: no reconciliation
    h.guild.clear_calls();
    let outcome = h
        .reconciler()
        .handle_presence(id, ["Star Citizen"])
        .await
        .unwrap();
    assert!(outcome.is_none());
    assert!(h.guild.calls().is_empty());

    h.reconciler()
        .handle_presence(id, ["Elite Dangerous"])
        .await
        .unwrap();
    assert!(!h.guild.member(id).has_role(GAME_ROLE));
}

// ============================================================================
// Policies
// ============================================================================

#[tokio::test]
async fn test_category_filter_ignores_other_categories() {
    let id = unique_member_id();
    let probe = Arc::new(ScriptedProbe::new());
    let h = TestHarness::with_options(
        FakeGuild::new().with_member(member(id, "alex")),
        probe.clone(),
        HarnessOptions {
            filter: ActivityFilter::ExactCategoryMatch(TRACKED_GAME.to_string()),
            ..HarnessOptions::default()
        },
    );
    h.seed_link(id, "alex").await;

    probe.set("alex", live_in("alex", "Just Chatting"));
    let report = h.reconciler().run_pass().await.unwrap();
    assert_eq!(report.live, 0);
    assert!(h.guild.calls().is_empty());

    probe.set("alex", live_in("alex", "star citizen"));
    let report = h.reconciler().run_pass().await.unwrap();
    assert_eq!(report.live, 1);
    assert_eq!(h.guild.member(id).nickname.as_deref(), Some("🔴 alex"));
}

#[tokio::test]
async fn test_live_counts_as_active_when_configured() {
    let id = unique_member_id();
    let probe = Arc::new(ScriptedProbe::new());
    let h = TestHarness::with_options(
        FakeGuild::new().with_member(member(id, "alex")),
        probe.clone(),
        HarnessOptions {
            composition: ActivityComposition::PresenceOrLive,
            ..HarnessOptions::default()
        },
    );
    h.seed_link(id, "alex").await;
    probe.go_live("alex");

    h.reconciler().run_pass().await.unwrap();
    let member = h.guild.member(id);
    assert!(member.has_role(STREAM_ROLE));
    assert!(member.has_role(GAME_ROLE));
}

#[tokio::test]
async fn test_live_granted_activity_role_survives_twitch_outage() {
    let id = unique_member_id();
    let probe = Arc::new(ScriptedProbe::new());
    let h = TestHarness::with_options(
        FakeGuild::new().with_member(member(id, "alex")),
        probe.clone(),
        HarnessOptions {
            composition: ActivityComposition::PresenceOrLive,
            ..HarnessOptions::default()
        },
    );
    h.seed_link(id, "alex").await;
    probe.go_live("alex");

    // Playing something else: the role is held only because of the stream
    h.reconciler()
        .handle_presence(id, ["Elite Dangerous"])
        .await
        .unwrap();
    assert!(h.guild.member(id).has_role(GAME_ROLE));

    probe.go_dark("alex");
    h.guild.clear_calls();
    let report = h.reconciler().run_pass().await.unwrap();

    assert_eq!(report.unknown, 1);
    assert!(h.guild.calls().is_empty());
    let member = h.guild.member(id);
    assert!(member.has_role(STREAM_ROLE));
    assert!(member.has_role(GAME_ROLE));
}

// ============================================================================
// Pass bookkeeping
// ============================================================================

#[tokio::test]
async fn test_pass_report_counts_every_member() {
    let (live_id, dark_id, gone_id) = (unique_member_id(), unique_member_id(), unique_member_id());
    let (h, probe) = scripted(
        FakeGuild::new()
            .with_member(member(live_id, "live_one"))
            .with_member(member(dark_id, "dark_one")),
    );
    h.seed_link(live_id, "live_one").await;
    h.seed_link(dark_id, "dark_one").await;
    h.seed_link(gone_id, "gone_one").await;
    probe.go_live("live_one");
    probe.set("dark_one", StreamProbe::Unknown);

    let report = h.reconciler().run_pass().await.unwrap();

    assert_eq!(report.members, 3);
    assert_eq!(report.live, 1);
    assert_eq!(report.unknown, 1);
    assert_eq!(report.not_in_guild, 1);
    assert_eq!(report.actions_applied, 3);
    assert_eq!(report.actions_failed, 0);
    assert!(report.finished_at.is_some());
}

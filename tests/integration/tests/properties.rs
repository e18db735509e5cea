//! Reconciliation properties
//!
//! Idempotence, reversibility, unknown-safety, at most one history record per
//! member, and history consistency when platform edits fail.
//!
//! Run with: cargo test -p integration-tests --test properties

use herald_core::{Snowflake, StreamProbe};
use herald_service::ApplyOutcome;
use integration_tests::{fixtures::*, scripted, TestHarness};

fn pass_outcome(outcome: &herald_service::MemberOutcome) -> &herald_service::ExecutionReport {
    match outcome {
        herald_service::MemberOutcome::Reconciled { report, .. } => report,
        other => panic!("expected a reconciled member, got {other:?}"),
    }
}

async fn linked(
    snapshot: herald_core::MemberSnapshot,
) -> (TestHarness, std::sync::Arc<ScriptedProbe>, Snowflake) {
    let id = snapshot.member_id;
    let (h, probe) = scripted(FakeGuild::new().with_member(snapshot));
    h.seed_link(id, "alex").await;
    (h, probe, id)
}

// ============================================================================
// Idempotence
// ============================================================================

#[tokio::test]
async fn test_second_pass_is_a_no_op() {
    let starts = [
        (nicknamed(unique_member_id(), "alex", "Alex"), live("alex")),
        (nicknamed(unique_member_id(), "alex", "Alex"), StreamProbe::Offline),
        (nicknamed(unique_member_id(), "alex", "🔴 Alex"), StreamProbe::Offline),
        (member(unique_member_id(), "alex").with_role(STREAM_ROLE), live("alex")),
        (member(unique_member_id(), "alex").with_role(STREAM_ROLE), StreamProbe::Offline),
        (nicknamed(unique_member_id(), "alex", "Alex"), StreamProbe::Unknown),
    ];

    for (snapshot, answer) in starts {
        let (h, probe, id) = linked(snapshot).await;
        probe.set("alex", answer.clone());

        h.reconciler().reconcile_member(id).await.unwrap();
        h.guild.clear_calls();
        let outcome = h.reconciler().reconcile_member(id).await.unwrap();

        assert!(pass_outcome(&outcome).is_empty(), "not idempotent for {answer:?}");
        assert!(h.guild.calls().is_empty());
    }
}

// ============================================================================
// Reversibility
// ============================================================================

#[tokio::test]
async fn test_decorate_then_restore_returns_exact_nickname() {
    let originals = [
        None,
        Some("Alex"),
        Some("  spaced out  "),
        Some("Un pseudo vraiment très longgg"),
    ];

    for original in originals {
        let id = unique_member_id();
        let snapshot = match original {
            Some(nick) => nicknamed(id, "alex", nick),
            None => member(id, "alex"),
        };
        let (h, probe, _) = linked(snapshot).await;

        probe.go_live("alex");
        h.reconciler().reconcile_member(id).await.unwrap();
        let decorated = h.guild.member(id).nickname.unwrap();
        assert!(decorated.starts_with("🔴 "), "{decorated}");
        assert!(decorated.chars().count() <= 32);

        probe.go_offline("alex");
        h.reconciler().reconcile_member(id).await.unwrap();

        assert_eq!(h.guild.member(id).nickname.as_deref(), original);
        assert_eq!(h.saved_nickname(id).await, None);
    }
}

#[tokio::test]
async fn test_unlink_restores_exact_nickname() {
    let (h, probe, id) = linked(nicknamed(unique_member_id(), "alex", "Alex")).await;
    probe.go_live("alex");
    h.reconciler().reconcile_member(id).await.unwrap();
    h.reconciler().handle_presence(id, [TRACKED_GAME]).await.unwrap();

    let response = h.commands().unlink(id).await.unwrap();
    assert_eq!(response.twitch_username.as_deref(), Some("alex"));

    let member = h.guild.member(id);
    assert_eq!(member.nickname.as_deref(), Some("Alex"));
    assert!(member.role_ids.is_empty());
    assert_eq!(h.saved_nickname(id).await, None);

    // Unlinked members drop out of the timer pass entirely
    h.guild.clear_calls();
    let report = h.reconciler().run_pass().await.unwrap();
    assert_eq!(report.members, 0);
    assert!(h.guild.calls().is_empty());
}

// ============================================================================
// Unknown-safety
// ============================================================================

#[tokio::test]
async fn test_unknown_never_revokes_or_restores() {
    let (h, probe, id) = linked(
        nicknamed(unique_member_id(), "alex", "🔴 Alex")
            .with_role(STREAM_ROLE)
            .with_role(GAME_ROLE),
    )
    .await;
    h.seed_history(id, Some("Alex")).await;
    probe.go_dark("alex");

    for _ in 0..3 {
        h.reconciler().run_pass().await.unwrap();
    }

    assert!(h.guild.calls().is_empty());
    let member = h.guild.member(id);
    assert!(member.has_role(STREAM_ROLE));
    assert!(member.has_role(GAME_ROLE));
    assert_eq!(member.nickname.as_deref(), Some("🔴 Alex"));
    assert_eq!(h.saved_nickname(id).await, Some(Some("Alex".to_string())));
}

// ============================================================================
// At most one history record
// ============================================================================

#[tokio::test]
async fn test_concurrent_triggers_save_history_once() {
    let (h, probe, id) = linked(nicknamed(unique_member_id(), "alex", "Alex")).await;
    probe.go_live("alex");

    let reconciler = h.reconciler();
    let (first, second) = tokio::join!(
        reconciler.reconcile_member(id),
        reconciler.handle_presence(id, [TRACKED_GAME]),
    );
    first.unwrap();
    second.unwrap();

    let nickname_edits = h
        .guild
        .calls()
        .into_iter()
        .filter(|call| matches!(call, GuildCall::SetNickname(..)))
        .count();
    assert_eq!(nickname_edits, 1);
    assert_eq!(h.history.len(), 1);
    assert_eq!(h.saved_nickname(id).await, Some(Some("Alex".to_string())));
}

#[tokio::test]
async fn test_manual_rename_while_live_keeps_original_history() {
    let (h, probe, id) = linked(nicknamed(unique_member_id(), "alex", "Alex")).await;
    probe.go_live("alex");
    h.reconciler().reconcile_member(id).await.unwrap();

    // A moderator strips the marker mid-stream
    h.guild.rename(id, Some("Alex (mod)"));
    h.reconciler().reconcile_member(id).await.unwrap();

    assert_eq!(h.guild.member(id).nickname.as_deref(), Some("🔴 Alex"));
    assert_eq!(h.saved_nickname(id).await, Some(Some("Alex".to_string())));
}

// ============================================================================
// Permission failures
// ============================================================================

#[tokio::test]
async fn test_denied_nickname_edit_writes_no_history() {
    let (h, probe, id) = linked(nicknamed(unique_member_id(), "alex", "Alex")).await;
    h.guild.deny_nickname(true);
    probe.go_live("alex");

    let outcome = h.reconciler().reconcile_member(id).await.unwrap();
    let report = pass_outcome(&outcome);
    assert_eq!(report.count(ApplyOutcome::Applied), 1);
    assert_eq!(report.count(ApplyOutcome::PermissionDenied), 1);
    assert_eq!(report.count(ApplyOutcome::Skipped), 1);

    // The role axis still converged; the nickname and history did not move
    let member = h.guild.member(id);
    assert!(member.has_role(STREAM_ROLE));
    assert_eq!(member.nickname.as_deref(), Some("Alex"));
    assert_eq!(h.saved_nickname(id).await, None);

    // Once the bot is allowed again the next pass finishes the job
    h.guild.deny_nickname(false);
    h.reconciler().run_pass().await.unwrap();
    assert_eq!(h.guild.member(id).nickname.as_deref(), Some("🔴 Alex"));
    assert_eq!(h.saved_nickname(id).await, Some(Some("Alex".to_string())));
}

#[tokio::test]
async fn test_denied_restore_keeps_history_for_later() {
    let (h, probe, id) = linked(nicknamed(unique_member_id(), "alex", "Alex")).await;
    probe.go_live("alex");
    h.reconciler().reconcile_member(id).await.unwrap();

    h.guild.deny_nickname(true);
    probe.go_offline("alex");
    h.reconciler().reconcile_member(id).await.unwrap();

    assert!(!h.guild.member(id).has_role(STREAM_ROLE));
    assert_eq!(h.guild.member(id).nickname.as_deref(), Some("🔴 Alex"));
    assert_eq!(h.saved_nickname(id).await, Some(Some("Alex".to_string())));

    h.guild.deny_nickname(false);
    h.reconciler().reconcile_member(id).await.unwrap();
    assert_eq!(h.guild.member(id).nickname.as_deref(), Some("Alex"));
    assert_eq!(h.saved_nickname(id).await, None);
}

#[tokio::test]
async fn test_denied_roles_do_not_block_nickname() {
    let (h, probe, id) = linked(nicknamed(unique_member_id(), "alex", "Alex")).await;
    h.guild.deny_roles(true);
    probe.go_live("alex");

    let report = h.reconciler().run_pass().await.unwrap();

    assert_eq!(report.actions_failed, 1);
    let member = h.guild.member(id);
    assert!(!member.has_role(STREAM_ROLE));
    assert_eq!(member.nickname.as_deref(), Some("🔴 Alex"));
}

// ============================================================================
// Transient failures
// ============================================================================

#[tokio::test]
async fn test_transient_failures_recover_next_pass() {
    let (h, probe, id) = linked(nicknamed(unique_member_id(), "alex", "Alex")).await;
    h.guild.set_flaky(true);
    probe.go_live("alex");

    let report = h.reconciler().run_pass().await.unwrap();
    assert_eq!(report.actions_failed, 2);
    assert_eq!(report.errors, 0);
    assert_eq!(h.saved_nickname(id).await, None);

    h.guild.set_flaky(false);
    h.reconciler().run_pass().await.unwrap();
    let member = h.guild.member(id);
    assert!(member.has_role(STREAM_ROLE));
    assert_eq!(member.nickname.as_deref(), Some("🔴 Alex"));
}

// ============================================================================
// Departures
// ============================================================================

#[tokio::test]
async fn test_member_left_clears_link_and_history() {
    let (h, probe, id) = linked(nicknamed(unique_member_id(), "alex", "Alex")).await;
    probe.go_live("alex");
    h.reconciler().reconcile_member(id).await.unwrap();

    h.guild.remove(id);
    assert!(h.commands().member_left(id).await.unwrap());

    assert!(h.links.is_empty());
    assert!(h.history.is_empty());
    let report = h.reconciler().run_pass().await.unwrap();
    assert_eq!(report.members, 0);
}

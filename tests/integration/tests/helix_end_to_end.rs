//! Full pipeline against a mocked Twitch
//!
//! The real Helix client answers the probe; Twitch itself is an `httpmock`
//! server.
//!
//! Run with: cargo test -p integration-tests --test helix_end_to_end

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use herald_core::LiveStatus;
use herald_helix::{HelixClient, HelixConfig};
use herald_service::dto::LinkRequest;
use integration_tests::{fixtures::*, TestHarness};

fn helix_for(server: &MockServer) -> Arc<HelixClient> {
    let config = HelixConfig::new("it-client", "it-secret").with_base_url(server.base_url());
    Arc::new(HelixClient::new(config).expect("helix client"))
}

fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/oauth2/token");
        then.status(200).json_body(json!({
            "access_token": "it-token",
            "expires_in": 3600,
            "token_type": "bearer"
        }));
    })
}

#[tokio::test]
async fn test_link_command_reports_live_status_and_decorates() {
    let server = MockServer::start();
    mock_token(&server);
    server.mock(|when, then| {
        when.method(GET)
            .path("/helix/streams")
            .query_param("user_login", "alex_tv");
        then.status(200).json_body(json!({
            "data": [{
                "user_login": "alex_tv",
                "game_name": "Star Citizen",
                "title": "Cargo run",
                "type": "live"
            }]
        }));
    });

    let id = unique_member_id();
    let h = TestHarness::new(
        FakeGuild::new().with_member(nicknamed(id, "alex", "Alex")),
        helix_for(&server),
    );

    let response = h
        .commands()
        .link(LinkRequest::new(id, "@Alex_TV"))
        .await
        .unwrap();

    assert_eq!(response.twitch_username, "alex_tv");
    assert_eq!(response.status, LiveStatus::Live);
    assert_eq!(response.category.as_deref(), Some("Star Citizen"));
    assert!(response.message().contains("🔴 En live"));

    let member = h.guild.member(id);
    assert!(member.has_role(STREAM_ROLE));
    assert_eq!(member.nickname.as_deref(), Some("🔴 Alex"));
}

#[tokio::test]
async fn test_pass_uses_one_batched_lookup() {
    let server = MockServer::start();
    let token = mock_token(&server);
    let streams = server.mock(|when, then| {
        when.method(GET).path("/helix/streams");
        then.status(200).json_body(json!({
            "data": [{
                "user_login": "first",
                "game_name": "Star Citizen",
                "title": "",
                "type": "live"
            }]
        }));
    });

    let (a, b, c) = (unique_member_id(), unique_member_id(), unique_member_id());
    let h = TestHarness::new(
        FakeGuild::new()
            .with_member(member(a, "first"))
            .with_member(member(b, "second"))
            .with_member(member(c, "third")),
        helix_for(&server),
    );
    h.seed_link(a, "first").await;
    h.seed_link(b, "second").await;
    h.seed_link(c, "third").await;

    let report = h.reconciler().run_pass().await.unwrap();

    assert_eq!(report.members, 3);
    assert_eq!(report.live, 1);
    assert_eq!(report.unknown, 0);
    token.assert_calls(1);
    streams.assert_calls(1);
    assert!(h.guild.member(a).has_role(STREAM_ROLE));
    assert!(!h.guild.member(b).has_role(STREAM_ROLE));
}

#[tokio::test]
async fn test_twitch_outage_leaves_decorations_alone() {
    let server = MockServer::start();
    mock_token(&server);
    server.mock(|when, then| {
        when.method(GET).path("/helix/streams");
        then.status(503).body("upstream unavailable");
    });

    let id = unique_member_id();
    let h = TestHarness::new(
        FakeGuild::new().with_member(nicknamed(id, "alex", "🔴 Alex").with_role(STREAM_ROLE)),
        helix_for(&server),
    );
    h.seed_link(id, "alex").await;
    h.seed_history(id, Some("Alex")).await;

    let report = h.reconciler().run_pass().await.unwrap();

    assert_eq!(report.unknown, 1);
    assert!(h.guild.calls().is_empty());
    assert_eq!(h.saved_nickname(id).await, Some(Some("Alex".to_string())));

    let status = h.commands().status(id).await.unwrap();
    assert_eq!(status.status, LiveStatus::Unknown);
}

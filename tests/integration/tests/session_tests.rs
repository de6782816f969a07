//! End-to-end session tests
//!
//! Each test drives a full session through the mock transports: login and
//! identify, READY, server-pushed frames, commands, and teardown.

use integration_tests::{expect_notification, fixtures, TestClient};
use serde_json::json;

use chatwire_common::ClientConfig;
use chatwire_core::{Notification, Snowflake};
use chatwire_gateway::connection::ConnectionState;

#[tokio::test]
async fn test_full_session_lifecycle() {
    let client = TestClient::start().await.expect("login");
    let session = &client.session;

    assert_eq!(session.state(), ConnectionState::Live);
    assert_eq!(session.self_id(), Some(Snowflake::new(99)));
    assert!(session.mirror().contains_server(Snowflake::new(1)));
    assert!(session.mirror().contains_channel(Snowflake::new(10)));
    assert!(session.mirror().contains_user(Snowflake::new(7)));

    // Identify went out first, with the version and client name
    {
        let sent = client.push.sent.lock();
        assert!(sent[0].contains("\"op\":2"));
        assert!(sent[0].contains("chatwire"));
    }

    // A server-pushed message lands in the mirror and fans out
    let mut rx = session.subscribe();
    client
        .push
        .push_frame(fixtures::message_create("100", "10", "5", "hello"));
    let notification =
        expect_notification(&mut rx, |n| matches!(n, Notification::Message(_))).await;
    let Notification::Message(message) = notification else {
        unreachable!()
    };
    assert_eq!(message.content, "hello");
    assert!(session
        .mirror()
        .get_message(Snowflake::new(10), Snowflake::new(100))
        .is_some());

    // Commands fold their responses into the same mirror
    client.rest.respond(json!({
        "id": "101",
        "channel_id": "10",
        "author": {"id": "99", "username": "me"},
        "content": "hi back",
        "timestamp": "2016-01-01T00:01:00Z"
    }));
    let sent = session
        .send_message(Snowflake::new(10), "hi back", Default::default())
        .await
        .unwrap();
    assert_eq!(sent.id, Snowflake::new(101));
    assert!(session
        .mirror()
        .get_message(Snowflake::new(10), Snowflake::new(101))
        .is_some());

    // Logout tears everything down
    session.logout().await.unwrap();
    expect_notification(&mut rx, |n| matches!(n, Notification::Disconnected)).await;
    assert_eq!(session.state(), ConnectionState::Disconnected);

    let err = session
        .send_message(Snowflake::new(10), "too late", Default::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_AUTHENTICATED");
}

#[tokio::test]
async fn test_pushed_edit_and_delete_update_the_mirror() {
    let client = TestClient::start().await.expect("login");
    let session = &client.session;
    let mut rx = session.subscribe();

    client
        .push
        .push_frame(fixtures::message_create("100", "10", "5", "original"));
    expect_notification(&mut rx, |n| matches!(n, Notification::Message(_))).await;

    client
        .push
        .push_frame(fixtures::message_update("100", "10", "edited"));
    let notification =
        expect_notification(&mut rx, |n| matches!(n, Notification::MessageUpdated { .. })).await;
    let Notification::MessageUpdated { new, old } = notification else {
        unreachable!()
    };
    assert_eq!(old.content, "original");
    assert_eq!(new.content, "edited");
    assert!(new.edited_at.is_some());

    client.push.push_frame(fixtures::message_delete("100", "10"));
    let notification =
        expect_notification(&mut rx, |n| matches!(n, Notification::MessageDeleted { .. })).await;
    let Notification::MessageDeleted { message, .. } = notification else {
        unreachable!()
    };
    assert_eq!(message.unwrap().content, "edited");
    assert!(session
        .mirror()
        .get_message(Snowflake::new(10), Snowflake::new(100))
        .is_none());
}

#[tokio::test]
async fn test_server_delete_cascades() {
    let client = TestClient::start().await.expect("login");
    let session = &client.session;
    let mut rx = session.subscribe();

    client.push.push_frame(fixtures::guild_delete("1"));
    let notification =
        expect_notification(&mut rx, |n| matches!(n, Notification::ServerDeleted(_))).await;
    let Notification::ServerDeleted(server) = notification else {
        unreachable!()
    };
    assert_eq!(server.id, Snowflake::new(1));

    assert!(!session.mirror().contains_server(Snowflake::new(1)));
    assert!(!session.mirror().contains_channel(Snowflake::new(10)));
    // Direct conversations are untouched
    assert!(session.mirror().contains_channel(Snowflake::new(30)));
}

#[tokio::test]
async fn test_presence_splits_status_from_identity() {
    let client = TestClient::start().await.expect("login");
    let session = &client.session;
    let mut rx = session.subscribe();

    // Status-only change
    client.push.push_frame(fixtures::presence_status("5", "idle"));
    let notification =
        expect_notification(&mut rx, |n| matches!(n, Notification::Presence { .. })).await;
    let Notification::Presence { user, .. } = notification else {
        unreachable!()
    };
    assert_eq!(user.id, Snowflake::new(5));
    assert_eq!(user.username, "owner");

    // Rename is an identity change
    client
        .push
        .push_frame(fixtures::presence_rename("5", "renamed", "idle"));
    let notification =
        expect_notification(&mut rx, |n| matches!(n, Notification::UserUpdated { .. })).await;
    let Notification::UserUpdated { old, new } = notification else {
        unreachable!()
    };
    assert_eq!(old.username, "owner");
    assert_eq!(new.username, "renamed");
    assert_eq!(
        session.mirror().get_user(Snowflake::new(5)).unwrap().username,
        "renamed"
    );
}

#[tokio::test]
async fn test_typing_stops_after_quiet_window() {
    let mut config = ClientConfig::with_api_base("http://test");
    config.typing_quiet_ms = 50;
    let client = TestClient::start_with_config(config).await.expect("login");
    let session = &client.session;
    let mut rx = session.subscribe();

    client.push.push_frame(fixtures::typing_start("5", "10"));
    expect_notification(&mut rx, |n| matches!(n, Notification::UserTypingStart { .. })).await;
    assert!(session.mirror().typing_since(Snowflake::new(5)).is_some());

    let notification =
        expect_notification(&mut rx, |n| matches!(n, Notification::UserTypingStop { .. })).await;
    let Notification::UserTypingStop { user_id, channel_id } = notification else {
        unreachable!()
    };
    assert_eq!(user_id, Snowflake::new(5));
    assert_eq!(channel_id, Snowflake::new(10));
    assert!(session.mirror().typing_since(Snowflake::new(5)).is_none());
}

#[tokio::test]
async fn test_unapplied_event_warns_but_stays_live() {
    let client = TestClient::start().await.expect("login");
    let session = &client.session;
    let mut rx = session.subscribe();

    // Message for a channel the mirror has never seen
    client
        .push
        .push_frame(fixtures::message_create("500", "404", "5", "ghost"));
    expect_notification(&mut rx, |n| matches!(n, Notification::Warning(_))).await;

    assert_eq!(session.state(), ConnectionState::Live);
    assert!(session
        .mirror()
        .get_message(Snowflake::new(404), Snowflake::new(500))
        .is_none());

    // The connection keeps dispatching afterwards
    client
        .push
        .push_frame(fixtures::message_create("501", "10", "5", "alive"));
    expect_notification(&mut rx, |n| matches!(n, Notification::Message(_))).await;
}

#[tokio::test]
async fn test_unknown_event_surfaces_as_debug() {
    let client = TestClient::start().await.expect("login");
    let session = &client.session;
    let mut rx = session.subscribe();

    client
        .push
        .push_frame(fixtures::dispatch("SOMETHING_NEW", json!({"x": 1})));
    let notification =
        expect_notification(&mut rx, |n| matches!(n, Notification::Debug(_))).await;
    let Notification::Debug(text) = notification else {
        unreachable!()
    };
    assert!(text.contains("SOMETHING_NEW"));
    assert_eq!(session.state(), ConnectionState::Live);
}

#[tokio::test]
async fn test_raw_frame_precedes_typed_notification() {
    let client = TestClient::start().await.expect("login");
    let session = &client.session;
    let mut rx = session.subscribe();

    client
        .push
        .push_frame(fixtures::message_create("100", "10", "5", "ordered"));

    let first = expect_notification(&mut rx, |_| true).await;
    let Notification::Raw(value) = first else {
        panic!("expected the raw passthrough first, got {first:?}");
    };
    assert_eq!(value["t"], "MESSAGE_CREATE");

    expect_notification(&mut rx, |n| matches!(n, Notification::Message(_))).await;
}

#[tokio::test]
async fn test_server_close_disconnects_session() {
    let client = TestClient::start().await.expect("login");
    let session = &client.session;
    let mut rx = session.subscribe();

    client.push.close();
    expect_notification(&mut rx, |n| matches!(n, Notification::Disconnected)).await;
    assert_eq!(session.state(), ConnectionState::Disconnected);

    // A fresh login is allowed after the drop
    client.rest.respond(json!({"token": "tok2"}));
    client.rest.respond(json!({"url": "ws://push"}));
    client.push.queue_frame(fixtures::ready_frame());
    session.login("test@example.com", "password").await.unwrap();
    integration_tests::wait_until_live(session).await;
}

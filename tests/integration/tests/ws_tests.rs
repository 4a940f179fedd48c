//! Websocket gateway tests
//!
//! Run with: cargo test -p integration-tests --test ws_tests

use std::time::Duration;

use integration_tests::{
    assert_error, assert_json, CreateRoomRequest, MessageResponse, RoomResponse, TestServer,
};
use reqwest::StatusCode;
use roomchat_common::AppConfig;

#[tokio::test]
async fn test_private_conversation_between_alice_and_bob() {
    let server = TestServer::start().await.unwrap();
    let alice = server.register(3, "Alice").await.unwrap();
    let bob = server.register(7, "Bob").await.unwrap();

    // Either id order reaches the same room
    let mut alice_ws = server.connect("/ws/chat/room_3_7", Some(&alice)).await.unwrap();
    let mut bob_ws = server.connect("/ws/chat/room_7_3/", Some(&bob)).await.unwrap();
    alice_ws.sync().await.unwrap();
    bob_ws.sync().await.unwrap();

    alice_ws.send_message("  hi bob  ").await.unwrap();

    for ws in [&mut alice_ws, &mut bob_ws] {
        let event = ws.next_json().await.unwrap();
        assert_eq!(event["type"], "message");
        assert_eq!(event["room"], "room_3_7");
        assert_eq!(event["sender"], "Alice");
        assert_eq!(event["sender_id"], "3");
        assert_eq!(event["body"], "hi bob");
        assert!(event["id"].is_string());
        assert!(event["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    // Legacy frame shape
    bob_ws.send_text(r#"{"message":"hey alice"}"#).await.unwrap();
    let event = alice_ws.next_json().await.unwrap();
    assert_eq!(event["sender"], "Bob");
    assert_eq!(event["body"], "hey alice");
    bob_ws.next_json().await.unwrap();

    // Persisted before it was broadcast, visible to both participants
    for token in [&alice, &bob] {
        let response = server.get_auth("/api/messages/room_7_3", token).await.unwrap();
        let history: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
        let bodies: Vec<_> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["hi bob", "hey alice"]);
        assert!(history.iter().all(|m| m.room == "room_3_7"));
    }

    alice_ws.close().await.unwrap();
    bob_ws.close().await.unwrap();
}

#[tokio::test]
async fn test_anonymous_connection_is_rejected() {
    let server = TestServer::start().await.unwrap();
    server.register(3, "Alice").await.unwrap();

    let mut no_token = server.connect("/ws/chat/general", None).await.unwrap();
    assert_eq!(no_token.close_code().await.unwrap(), 4001);

    let mut bad_token = server.connect("/ws/chat/general", Some("not.a.jwt")).await.unwrap();
    assert_eq!(bad_token.close_code().await.unwrap(), 4001);

    // Rejection happens before any room is provisioned
    let alice = server.register(3, "Alice").await.unwrap();
    let response = server.get_auth("/api/messages/general", &alice).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_third_party_cannot_open_private_room() {
    let server = TestServer::start().await.unwrap();
    server.register(3, "Alice").await.unwrap();
    server.register(7, "Bob").await.unwrap();
    let carol = server.register(9, "Carol").await.unwrap();

    let mut ws = server.connect("/ws/chat/room_3_7", Some(&carol)).await.unwrap();
    assert_eq!(ws.close_code().await.unwrap(), 4003);
}

#[tokio::test]
async fn test_invalid_room_name_closes_with_not_found() {
    let server = TestServer::start().await.unwrap();
    let alice = server.register(3, "Alice").await.unwrap();

    let mut ws = server.connect("/ws/chat/room_3_3", Some(&alice)).await.unwrap();
    assert_eq!(ws.close_code().await.unwrap(), 4004);
}

#[tokio::test]
async fn test_named_room_broadcast_and_blank_messages() {
    let server = TestServer::start().await.unwrap();
    let alice = server.register(3, "Alice").await.unwrap();
    let bob = server.register(7, "Bob").await.unwrap();

    let mut alice_ws = server.connect("/ws/chat/lounge", Some(&alice)).await.unwrap();
    let mut bob_ws = server.connect("/ws/chat/lounge", Some(&bob)).await.unwrap();
    alice_ws.sync().await.unwrap();
    bob_ws.sync().await.unwrap();

    // Blank and unparseable frames are dropped without closing the session
    alice_ws.send_message("   ").await.unwrap();
    alice_ws.send_text("not json").await.unwrap();
    alice_ws.send_message("welcome").await.unwrap();

    let event = bob_ws.next_json().await.unwrap();
    assert_eq!(event["body"], "welcome");
    assert_eq!(event["room"], "lounge");
}

#[tokio::test]
async fn test_deleted_room_closes_on_next_send() {
    let server = TestServer::start().await.unwrap();
    let alice = server.register(3, "Alice").await.unwrap();

    let response = server
        .post_auth("/api/rooms", &alice, &CreateRoomRequest::unique())
        .await
        .unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let mut ws = server
        .connect(&format!("/ws/chat/{}", room.name), Some(&alice))
        .await
        .unwrap();
    ws.sync().await.unwrap();
    ws.send_message("before").await.unwrap();
    assert_eq!(ws.next_json().await.unwrap()["body"], "before");

    let response = server
        .delete_auth(&format!("/api/rooms/{}", room.id), &alice)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    ws.send_message("after").await.unwrap();
    assert_eq!(ws.close_code().await.unwrap(), 4004);

    let response = server
        .get_auth(&format!("/api/messages/{}", room.name), &alice)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_reserved_prefix_room_is_not_found() {
    let server = TestServer::start().await.unwrap();
    let alice = server.register(3, "Alice").await.unwrap();

    let mut ws = server.connect("/ws/chat/room_abc", Some(&alice)).await.unwrap();
    assert_eq!(ws.close_code().await.unwrap(), 4004);
}

#[tokio::test]
async fn test_lobby_announces_new_rooms() {
    let server = TestServer::start().await.unwrap();
    let alice = server.register(3, "Alice").await.unwrap();
    let bob = server.register(7, "Bob").await.unwrap();

    let mut anonymous = server.connect("/ws/rooms", None).await.unwrap();
    assert_eq!(anonymous.close_code().await.unwrap(), 4001);

    let mut lobby = server.connect("/ws/rooms", Some(&bob)).await.unwrap();
    lobby.sync().await.unwrap();

    let request = CreateRoomRequest::unique();
    let response = server.post_auth("/api/rooms", &alice, &request).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let event = lobby.next_json().await.unwrap();
    assert_eq!(event["type"], "room_created");
    assert_eq!(event["id"], room.id.as_str());
    assert_eq!(event["name"], request.name.as_str());
    assert_eq!(event["created_by"], "3");
}

#[tokio::test]
async fn test_idle_session_is_closed() {
    let mut config = AppConfig::for_tests();
    config.gateway.idle_timeout = Some(Duration::from_millis(200));
    let server = TestServer::start_with_config(config).await.unwrap();
    let alice = server.register(3, "Alice").await.unwrap();

    let mut ws = server.connect("/ws/chat/quiet", Some(&alice)).await.unwrap();
    assert_eq!(ws.close_code().await.unwrap(), 4008);
}

#[tokio::test]
async fn test_shutdown_closes_sessions_normally() {
    let server = TestServer::start().await.unwrap();
    let alice = server.register(3, "Alice").await.unwrap();

    let mut ws = server.connect("/ws/chat/lounge", Some(&alice)).await.unwrap();
    ws.sync().await.unwrap();

    let closing = tokio::spawn(async move { ws.close_code().await });
    server.shutdown().await.unwrap();
    assert_eq!(closing.await.unwrap().unwrap(), 1000);
}

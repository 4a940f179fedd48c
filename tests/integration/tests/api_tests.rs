//! Room administration API tests
//!
//! The server runs in-process with in-memory storage; no external services needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, CreateRoomRequest, JoinRoomRequest,
    ParticipantResponse, RemoveUserRequest, RoomResponse, StatusResponse, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

/// Server with Alice (3, creator), Bob (7), and Carol (9), plus a room Alice created
struct Scenario {
    server: TestServer,
    alice: String,
    bob: String,
    carol: String,
    room: RoomResponse,
}

impl Scenario {
    async fn new() -> Self {
        let server = TestServer::start().await.expect("Failed to start server");
        let alice = server.register(3, "Alice").await.unwrap();
        let bob = server.register(7, "Bob").await.unwrap();
        let carol = server.register(9, "Carol").await.unwrap();

        let response = server
            .post_auth("/api/rooms", &alice, &CreateRoomRequest::unique())
            .await
            .unwrap();
        let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

        Self {
            server,
            alice,
            bob,
            carol,
            room,
        }
    }

    fn path(&self, action: &str) -> String {
        format!("/api/rooms/{}/{action}", self.room.id)
    }

    fn passkey(&self) -> String {
        self.room.passkey.clone().expect("creator sees the passkey")
    }

    async fn join(&self, token: &str) {
        let body = JoinRoomRequest {
            passkey: Some(self.passkey()),
        };
        let response = self.server.post_auth(&self.path("join"), token, &body).await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    async fn remove(&self, token: &str, user_id: serde_json::Value) -> reqwest::Response {
        self.server
            .post_auth(&self.path("remove_user"), token, &RemoveUserRequest { user_id })
            .await
            .unwrap()
    }

    async fn participants(&self) -> Vec<String> {
        let response = self
            .server
            .get_auth(&self.path("participants"), &self.alice)
            .await
            .unwrap();
        let list: Vec<ParticipantResponse> = assert_json(response, StatusCode::OK).await.unwrap();
        list.into_iter().map(|p| p.username).collect()
    }
}

// ============================================================================
// Health and authentication
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/rooms").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "UNAUTHORIZED");

    let response = server.get_auth("/api/rooms", "garbage").await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_token_for_unknown_identity_is_unauthorized() {
    let server = TestServer::start().await.unwrap();
    let ghost = roomchat_core::Identity::new(404, "Ghost", roomchat_core::Role::Client);
    let token = server.state.jwt_service().issue(&ghost).unwrap();

    let response = server.get_auth("/api/rooms", &token).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Rooms
// ============================================================================

#[tokio::test]
async fn test_create_room_reveals_passkey_to_creator_only() {
    let s = Scenario::new().await;
    assert_eq!(s.room.created_by, "3");
    assert_eq!(s.room.created_by_username, "Alice");
    assert!(s.room.is_joined);
    assert_eq!(s.room.participant_count, 1);
    assert!(!s.room.created_at.is_empty());
    let passkey = s.passkey();
    assert_eq!(passkey.len(), 6);
    assert!(passkey.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));

    let path = format!("/api/rooms/{}", s.room.id);
    let response = s.server.get_auth(&path, &s.bob).await.unwrap();
    let seen_by_bob: RoomResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(seen_by_bob.name, s.room.name);
    assert_eq!(seen_by_bob.passkey, None);
    assert!(!seen_by_bob.is_joined);

    let response = s.server.get_auth(&path, &s.alice).await.unwrap();
    let seen_by_alice: RoomResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(seen_by_alice.passkey, Some(passkey));
}

#[tokio::test]
async fn test_create_room_rejections() {
    let s = Scenario::new().await;

    let duplicate = CreateRoomRequest {
        name: s.room.name.clone(),
    };
    let response = s.server.post_auth("/api/rooms", &s.bob, &duplicate).await.unwrap();
    assert_error(response, StatusCode::CONFLICT).await.unwrap();

    let reserved = CreateRoomRequest {
        name: "room_3_7".to_string(),
    };
    let response = s.server.post_auth("/api/rooms", &s.alice, &reserved).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let empty = CreateRoomRequest { name: String::new() };
    let response = s.server.post_auth("/api/rooms", &s.alice, &empty).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_list_rooms_only_shows_joined_rooms() {
    let s = Scenario::new().await;

    let response = s.server.get_auth("/api/rooms", &s.bob).await.unwrap();
    let rooms: Vec<RoomResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(rooms.is_empty());

    s.join(&s.bob).await;

    let response = s.server.get_auth("/api/rooms", &s.bob).await.unwrap();
    let rooms: Vec<RoomResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].id, s.room.id);
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let s = Scenario::new().await;
    let response = s.server.get_auth("/api/rooms/999999", &s.alice).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = s
        .server
        .post_auth_empty("/api/rooms/999999/leave", &s.alice)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Join and leave
// ============================================================================

#[tokio::test]
async fn test_join_requires_correct_passkey() {
    let s = Scenario::new().await;

    let response = s.server.post_auth_empty(&s.path("join"), &s.bob).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    let wrong = JoinRoomRequest {
        passkey: Some("WRONG1".to_string()),
    };
    let response = s.server.post_auth(&s.path("join"), &s.bob, &wrong).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(s.participants().await, vec!["Alice"]);

    let right = JoinRoomRequest {
        passkey: Some(s.passkey()),
    };
    let response = s.server.post_auth(&s.path("join"), &s.bob, &right).await.unwrap();
    let status: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(status.status, "joined");

    // Joining twice changes nothing
    let response = s.server.post_auth(&s.path("join"), &s.bob, &right).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(s.participants().await, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn test_leave_is_idempotent() {
    let s = Scenario::new().await;
    s.join(&s.bob).await;

    for _ in 0..2 {
        let response = s.server.post_auth_empty(&s.path("leave"), &s.bob).await.unwrap();
        let status: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(status.status, "left");
    }
    assert_eq!(s.participants().await, vec!["Alice"]);
}

// ============================================================================
// Participant removal
// ============================================================================

#[tokio::test]
async fn test_only_creator_removes_participants() {
    let s = Scenario::new().await;
    s.join(&s.bob).await;
    s.join(&s.carol).await;

    let response = s.remove(&s.bob, json!("9")).await;
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(s.participants().await, vec!["Alice", "Bob", "Carol"]);

    let response = s.remove(&s.alice, json!(9)).await;
    let status: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(status.status, "removed");
    assert_eq!(s.participants().await, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn test_remove_participant_rejections() {
    let s = Scenario::new().await;

    // Target is the creator
    let response = s.remove(&s.alice, json!("3")).await;
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    // Known identity that never joined
    let response = s.remove(&s.alice, json!("7")).await;
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    // Unknown identity
    let response = s.remove(&s.alice, json!("12345")).await;
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();

    // Missing and non-integer user_id
    let response = s.remove(&s.alice, serde_json::Value::Null).await;
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    let response = s.remove(&s.alice, json!("seven")).await;
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(s.participants().await, vec!["Alice"]);
}

// ============================================================================
// Room deletion
// ============================================================================

#[tokio::test]
async fn test_only_creator_deletes_room() {
    let s = Scenario::new().await;
    s.join(&s.bob).await;
    let room_path = format!("/api/rooms/{}", s.room.id);

    let response = s.server.delete_auth(&room_path, &s.bob).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(s.participants().await, vec!["Alice", "Bob"]);

    let response = s.server.delete_auth(&room_path, &s.alice).await.unwrap();
    let status: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(status.status, "deleted");

    let response = s.server.get_auth(&room_path, &s.alice).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    let response = s.server.delete_auth(&room_path, &s.alice).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();

    let history = format!("/api/messages/{}", s.room.name);
    let response = s.server.get_auth(&history, &s.alice).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();

    // The name is free again
    let response = s
        .server
        .post_auth("/api/rooms", &s.bob, &json!({ "name": s.room.name }))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
}

// ============================================================================
// Message history
// ============================================================================

#[tokio::test]
async fn test_history_requires_membership() {
    let s = Scenario::new().await;

    let path = format!("/api/messages/{}", s.room.name);
    let response = s.server.get_auth(&path, &s.bob).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = s.server.get_auth(&path, &s.alice).await.unwrap();
    let messages: Vec<serde_json::Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(messages.is_empty());

    let response = s
        .server
        .get_auth("/api/messages/no-such-room", &s.alice)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
}

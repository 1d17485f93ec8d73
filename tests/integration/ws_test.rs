//! Integration tests for the WebSocket endpoint: upgrade checks, presence,
//! relaying and server-originated events over real sockets.

mod helpers;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use futures::{SinkExt, StreamExt};
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Socket client that splits batched frames into single events.
struct WsClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pending: VecDeque<Value>,
}

impl WsClient {
    async fn connect(addr: SocketAddr, share_id: &str, user: &str) -> Self {
        let url = format!("ws://{addr}/ws?shareId={share_id}&userName={user}");
        let (socket, _) = tokio_tungstenite::connect_async(url)
            .await
            .expect("WebSocket handshake");
        Self {
            socket,
            pending: VecDeque::new(),
        }
    }

    async fn send(&mut self, event: Value) {
        self.socket
            .send(Message::text(event.to_string()))
            .await
            .expect("send frame");
    }

    async fn next_event(&mut self) -> Value {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return event;
            }
            let msg = tokio::time::timeout(Duration::from_secs(2), self.socket.next())
                .await
                .expect("frame within timeout")
                .expect("socket open")
                .expect("valid frame");
            if let Message::Text(text) = msg {
                for line in text.as_str().split('\n').filter(|l| !l.is_empty()) {
                    self.pending
                        .push_back(serde_json::from_str(line).expect("event is JSON"));
                }
            }
        }
    }

    async fn expect_silence(&mut self) {
        assert!(self.pending.is_empty());
        let next = tokio::time::timeout(Duration::from_millis(200), self.socket.next()).await;
        assert!(next.is_err(), "unexpected frame: {next:?}");
    }
}

async fn wait_for_users(app: &helpers::TestApp, share_id: &str, count: u64) {
    let path = format!("/api/active-users?shareId={share_id}");
    for _ in 0..100 {
        let response = app.request("GET", &path, None).await;
        if response.body["count"] == count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("share {share_id} never reached {count} users");
}

#[tokio::test]
async fn test_ws_requires_params() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;

    let missing_user = app
        .request("GET", &format!("/ws?shareId={share_id}"), None)
        .await;
    assert_eq!(missing_user.status, StatusCode::BAD_REQUEST);

    let missing_share = app.request("GET", "/ws?userName=ana", None).await;
    assert_eq!(missing_share.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ws_unknown_share() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/ws?shareId=nope0000&userName=ana", None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ws_valid_params_reach_upgrade() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;

    let req = Request::builder()
        .method("GET")
        .uri(format!("/ws?shareId={share_id}&userName=ana"))
        .header("connection", "upgrade")
        .header("upgrade", "websocket")
        .header("sec-websocket-version", "13")
        .header("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ==")
        .body(Body::empty())
        .expect("request");

    // A oneshot request has no underlying connection to upgrade.
    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::UPGRADE_REQUIRED);
}

#[tokio::test]
async fn test_presence_and_relay_over_sockets() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;
    let addr = app.spawn_server().await;

    let mut ana = WsClient::connect(addr, &share_id, "ana").await;
    wait_for_users(&app, &share_id, 1).await;
    let mut ben = WsClient::connect(addr, &share_id, "ben").await;

    let joined = ana.next_event().await;
    assert_eq!(joined["type"], "user.joined");
    assert_eq!(joined["user"], "ben");

    // Share and user come from the connection, not the frame.
    ben.send(json!({
        "type": "typing.start",
        "shareId": "elsewhere",
        "user": "mallory",
        "photoId": "IMG_0003.jpg",
    }))
    .await;
    let typing = ana.next_event().await;
    assert_eq!(typing["type"], "typing.start");
    assert_eq!(typing["user"], "ben");
    assert_eq!(typing["shareId"], share_id.as_str());
    assert_eq!(typing["photoId"], "IMG_0003.jpg");
    ben.expect_silence().await;

    ben.send(json!({ "type": "user.viewing", "photoId": "IMG_0004.jpg" }))
        .await;
    assert_eq!(ana.next_event().await["type"], "user.viewing");
    let path = format!("/api/active-users?shareId={share_id}");
    let users = app.request("GET", &path, None).await;
    let ben_entry = json!({ "name": "ben", "viewing": "IMG_0004.jpg" });
    assert_eq!(users.body["users"][1], ben_entry);

    app.request(
        "POST",
        "/api/chat/messages",
        Some(json!({
            "share_id": share_id,
            "user_name": "ana",
            "message": "hello",
        })),
    )
    .await;
    assert_eq!(ana.next_event().await["type"], "chat.message");
    assert_eq!(ben.next_event().await["type"], "chat.message");

    ben.socket.close(None).await.expect("close");
    let left = ana.next_event().await;
    assert_eq!(left["type"], "user.left");
    assert_eq!(left["user"], "ben");
    wait_for_users(&app, &share_id, 1).await;
}

#[tokio::test]
async fn test_malformed_and_server_only_frames_are_dropped() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;
    let addr = app.spawn_server().await;

    let mut ana = WsClient::connect(addr, &share_id, "ana").await;
    wait_for_users(&app, &share_id, 1).await;
    let mut ben = WsClient::connect(addr, &share_id, "ben").await;
    assert_eq!(ana.next_event().await["type"], "user.joined");

    ben.socket
        .send(Message::text("not json"))
        .await
        .expect("send");
    ben.send(json!({ "type": "user.left" })).await;
    ben.send(json!({ "type": "typing.stop" })).await;

    // Only the valid frame arrives, and the connection survived the others.
    assert_eq!(ana.next_event().await["type"], "typing.stop");
    wait_for_users(&app, &share_id, 2).await;

    let health = app.request("GET", "/api/health", None).await;
    let malformed = health.body["realtime"]["malformed_frames"].as_u64();
    assert!(malformed.unwrap_or_default() >= 2);
}

#[tokio::test]
async fn test_oversized_and_non_utf8_frames_keep_connection() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;
    let addr = app.spawn_server().await;

    let mut ana = WsClient::connect(addr, &share_id, "ana").await;
    wait_for_users(&app, &share_id, 1).await;
    let mut ben = WsClient::connect(addr, &share_id, "ben").await;
    assert_eq!(ana.next_event().await["type"], "user.joined");

    let padding = "x".repeat(70_000);
    ben.send(json!({ "type": "typing.start", "photoId": padding }))
        .await;
    ben.socket
        .send(Message::binary(vec![0xff, 0xfe, 0xfd]))
        .await
        .expect("send");
    ben.send(json!({ "type": "typing.stop" })).await;

    assert_eq!(ana.next_event().await["type"], "typing.stop");
    wait_for_users(&app, &share_id, 2).await;

    let health = app.request("GET", "/api/health", None).await;
    let malformed = health.body["realtime"]["malformed_frames"].as_u64();
    assert_eq!(malformed, Some(2));
}

#[tokio::test]
async fn test_engine_shutdown_closes_sockets() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;
    let addr = app.spawn_server().await;

    let mut ana = WsClient::connect(addr, &share_id, "ana").await;
    wait_for_users(&app, &share_id, 1).await;

    app.realtime.shutdown().await;

    let msg = tokio::time::timeout(Duration::from_secs(2), ana.socket.next())
        .await
        .expect("close within timeout");
    assert!(
        matches!(msg, Some(Ok(Message::Close(_))) | None | Some(Err(_))),
        "unexpected {msg:?}"
    );
}

//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::ServiceExt;

use sharedrop_api::{AppState, build_router};
use sharedrop_core::config::{AppConfig, DatabaseBackend};
use sharedrop_core::types::ShareId;
use sharedrop_database::{CollabStore, MemoryStore};
use sharedrop_realtime::RealtimeEngine;
use sharedrop_realtime::connection::ConnectionHandle;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store behind the router
    pub store: Arc<dyn CollabStore>,
    /// Running realtime engine
    pub realtime: RealtimeEngine,
}

impl TestApp {
    /// Create a new test application over an in-memory store
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    pub async fn with_config(mut config: AppConfig) -> Self {
        config.database.backend = DatabaseBackend::Memory;
        let store: Arc<dyn CollabStore> = Arc::new(MemoryStore::new());
        let realtime = RealtimeEngine::start(&config.realtime);
        let state = AppState::new(config, store.clone(), realtime.clone());

        Self {
            router: build_router(state),
            store,
            realtime,
        }
    }

    /// Create a share through the API and return its id
    pub async fn create_share(&self) -> String {
        let response = self
            .request(
                "POST",
                "/api/shares",
                Some(json!({
                    "folder_path": "/photos/wedding",
                    "password": "secret",
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["share"]["id"]
            .as_str()
            .expect("share id in response")
            .to_string()
    }

    /// Register a raw connection with the hub and wait until it is live.
    pub async fn observe(&self, share_id: &str, user: &str) -> mpsc::Receiver<Arc<str>> {
        let share = ShareId::parse(share_id).expect("valid share id");
        let (handle, rx) = ConnectionHandle::new(share.clone(), user.to_string(), 16);
        self.realtime
            .hub
            .register(handle)
            .await
            .expect("hub accepts registration");
        self.realtime
            .hub
            .active_users(&share)
            .await
            .expect("hub answers");
        rx
    }

    /// Serve the router on an ephemeral port for real socket clients.
    pub async fn spawn_server(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server runs");
        });
        addr
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Receive the next event pushed to an observer, parsed as JSON.
pub async fn next_event(rx: &mut mpsc::Receiver<Arc<str>>) -> Value {
    let raw = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("event within timeout")
        .expect("queue open");
    serde_json::from_str(&raw).expect("event is JSON")
}

/// Test response wrapper
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

//! Mock notification hub speaking the JSON hub protocol over WebSocket.

#![allow(dead_code)]

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const HUB_PATH: &str = "/hubs/notifications";
pub const CONNECTION_TOKEN: &str = "conn-token-1";

/// One step of a scripted connection.
#[derive(Debug, Clone)]
pub enum HubAction {
    /// Send a raw text message (frames must carry their own separators).
    Send(String),
    Pause(u64),
    /// Close the socket abruptly.
    Drop,
}

impl HubAction {
    pub fn invoke(target: &str, arguments: serde_json::Value) -> Self {
        let frame = serde_json::json!({
            "type": 1,
            "target": target,
            "arguments": arguments,
        });
        HubAction::Send(format!("{}\u{1e}", frame))
    }

    pub fn close(allow_reconnect: bool, error: Option<&str>) -> Self {
        let mut frame = serde_json::json!({ "type": 7, "allowReconnect": allow_reconnect });
        if let Some(error) = error {
            frame["error"] = serde_json::Value::String(error.to_string());
        }
        HubAction::Send(format!("{}\u{1e}", frame))
    }
}

/// What the hub saw from one client connection.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRecord {
    pub query: Option<String>,
    pub handshake: Option<String>,
}

#[derive(Clone, Default)]
struct HubState {
    scripts: Arc<Mutex<VecDeque<Vec<HubAction>>>>,
    connections: Arc<Mutex<Vec<ConnectionRecord>>>,
    negotiate_auth: Arc<Mutex<Vec<Option<String>>>>,
    rejected: Arc<Mutex<usize>>,
    handshake_delay: Duration,
}

/// Each accepted connection consumes one script; with none left, upgrade
/// requests get 503.
pub struct MockHub {
    pub addr: SocketAddr,
    state: HubState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockHub {
    pub async fn start(scripts: Vec<Vec<HubAction>>) -> Self {
        Self::start_with_handshake_delay(scripts, Duration::ZERO).await
    }

    /// Like [`MockHub::start`], but each handshake reply is held back.
    pub async fn start_with_handshake_delay(
        scripts: Vec<Vec<HubAction>>,
        handshake_delay: Duration,
    ) -> Self {
        let state = HubState {
            handshake_delay,
            ..HubState::default()
        };
        *state.scripts.lock().await = scripts.into_iter().collect();

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
        let app = Router::new()
            .route(HUB_PATH, get(upgrade))
            .route(&format!("{}/negotiate", HUB_PATH), post(negotiate))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock hub");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, HUB_PATH)
    }

    pub async fn connections(&self) -> Vec<ConnectionRecord> {
        self.state.connections.lock().await.clone()
    }

    pub async fn negotiate_auth_headers(&self) -> Vec<Option<String>> {
        self.state.negotiate_auth.lock().await.clone()
    }

    pub async fn rejected_upgrades(&self) -> usize {
        *self.state.rejected.lock().await
    }
}

impl Drop for MockHub {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn negotiate(State(state): State<HubState>, headers: HeaderMap) -> Json<serde_json::Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.negotiate_auth.lock().await.push(auth);
    Json(serde_json::json!({
        "negotiateVersion": 1,
        "connectionId": "conn-id-1",
        "connectionToken": CONNECTION_TOKEN,
        "availableTransports": [
            { "transport": "WebSockets", "transferFormats": ["Text", "Binary"] }
        ]
    }))
}

async fn upgrade(
    State(state): State<HubState>,
    RawQuery(query): RawQuery,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(script) = state.scripts.lock().await.pop_front() else {
        *state.rejected.lock().await += 1;
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    ws.on_upgrade(move |socket| serve(socket, state, query, script))
}

async fn serve(
    mut socket: WebSocket,
    state: HubState,
    query: Option<String>,
    script: Vec<HubAction>,
) {
    let handshake = match socket.recv().await {
        Some(Ok(Message::Text(text))) => Some(text.as_str().to_string()),
        _ => None,
    };
    state.connections.lock().await.push(ConnectionRecord { query, handshake });
    tokio::time::sleep(state.handshake_delay).await;
    if socket.send(Message::Text("{}\u{1e}".into())).await.is_err() {
        return;
    }

    for action in script {
        match action {
            HubAction::Send(text) => {
                if socket.send(Message::Text(text.into())).await.is_err() {
                    return;
                }
            }
            HubAction::Pause(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            HubAction::Drop => return,
        }
    }

    // Stay open until the client goes away.
    while let Some(Ok(message)) = socket.recv().await {
        if matches!(message, Message::Close(_)) {
            break;
        }
    }
}

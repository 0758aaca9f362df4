//! WebSocket client for the notification hub.
//!
//! Connects (optionally after a negotiate round trip), performs the JSON
//! protocol handshake and turns invocations into [`HubEvent`]s. Lost
//! connections are retried on the configured delay schedule; a successful
//! reconnect starts the schedule over.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::config::{build_auth_header, HubConfig};
use crate::mvi::Reducer;
use crate::session::Session;
use crate::shutdown::ShutdownHandle;

use super::events::{
    ConnectionState, EmergencySummary, FlagsIntent, FlagsReducer, HubEvent, NotificationFlags,
};
use super::protocol::{
    handshake_request, parse_handshake_response, FrameBuffer, HubMessage, ProtocolError,
};

/// Connect plus handshake must finish within this.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(15);
/// Client pings at this interval so the server keeps the connection.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);
/// Silence from the server for this long counts as a lost connection.
const SERVER_TIMEOUT: Duration = Duration::from_secs(30);

type HubSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("Invalid hub URL: {0}")]
    InvalidUrl(String),

    #[error("Negotiation with the hub failed: {reason}")]
    Negotiate { reason: String },

    #[error("Failed to connect to the hub: {source}")]
    Connect {
        #[source]
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },

    #[error("Hub handshake failed: {0}")]
    Handshake(#[from] ProtocolError),

    #[error("Hub did not complete the handshake in time")]
    HandshakeTimeout,

    #[error("Gave up reconnecting to the hub after {attempts} attempt(s)")]
    ReconnectExhausted { attempts: usize },

    #[error("Hub closed the connection: {reason}")]
    Closed { reason: String },
}

/// Receives emergency alerts as they arrive.
pub trait AlertSink: Send + Sync {
    fn emergency(&self, summary: &EmergencySummary);
}

/// Alerts that only go to the log.
pub struct LogAlerts;

impl AlertSink for LogAlerts {
    fn emergency(&self, summary: &EmergencySummary) {
        tracing::warn!(request = %summary.describe(), "Emergency request received");
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NegotiateResponse {
    #[serde(default)]
    connection_token: Option<String>,
    #[serde(default)]
    connection_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// How one connected session ended.
#[derive(Debug)]
enum SessionEnd {
    Shutdown,
    Closed {
        error: Option<String>,
        allow_reconnect: bool,
    },
    Lost(String),
}

pub struct NotificationListener {
    config: HubConfig,
    session: Session,
    http: reqwest::Client,
    flags: watch::Sender<NotificationFlags>,
    alerts: Arc<dyn AlertSink>,
    events: Option<mpsc::UnboundedSender<HubEvent>>,
}

impl NotificationListener {
    pub fn new(config: HubConfig, session: Session) -> Result<Self, HubError> {
        Url::parse(&config.url).map_err(|e| HubError::InvalidUrl(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(HANDSHAKE_TIMEOUT)
            .build()
            .map_err(|e| HubError::Negotiate {
                reason: e.to_string(),
            })?;
        let (flags, _) = watch::channel(NotificationFlags::default());
        Ok(Self {
            config,
            session,
            http,
            flags,
            alerts: Arc::new(LogAlerts),
            events: None,
        })
    }

    pub fn with_alert_sink(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = alerts;
        self
    }

    /// Forward every event to `events` as well as into the flags.
    pub fn with_event_channel(mut self, events: mpsc::UnboundedSender<HubEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn flags(&self) -> NotificationFlags {
        self.flags.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationFlags> {
        self.flags.subscribe()
    }

    /// Acknowledge locally; the backend keeps its own read state.
    pub fn mark_all_read(&self) {
        self.dispatch(FlagsIntent::MarkAllRead);
        self.dispatch(FlagsIntent::AcknowledgeEmergency);
    }

    /// Run until shutdown, a final close from the server, or the reconnect
    /// schedule running out.
    ///
    /// A failure on the very first connection is returned immediately.
    pub async fn run(&self, shutdown: &ShutdownHandle) -> Result<(), HubError> {
        self.set_connection(ConnectionState::Connecting);
        let mut end = match self.connect_and_listen(shutdown).await {
            Ok(end) => end,
            Err(e) => {
                self.set_connection(ConnectionState::Disconnected);
                return Err(e);
            }
        };

        loop {
            match end {
                SessionEnd::Shutdown => {
                    self.set_connection(ConnectionState::Disconnected);
                    return Ok(());
                }
                SessionEnd::Closed {
                    error,
                    allow_reconnect: false,
                } => {
                    self.set_connection(ConnectionState::Disconnected);
                    tracing::info!(error = ?error, "Hub closed the connection");
                    return match error {
                        Some(reason) => Err(HubError::Closed { reason }),
                        None => Ok(()),
                    };
                }
                SessionEnd::Closed { error, .. } => {
                    tracing::info!(error = ?error, "Hub closed the connection, reconnecting");
                }
                SessionEnd::Lost(reason) => {
                    tracing::warn!(reason = %reason, "Hub connection lost, reconnecting");
                }
            }

            end = match self.reconnect(shutdown).await {
                Ok(end) => end,
                Err(e) => {
                    self.set_connection(ConnectionState::Disconnected);
                    return Err(e);
                }
            };
        }
    }

    async fn reconnect(&self, shutdown: &ShutdownHandle) -> Result<SessionEnd, HubError> {
        let delays = &self.config.reconnect_delays_seconds;
        for (index, delay) in delays.iter().enumerate() {
            let attempt = index + 1;
            self.set_connection(ConnectionState::Reconnecting { attempt });
            tokio::select! {
                _ = shutdown.wait() => return Ok(SessionEnd::Shutdown),
                _ = tokio::time::sleep(Duration::from_secs(*delay)) => {}
            }

            match self.connect_and_listen(shutdown).await {
                Ok(end) => return Ok(end),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Hub reconnect attempt failed");
                }
            }
        }
        Err(HubError::ReconnectExhausted {
            attempts: delays.len(),
        })
    }

    /// `Err` only when the connection could not be established.
    async fn connect_and_listen(&self, shutdown: &ShutdownHandle) -> Result<SessionEnd, HubError> {
        let opened = tokio::select! {
            _ = shutdown.wait() => return Ok(SessionEnd::Shutdown),
            opened = tokio::time::timeout(HANDSHAKE_TIMEOUT, self.open()) => opened,
        };
        let (socket, buffer, leftovers) = match opened {
            Ok(result) => result?,
            Err(_) => return Err(HubError::HandshakeTimeout),
        };
        self.set_connection(ConnectionState::Connected);
        tracing::info!(hub = %self.config.url, "Connected to notification hub");
        Ok(self.listen(socket, buffer, leftovers, shutdown).await)
    }

    async fn open(&self) -> Result<(HubSocket, FrameBuffer, Vec<String>), HubError> {
        let connection_token = if self.config.skip_negotiation {
            None
        } else {
            self.negotiate().await?
        };
        let url = self.socket_url(connection_token.as_deref())?;
        tracing::debug!(negotiated = connection_token.is_some(), "Opening hub socket");

        let (mut socket, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| HubError::Connect {
                source: Box::new(e),
            })?;

        socket
            .send(Message::text(handshake_request()))
            .await
            .map_err(|e| HubError::Connect {
                source: Box::new(e),
            })?;

        let mut buffer = FrameBuffer::new();
        loop {
            let message = match socket.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    return Err(HubError::Connect {
                        source: Box::new(e),
                    })
                }
                None => {
                    return Err(HubError::Handshake(ProtocolError::Malformed(
                        "connection closed during handshake".to_string(),
                    )))
                }
            };
            let Message::Text(text) = message else {
                continue;
            };
            let mut frames = buffer.push(text.as_str()).into_iter();
            if let Some(first) = frames.next() {
                parse_handshake_response(&first)?;
                return Ok((socket, buffer, frames.collect()));
            }
        }
    }

    async fn negotiate(&self) -> Result<Option<String>, HubError> {
        let mut url =
            Url::parse(&self.config.url).map_err(|e| HubError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| HubError::InvalidUrl(self.config.url.clone()))?
            .pop_if_empty()
            .push("negotiate");
        url.query_pairs_mut().append_pair("negotiateVersion", "1");

        let mut request = self.http.post(url);
        if let Some((name, value)) = build_auth_header(self.session.token()) {
            request = request.header(name, value);
        }
        let response = request.send().await.map_err(|e| HubError::Negotiate {
            reason: e.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(HubError::Negotiate {
                reason: format!("HTTP {}", status.as_u16()),
            });
        }
        let body: NegotiateResponse = response.json().await.map_err(|e| HubError::Negotiate {
            reason: e.to_string(),
        })?;
        if let Some(error) = body.error {
            return Err(HubError::Negotiate { reason: error });
        }
        Ok(body.connection_token.or(body.connection_id))
    }

    fn socket_url(&self, connection_token: Option<&str>) -> Result<Url, HubError> {
        let mut url =
            Url::parse(&self.config.url).map_err(|e| HubError::InvalidUrl(e.to_string()))?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| HubError::InvalidUrl(self.config.url.clone()))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(id) = connection_token {
                query.append_pair("id", id);
            }
            if let Some(token) = self.session.token() {
                query.append_pair("access_token", token.expose());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn listen(
        &self,
        socket: HubSocket,
        mut buffer: FrameBuffer,
        leftovers: Vec<String>,
        shutdown: &ShutdownHandle,
    ) -> SessionEnd {
        for frame in leftovers {
            if let Some(end) = self.handle_frame(&frame) {
                return end;
            }
        }

        let (mut sink, mut stream) = socket.split();
        let mut keep_alive =
            tokio::time::interval_at(Instant::now() + KEEP_ALIVE_INTERVAL, KEEP_ALIVE_INTERVAL);
        let server_timeout = tokio::time::sleep(SERVER_TIMEOUT);
        tokio::pin!(server_timeout);

        loop {
            tokio::select! {
                _ = shutdown.wait() => {
                    let _ = sink.send(Message::Close(None)).await;
                    return SessionEnd::Shutdown;
                }
                _ = keep_alive.tick() => {
                    if let Err(e) = sink.send(Message::text(HubMessage::Ping.encode())).await {
                        return SessionEnd::Lost(e.to_string());
                    }
                }
                _ = &mut server_timeout => {
                    return SessionEnd::Lost("server timeout elapsed".to_string());
                }
                message = stream.next() => {
                    server_timeout.as_mut().reset(Instant::now() + SERVER_TIMEOUT);
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            for frame in buffer.push(text.as_str()) {
                                if let Some(end) = self.handle_frame(&frame) {
                                    return end;
                                }
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let reason = frame
                                .map(|f| f.reason.to_string())
                                .filter(|r| !r.is_empty())
                                .unwrap_or_else(|| "socket closed".to_string());
                            return SessionEnd::Lost(reason);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return SessionEnd::Lost(e.to_string()),
                        None => return SessionEnd::Lost("stream ended".to_string()),
                    }
                }
            }
        }
    }

    fn handle_frame(&self, frame: &str) -> Option<SessionEnd> {
        match HubMessage::parse(frame) {
            Ok(HubMessage::Invocation { target, arguments }) => {
                self.deliver(HubEvent::from_invocation(&target, arguments));
                None
            }
            Ok(HubMessage::Ping) => None,
            Ok(HubMessage::Close {
                error,
                allow_reconnect,
            }) => Some(SessionEnd::Closed {
                error,
                allow_reconnect,
            }),
            Ok(HubMessage::Ignored(kind)) => {
                tracing::debug!(kind, "Ignoring hub message");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed hub frame");
                None
            }
        }
    }

    fn deliver(&self, event: HubEvent) {
        tracing::debug!(event = ?event, "Hub event");
        if let HubEvent::NewEmergencyRequest(summary) = &event {
            self.alerts.emergency(summary);
        }
        if let Some(events) = &self.events {
            let _ = events.send(event.clone());
        }
        self.dispatch(FlagsIntent::Received(event));
    }

    fn set_connection(&self, connection: ConnectionState) {
        self.dispatch(FlagsIntent::Connection(connection));
    }

    fn dispatch(&self, intent: FlagsIntent) {
        self.flags.send_modify(|state| {
            let current = std::mem::take(state);
            *state = FlagsReducer::reduce(current, intent);
        });
    }
}

//! Hub events and the local flags they drive.

use serde::Deserialize;
use serde_json::Value;

use crate::api::EntityId;
use crate::mvi::{Intent, Reducer, UiState};

pub mod targets {
    pub const RECEIVE_NOTIFICATION: &str = "ReceiveNotification";
    pub const NEW_EMERGENCY_REQUEST: &str = "NewEmergencyRequest";
    pub const DASHBOARD_UPDATE: &str = "DashboardUpdate";
    pub const EMERGENCY_REQUEST_UPDATED: &str = "EmergencyRequestUpdated";
}

/// What the hub said about an emergency request. Every field is optional
/// since the payload shape is owned by the backend.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencySummary {
    pub id: Option<EntityId>,
    pub patient_name: Option<String>,
    pub blood_group: Option<String>,
    pub quantity: Option<u32>,
    pub hospital_name: Option<String>,
    pub urgency: Option<String>,
    pub status: Option<String>,
}

impl EmergencySummary {
    fn from_argument(arg: Option<&Value>) -> Self {
        arg.and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// One-line description for alerts and logs.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(group) = &self.blood_group {
            parts.push(group.clone());
        }
        if let Some(units) = self.quantity {
            parts.push(format!("{} unit(s)", units));
        }
        if let Some(hospital) = &self.hospital_name {
            parts.push(format!("at {}", hospital));
        }
        if let Some(urgency) = &self.urgency {
            parts.push(format!("[{}]", urgency));
        }
        if parts.is_empty() {
            "details unavailable".to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    Notification {
        title: Option<String>,
        message: String,
    },
    NewEmergencyRequest(EmergencySummary),
    DashboardUpdate(Value),
    EmergencyRequestUpdated(EmergencySummary),
    Other {
        target: String,
        arguments: Vec<Value>,
    },
}

impl HubEvent {
    /// Map an invocation to an event. Unknown targets become `Other`.
    pub fn from_invocation(target: &str, arguments: Vec<Value>) -> Self {
        match target {
            targets::RECEIVE_NOTIFICATION => notification(&arguments),
            targets::NEW_EMERGENCY_REQUEST => {
                HubEvent::NewEmergencyRequest(EmergencySummary::from_argument(arguments.first()))
            }
            targets::DASHBOARD_UPDATE => {
                HubEvent::DashboardUpdate(arguments.into_iter().next().unwrap_or(Value::Null))
            }
            targets::EMERGENCY_REQUEST_UPDATED => HubEvent::EmergencyRequestUpdated(
                EmergencySummary::from_argument(arguments.first()),
            ),
            _ => HubEvent::Other {
                target: target.to_string(),
                arguments,
            },
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, HubEvent::NewEmergencyRequest(_))
    }
}

// Accepts `("text")`, `("title", "text")` and `({title, message})`.
fn notification(arguments: &[Value]) -> HubEvent {
    match arguments {
        [Value::Object(map), ..] => HubEvent::Notification {
            title: map.get("title").and_then(Value::as_str).map(String::from),
            message: map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        [Value::String(title), Value::String(message), ..] => HubEvent::Notification {
            title: Some(title.clone()),
            message: message.clone(),
        },
        [Value::String(message)] => HubEvent::Notification {
            title: None,
            message: message.clone(),
        },
        [other, ..] => HubEvent::Notification {
            title: None,
            message: other.to_string(),
        },
        [] => HubEvent::Notification {
            title: None,
            message: String::new(),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting {
        attempt: usize,
    },
}

/// Local UI flags fed by hub events.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationFlags {
    pub connection: ConnectionState,
    pub unread_count: u32,
    pub has_new_emergency: bool,
    pub last_emergency: Option<EmergencySummary>,
    /// Bumped on every dashboard update so views know to refetch.
    pub dashboard_revision: u64,
    pub last_notice: Option<String>,
}

impl UiState for NotificationFlags {}

#[derive(Debug, Clone)]
pub enum FlagsIntent {
    Connection(ConnectionState),
    Received(HubEvent),
    MarkAllRead,
    AcknowledgeEmergency,
}

impl Intent for FlagsIntent {}

pub struct FlagsReducer;

impl Reducer for FlagsReducer {
    type State = NotificationFlags;
    type Intent = FlagsIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FlagsIntent::Connection(connection) => {
                state.connection = connection;
            }
            FlagsIntent::Received(event) => match event {
                HubEvent::Notification { title, message } => {
                    state.unread_count = state.unread_count.saturating_add(1);
                    state.last_notice = Some(match title {
                        Some(title) => format!("{}: {}", title, message),
                        None => message,
                    });
                }
                HubEvent::NewEmergencyRequest(summary) => {
                    state.unread_count = state.unread_count.saturating_add(1);
                    state.has_new_emergency = true;
                    state.last_emergency = Some(summary);
                    state.dashboard_revision += 1;
                }
                HubEvent::EmergencyRequestUpdated(_) | HubEvent::DashboardUpdate(_) => {
                    state.dashboard_revision += 1;
                }
                HubEvent::Other { .. } => {}
            },
            FlagsIntent::MarkAllRead => {
                state.unread_count = 0;
            }
            FlagsIntent::AcknowledgeEmergency => {
                state.has_new_emergency = false;
            }
        }
        state
    }
}

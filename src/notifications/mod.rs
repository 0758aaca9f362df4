//! Real-time notification channel.
//!
//! `protocol` handles framing, `events` maps invocations to typed events and
//! folds them into [`NotificationFlags`], `listener` owns the connection.

mod events;
mod listener;
mod protocol;

pub use events::{
    targets, ConnectionState, EmergencySummary, FlagsIntent, FlagsReducer, HubEvent,
    NotificationFlags,
};
pub use listener::{AlertSink, HubError, LogAlerts, NotificationListener};
pub use protocol::{
    handshake_request, parse_handshake_response, FrameBuffer, HubMessage, ProtocolError,
    RECORD_SEPARATOR,
};

//! WebSocket message types.

use darkscan_protocols::AggregateReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Ping/heartbeat.
    Ping { timestamp: i64 },

    /// Pong response.
    Pong { timestamp: i64 },

    /// Client asks for a pass over both tiers.
    Redo,

    /// Whether a requested pass was started.
    Started { started: bool },

    /// Report after a completed pass.
    Results(AggregateReport),

    /// Error message.
    Error { code: String, message: String },
}

impl WsMessage {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

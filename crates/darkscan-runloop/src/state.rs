//! Scheduler state.

use serde::{Deserialize, Serialize};

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SchedulerState {
    /// Waiting for mutations or an explicit request.
    Idle = 0,
    /// A pass holds the scan lock.
    Scanning = 1,
}

impl From<u8> for SchedulerState {
    fn from(value: u8) -> Self {
        match value {
            1 => SchedulerState::Scanning,
            _ => SchedulerState::Idle,
        }
    }
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerState::Idle => write!(f, "idle"),
            SchedulerState::Scanning => write!(f, "scanning"),
        }
    }
}

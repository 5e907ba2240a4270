//! # darkscan RunLoop
//!
//! Mutation-driven scheduling of detection passes.
//!
//! ```text
//!  live document ──MutationRecord──▶ change channel ──▶ Scheduler::run
//!                                                          │
//!                          settle ─▶ snapshot A ─▶ delay ─▶ snapshot B
//!                                                          │
//!                                    diff ─▶ aggregate ─▶ broadcast
//! ```
//!
//! ## Key Components
//!
//! - [`Scheduler`]: Idle/Scanning state machine around one scan session
//! - [`SchedulerConfig`]: Delays and snapshot denylist
//! - [`ScanMetrics`]: Pass counters

pub mod config;
pub mod error;
pub mod metrics;
pub mod scheduler;
pub mod state;

pub use config::SchedulerConfig;
pub use error::{SchedulerError, SchedulerResult};
pub use metrics::{MetricsSnapshot, ScanMetrics};
pub use scheduler::Scheduler;
pub use state::SchedulerState;

// Re-export CancellationToken for convenience
pub use tokio_util::sync::CancellationToken;

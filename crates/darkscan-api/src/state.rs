//! Application state.

use std::sync::Arc;
use std::time::Instant;

use darkscan_protocols::{ActivationSource, FeedbackSink};
use darkscan_runloop::Scheduler;

/// State shared across handlers.
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
    pub activation: Arc<dyn ActivationSource>,
    /// Where user judgments go. Without one, feedback is accepted and dropped.
    pub feedback: Option<Arc<dyn FeedbackSink>>,
    start_time: Instant,
}

impl AppState {
    pub fn new(scheduler: Arc<Scheduler>, activation: Arc<dyn ActivationSource>) -> Self {
        Self {
            scheduler,
            activation,
            feedback: None,
            start_time: Instant::now(),
        }
    }

    pub fn with_feedback_sink(mut self, sink: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = Some(sink);
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

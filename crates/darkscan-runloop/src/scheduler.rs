//! Scan scheduler.
//!
//! Drives passes of the diff engine over one [`ScanSession`]. A pass runs
//! Idle -> Scanning -> Idle under the session lock; requests arriving while
//! a pass is in flight are dropped. Mutation records from the live document
//! arrive on a channel and trigger a text pass followed by an image pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use darkscan_core::{DiffEngine, MutationRecord, ScanSession, aggregate};
use darkscan_protocols::{ActivationSource, AggregateReport, ScanMode};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::metrics::ScanMetrics;
use crate::state::SchedulerState;

pub struct Scheduler {
    session: Arc<ScanSession>,
    engine: Arc<DiffEngine>,
    config: SchedulerConfig,
    state: AtomicU8,
    results: broadcast::Sender<AggregateReport>,
    changes: Mutex<Option<mpsc::UnboundedReceiver<MutationRecord>>>,
    metrics: ScanMetrics,
}

impl Scheduler {
    /// Create a scheduler and attach its observer to the session's document.
    pub fn new(session: Arc<ScanSession>, engine: Arc<DiffEngine>, config: SchedulerConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        session.document().write().attach_observer(tx);
        let (results, _) = broadcast::channel(config.broadcast_capacity.max(1));

        Self {
            session,
            engine,
            config,
            state: AtomicU8::new(SchedulerState::Idle as u8),
            results,
            changes: Mutex::new(Some(rx)),
            metrics: ScanMetrics::new(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState::from(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: SchedulerState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    pub fn session(&self) -> &Arc<ScanSession> {
        &self.session
    }

    pub fn engine(&self) -> &Arc<DiffEngine> {
        &self.engine
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Receive the report of every completed pass.
    pub fn subscribe(&self) -> broadcast::Receiver<AggregateReport> {
        self.results.subscribe()
    }

    /// Current report, computed from the live markers.
    pub fn report(&self) -> AggregateReport {
        let doc = self.session.document().read();
        aggregate(&doc, self.engine.rules(), self.engine.markers())
    }

    /// Run one pass. Returns `None` when another pass holds the lock.
    pub async fn scan(&self, mode: ScanMode, wait_for_changes: bool) -> Option<AggregateReport> {
        let Some(lock) = self.session.try_begin() else {
            debug!(%mode, "Scan already in progress, dropping request");
            self.metrics.record_dropped();
            return None;
        };
        Some(self.run_pass(lock, mode, wait_for_changes).await)
    }

    /// Body of a pass. `lock` is the claimed session lock, held until the end.
    async fn run_pass<L>(&self, lock: L, mode: ScanMode, wait_for_changes: bool) -> AggregateReport {
        let _pass = PassGuard::enter(self, lock);
        let started = Instant::now();
        let document = self.session.document();

        if wait_for_changes {
            sleep(self.config.settle_delay).await;
        }
        let markers = self.engine.markers();
        let mut previous = self.session.capture(&self.config.denylist, markers);
        sleep(self.config.observation_delay).await;
        let mut current = self.session.capture(&self.config.denylist, markers);

        let outcome = self.engine.diff(document, &mut current, &mut previous, mode).await;
        drop(current);
        drop(previous);

        let report = self.report();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.metrics.record_scan(outcome.detections.len() as u64, elapsed_ms);
        info!(
            %mode,
            detections = outcome.detections.len(),
            visited = outcome.visited,
            stale = outcome.stale,
            total = report.total,
            total_visible = report.total_visible,
            elapsed_ms,
            "Scan complete"
        );
        // No subscribers is fine.
        let _ = self.results.send(report.clone());
        report
    }

    /// Spawn a pass over both tiers without settle delay.
    ///
    /// Returns whether the pass was started; a request made while another
    /// pass is running is dropped.
    pub fn request_scan(self: &Arc<Self>, mode: ScanMode) -> bool {
        let Some(lock) = self.session.try_begin_owned() else {
            debug!(%mode, "Scan requested while busy");
            self.metrics.record_dropped();
            return false;
        };
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            scheduler.run_pass(lock, mode, false).await;
        });
        true
    }

    /// Initial passes after load: text then image, without settle delay.
    ///
    /// Nothing runs when the activation source reports the engine disabled.
    pub async fn start(&self, activation: &dyn ActivationSource) -> Option<AggregateReport> {
        if !activation.activation_state().await.is_enabled {
            info!("Detection is deactivated, not scanning");
            return None;
        }
        self.scan(ScanMode::Text, false).await;
        self.scan(ScanMode::Image, false).await
    }

    /// Consume mutation records until cancelled.
    ///
    /// Each burst of records triggers a text pass and then an image pass,
    /// both waiting for the page to settle first.
    pub async fn run(&self, cancel: CancellationToken) -> SchedulerResult<()> {
        let mut changes = self
            .changes
            .lock()
            .take()
            .ok_or(SchedulerError::AlreadyRunning)?;
        info!("Scheduler watching for document changes");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Scheduler shutting down");
                    return Ok(());
                }
                record = changes.recv() => {
                    let Some(record) = record else {
                        return Err(SchedulerError::ChannelClosed);
                    };
                    let mut burst = 1u64;
                    while changes.try_recv().is_ok() {
                        burst += 1;
                    }
                    self.metrics.record_mutations(burst);
                    debug!(burst, kind = ?record.kind, target = ?record.target, "Document changed");

                    self.scan(ScanMode::Text, true).await;
                    self.scan(ScanMode::Image, true).await;
                }
            }
        }
    }
}

/// Scanning state and a paused observer for the lifetime of one pass.
///
/// Dropping it, on return or while unwinding, re-arms the observer and goes
/// back to Idle before the session lock `L` is released.
struct PassGuard<'a, L> {
    scheduler: &'a Scheduler,
    _lock: L,
}

impl<'a, L> PassGuard<'a, L> {
    fn enter(scheduler: &'a Scheduler, lock: L) -> Self {
        scheduler.set_state(SchedulerState::Scanning);
        scheduler.session.document().write().disconnect_observer();
        Self { scheduler, _lock: lock }
    }
}

impl<L> Drop for PassGuard<'_, L> {
    fn drop(&mut self) {
        self.scheduler.session.document().write().observe();
        self.scheduler.set_state(SchedulerState::Idle);
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

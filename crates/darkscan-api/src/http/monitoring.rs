//! Liveness and scan metrics.

use std::sync::Arc;

use axum::{Json, extract::State};
use darkscan_runloop::{MetricsSnapshot, SchedulerState};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub state: SchedulerState,
    pub uptime_seconds: u64,
    #[serde(flatten)]
    pub scans: MetricsSnapshot,
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        state: state.scheduler.state(),
        uptime_seconds: state.uptime_seconds(),
        scans: state.scheduler.metrics().snapshot(),
    })
}

/// GET /livez
pub async fn liveness_probe() -> Json<Value> {
    Json(serde_json::json!({ "status": "alive" }))
}

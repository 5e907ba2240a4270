//! Pattern, activation and feedback handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use darkscan_core::reveal;
use darkscan_protocols::{
    ActivationState, AggregateReport, FeedbackEvent, Judgment, PatternId, Phid, ScanMode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedoResponse {
    pub started: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub show_element: Phid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub phid: Phid,
    pub prediction: Judgment,
}

/// Pattern table entry as shown to hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInfo {
    pub id: PatternId,
    pub name: String,
    pub info_url: String,
    pub info: String,
    pub languages: Vec<String>,
}

/// GET /patterns/count
pub async fn pattern_count(State(state): State<Arc<AppState>>) -> Json<AggregateReport> {
    Json(state.scheduler.report())
}

/// POST /patterns/redo
///
/// Starts a pass over both tiers without waiting for it.
pub async fn redo(State(state): State<Arc<AppState>>) -> Json<RedoResponse> {
    let started = state.scheduler.request_scan(ScanMode::Both);
    info!(started, "Rescan requested");
    Json(RedoResponse { started })
}

/// POST /patterns/show
///
/// Always reports success; an identity that no longer resolves just clears
/// the current highlight.
pub async fn show(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ShowRequest>,
) -> Result<Json<Value>, ApiError> {
    let scheduler = &state.scheduler;
    let found = {
        let mut doc = scheduler.session().document().write();
        // The overlay is ours, so it must not look like a page change.
        let observing = doc.is_observing();
        if observing {
            doc.disconnect_observer();
        }
        let result = reveal(&mut doc, scheduler.engine().markers(), req.show_element);
        if observing {
            doc.observe();
        }
        result?
    };
    debug!(phid = %req.show_element, found, "Reveal requested");
    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /patterns
pub async fn list_patterns(State(state): State<Arc<AppState>>) -> Json<Vec<PatternInfo>> {
    let patterns = state
        .scheduler
        .engine()
        .rules()
        .patterns()
        .iter()
        .map(|p| PatternInfo {
            id: p.id.clone(),
            name: p.name.clone(),
            info_url: p.info_url.clone(),
            info: p.info.clone(),
            languages: p.languages.clone(),
        })
        .collect();
    Json(patterns)
}

/// GET /activation
pub async fn activation(State(state): State<Arc<AppState>>) -> Json<ActivationState> {
    Json(state.activation.activation_state().await)
}

/// POST /feedback
///
/// Delivery is fire-and-forget; the sink's response is only logged.
pub async fn feedback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeedbackRequest>,
) -> Result<StatusCode, ApiError> {
    let text = {
        let doc = state.scheduler.session().document().read();
        doc.feedback_text(req.phid).map(str::to_string)
    };
    let text = text.ok_or_else(|| {
        ApiError::NotFound(format!("no feedback affordance for node {}", req.phid))
    })?;

    let event = FeedbackEvent {
        text,
        prediction: req.prediction,
    };
    match &state.feedback {
        Some(sink) => {
            let sink = Arc::clone(sink);
            tokio::spawn(async move {
                if let Err(e) = sink.send_feedback(&event).await {
                    warn!(error = %e, "Failed to deliver feedback");
                }
            });
        }
        None => debug!(phid = %req.phid, "No feedback sink configured, dropping judgment"),
    }
    Ok(StatusCode::ACCEPTED)
}

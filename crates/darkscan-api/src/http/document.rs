//! Document ingestion handlers.
//!
//! Hosts keep the live tree current either by replacing it wholesale or by
//! streaming patches. Both go through the document's observer, so the
//! scheduler rescans after them.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use darkscan_core::{DocumentError, DocumentPatch, Page, PageNode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `PUT /document`: a full page or just its root element.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DocumentBody {
    Page(Page),
    Root(PageNode),
}

impl DocumentBody {
    pub fn into_page(self) -> Page {
        match self {
            DocumentBody::Page(page) => page,
            DocumentBody::Root(root) => Page {
                viewport: Default::default(),
                root,
            },
        }
    }
}

/// PUT /document
pub async fn load_document(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DocumentBody>,
) -> Result<StatusCode, ApiError> {
    let page = body.into_page();
    state.scheduler.session().load_page(&page)?;
    info!("Live document replaced");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /document
pub async fn export_document(State(state): State<Arc<AppState>>) -> Result<Json<Page>, ApiError> {
    let doc = state.scheduler.session().document().read();
    let root = doc.to_page(doc.root()).ok_or(DocumentError::UnknownNode)?;
    Ok(Json(Page {
        viewport: *doc.viewport(),
        root,
    }))
}

/// POST /document/patches
pub async fn apply_patches(
    State(state): State<Arc<AppState>>,
    Json(patches): Json<Vec<DocumentPatch>>,
) -> Result<Json<Value>, ApiError> {
    let applied = state
        .scheduler
        .session()
        .document()
        .write()
        .apply_all(&patches)
        .map_err(|(index, source)| ApiError::Patch { index, source })?;
    debug!(applied, "Patches applied");
    Ok(Json(serde_json::json!({ "applied": applied })))
}

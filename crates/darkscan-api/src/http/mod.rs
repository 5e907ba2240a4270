//! HTTP interface module.
//!
//! Provides REST endpoints for:
//! - Pattern counts, rescans and highlight
//! - Activation and user feedback
//! - Document ingestion
//! - Liveness and scan metrics

pub mod document;
pub mod handlers;
pub mod routes;

pub(crate) mod monitoring;

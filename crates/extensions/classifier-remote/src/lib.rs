//! Remote classifier client for darkscan.
//!
//! Talks to the classification service over JSON/HTTP: one endpoint for
//! text leaves, one for images, one collecting user feedback.

mod api;
mod client;

pub use client::RemoteClassifier;

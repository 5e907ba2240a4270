//! # darkscan Protocols
//!
//! Shared value types and collaborator traits for the darkscan engine.
//! Contains only interface definitions and plain data.
//!
//! ## Core Traits
//!
//! - [`TextClassifier`] - Remote statistical classifier for text leaves
//! - [`ImageClassifier`] - Remote classifier for leaf images
//! - [`FeedbackSink`] - Receiver of user judgments on flagged nodes
//! - [`ActivationSource`] - Whether the engine may run at all

pub mod activation;
pub mod classifier;
pub mod error;
pub mod types;

pub use activation::{ActivationSource, StaticActivation};
pub use classifier::{FeedbackSink, ImageClassifier, TextClassifier};
pub use error::ClassifierError;
pub use types::*;

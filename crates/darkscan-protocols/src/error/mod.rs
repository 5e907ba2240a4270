//! Error types for collaborator protocols.

mod classifier;

pub use classifier::ClassifierError;

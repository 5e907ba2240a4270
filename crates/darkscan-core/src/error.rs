//! Error types for the core engine.

use darkscan_protocols::Phid;
use thiserror::Error;

/// Errors from live document manipulation.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("No node with identity {0}")]
    UnknownPhid(Phid),

    #[error("Node does not exist in this document")]
    UnknownNode,

    #[error("Operation requires an element node")]
    NotAnElement,

    #[error("Node has no parent")]
    Detached,

    #[error("The root node cannot be removed")]
    RootRemoval,

    #[error("Inserting this node would create a cycle")]
    Cycle,

    #[error("Invalid page description: {0}")]
    InvalidPage(String),
}

/// Errors from building the pattern table.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Duplicate pattern id: {0}")]
    DuplicateId(String),

    #[error("Pattern {pattern}: {field} must not be empty")]
    EmptyField { pattern: String, field: &'static str },

    #[error("Pattern {0} has no detectors")]
    NoDetectors(String),

    #[error("Pattern {pattern}: invalid regex: {message}")]
    InvalidRegex { pattern: String, message: String },
}

/// Engine start-up errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid pattern table: {0}")]
    InvalidPatternTable(#[from] RuleError),

    #[error("Engine is deactivated")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_error_display() {
        let err = DocumentError::UnknownPhid(Phid(17));
        assert!(err.to_string().contains("17"));
        assert!(DocumentError::RootRemoval.to_string().contains("root"));
    }

    #[test]
    fn test_rule_error_display() {
        let err = RuleError::EmptyField {
            pattern: "countdown".to_string(),
            field: "info_url",
        };
        let display = err.to_string();
        assert!(display.contains("countdown"));
        assert!(display.contains("info_url"));
    }

    #[test]
    fn test_engine_error_from_rule_error() {
        let err: EngineError = RuleError::DuplicateId("urgency".to_string()).into();
        assert!(matches!(err, EngineError::InvalidPatternTable(_)));
        assert!(err.to_string().contains("urgency"));
    }
}

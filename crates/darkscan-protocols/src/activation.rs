//! Activation toggle.

use async_trait::async_trait;

use crate::types::ActivationState;

/// Source of the user's on/off toggle for the engine.
#[async_trait]
pub trait ActivationSource: Send + Sync {
    async fn activation_state(&self) -> ActivationState;
}

/// Activation fixed at construction, typically from configuration.
#[derive(Debug, Clone, Copy)]
pub struct StaticActivation {
    enabled: bool,
}

impl StaticActivation {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl ActivationSource for StaticActivation {
    async fn activation_state(&self) -> ActivationState {
        ActivationState {
            is_enabled: self.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_activation() {
        assert!(StaticActivation::new(true).activation_state().await.is_enabled);
        assert!(!StaticActivation::new(false).activation_state().await.is_enabled);
    }
}

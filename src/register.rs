//! Engine assembly from configuration.

use std::sync::Arc;

use anyhow::Result;
use darkscan_classifier_remote::RemoteClassifier;
use darkscan_config::Config;
use darkscan_core::{DiffEngine, EngineError, RulePipeline};
use tracing::{error, info};

/// The engine plus the remote service, when one is configured.
pub(crate) struct Engine {
    pub diff: Arc<DiffEngine>,
    pub remote: Option<Arc<RemoteClassifier>>,
}

/// Build the pattern table. An invalid table disables the engine.
pub(crate) fn build_rules(config: &Config) -> Result<RulePipeline, EngineError> {
    RulePipeline::from_config(&config.patterns).map_err(|e| {
        let err = EngineError::InvalidPatternTable(e);
        error!(error = %err, "Pattern table rejected, engine will not start");
        err
    })
}

pub(crate) fn build_engine(config: &Config) -> Result<Engine> {
    let rules = Arc::new(build_rules(config)?);
    info!(patterns = rules.patterns().len(), "Pattern table loaded");

    let mut diff = DiffEngine::from_config(rules, &config.engine);
    let remote = if config.classifier.enabled {
        let client = Arc::new(RemoteClassifier::from_config(&config.classifier)?);
        diff = diff
            .with_text_classifier(client.clone())
            .with_image_classifier(client.clone());
        info!(base_url = %config.classifier.base_url, "Remote classifier enabled");
        Some(client)
    } else {
        info!("Remote classifier disabled, running rules only");
        None
    };

    Ok(Engine {
        diff: Arc::new(diff),
        remote,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkscan_config::{ConfigLoader, CustomPatternConfig};

    #[test]
    fn test_disabled_patterns_are_removed() {
        let mut config = Config::default();
        config.patterns.disabled = vec!["urgency".to_string()];
        let rules = build_rules(&config).unwrap();
        assert_eq!(rules.patterns().len(), 7);
        assert!(rules.get("urgency").is_none());
    }

    #[test]
    fn test_invalid_custom_regex_disables_engine() {
        let mut config = Config::default();
        config.patterns.custom.push(CustomPatternConfig {
            id: "broken".to_string(),
            name: "Broken".to_string(),
            info_url: "https://example.com".to_string(),
            info: "Never matches".to_string(),
            languages: vec!["en".to_string()],
            regexes: vec!["(unclosed".to_string()],
        });
        let err = build_rules(&config).err().unwrap();
        assert!(matches!(err, EngineError::InvalidPatternTable(_)));
        assert!(build_engine(&config).is_err());
    }

    #[test]
    fn test_rules_only_engine() {
        let config = ConfigLoader::load_str("[classifier]\nenabled = false\n").unwrap();
        let engine = build_engine(&config).unwrap();
        assert!(engine.remote.is_none());
        assert_eq!(engine.diff.rules().patterns().len(), 8);
    }

    #[test]
    fn test_remote_classifier_is_shared() {
        let engine = build_engine(&Config::default()).unwrap();
        assert!(engine.remote.is_some());
    }
}

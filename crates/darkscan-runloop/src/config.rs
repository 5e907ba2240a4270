//! Scheduler timing and snapshot settings.

use std::time::Duration;

use darkscan_config::EngineConfig;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Wait before the first snapshot when a scan follows a mutation.
    pub settle_delay: Duration,

    /// Wait between the two snapshots of one pass.
    pub observation_delay: Duration,

    /// Tags left out of snapshots.
    pub denylist: Vec<String>,

    /// Capacity of the result broadcast channel.
    pub broadcast_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for SchedulerConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            observation_delay: Duration::from_millis(config.observation_delay_ms),
            denylist: config.denylist.clone(),
            broadcast_capacity: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_engine_config() {
        let engine = EngineConfig {
            settle_delay_ms: 500,
            observation_delay_ms: 250,
            ..Default::default()
        };
        let config = SchedulerConfig::from(&engine);
        assert_eq!(config.settle_delay, Duration::from_millis(500));
        assert_eq!(config.observation_delay, Duration::from_millis(250));
        assert!(config.denylist.iter().any(|t| t == "script"));
    }

    #[test]
    fn test_default_delays() {
        let config = SchedulerConfig::default();
        assert_eq!(config.settle_delay, Duration::from_secs(2));
        assert_eq!(config.observation_delay, Duration::from_secs(2));
    }
}

//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load from `path` if given, else from the default location, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.exists() => Self::load(&default),
            _ => Ok(Config::default()),
        }
    }

    /// `~/.darkscan/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".darkscan").join("config.toml"))
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::Rejected(e.to_string()))?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.darkscan/logs`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.engine.settle_delay_ms, 2000);
    }

    #[test]
    fn test_load_engine_section() {
        let content = r#"
            [engine]
            settle_delay_ms = 500
            observation_delay_ms = 750
            denylist = ["script", "template"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.engine.settle_delay_ms, 500);
        assert_eq!(config.engine.observation_delay_ms, 750);
        assert_eq!(config.engine.denylist, vec!["script", "template"]);
        assert_eq!(config.engine.marker_prefix, "__ph__");
    }

    #[test]
    fn test_load_custom_patterns() {
        let content = r#"
            [patterns]
            disabled = ["sneaking"]

            [[patterns.custom]]
            id = "confirmshaming"
            name = "Confirmshaming"
            info_url = "https://example.com/confirmshaming"
            info = "Guilt-trips the user into opting in."
            regexes = ["no thanks, i (?:don't|do not) like"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.patterns.disabled, vec!["sneaking"]);
        assert_eq!(config.patterns.custom.len(), 1);
        assert_eq!(config.patterns.custom[0].languages, vec!["en"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[classifier]").unwrap();
        writeln!(file, "base_url = \"http://10.0.0.5:5000\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.classifier.base_url, "http://10.0.0.5:5000");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/darkscan.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_explicit_missing() {
        let result = ConfigLoader::load_or_default(Some(Path::new("/nonexistent/darkscan.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test-only variable with a unique name
        unsafe {
            std::env::set_var("DARKSCAN_TEST_CLASSIFIER", "http://classifier:5000");
        }
        let content = "[classifier]\nbase_url = \"${DARKSCAN_TEST_CLASSIFIER}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.classifier.base_url, "http://classifier:5000");
        unsafe {
            std::env::remove_var("DARKSCAN_TEST_CLASSIFIER");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${DARKSCAN_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/logs");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/logs"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        assert_eq!(ConfigLoader::expand_path("/var/log"), "/var/log");
    }
}

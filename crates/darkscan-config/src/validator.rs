//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into a single error if anything failed.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            return Ok(self.warnings);
        }
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ConfigError::Rejected(joined))
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_engine(config, &mut result);
        Self::validate_classifier(config, &mut result);
        Self::validate_patterns(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_engine(config: &Config, result: &mut ValidationResult) {
        let engine = &config.engine;

        if engine.observation_delay_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "engine.observation_delay_ms",
                "Zero observation delay makes temporal (countdown) detection ineffective",
            ));
        }

        if engine.min_text_len >= engine.max_text_len {
            result.add_error(ValidationError::new(
                "engine.max_text_len",
                "max_text_len must be greater than min_text_len",
            ));
        }

        if engine.marker_prefix.trim().is_empty() {
            result.add_error(ValidationError::new(
                "engine.marker_prefix",
                "Marker prefix cannot be empty",
            ));
        } else if engine.marker_prefix.contains(char::is_whitespace) {
            result.add_error(ValidationError::new(
                "engine.marker_prefix",
                "Marker prefix cannot contain whitespace",
            ));
        }

        for (i, tag) in engine.denylist.iter().enumerate() {
            if tag.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("engine.denylist[{}]", i),
                    "Denylisted tag cannot be empty",
                ));
            }
        }
    }

    fn validate_classifier(config: &Config, result: &mut ValidationResult) {
        let classifier = &config.classifier;
        if !classifier.enabled {
            result.add_warning(ValidationWarning::new(
                "classifier.enabled",
                "Remote classifier disabled, only deterministic rules will run",
            ));
            return;
        }

        match url::Url::parse(&classifier.base_url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            Ok(_) => result.add_error(ValidationError::new(
                "classifier.base_url",
                "Base URL must use http or https",
            )),
            Err(e) => result.add_error(ValidationError::new(
                "classifier.base_url",
                format!("Invalid URL: {}", e),
            )),
        }

        for (field, path) in [
            ("classifier.text_path", &classifier.text_path),
            ("classifier.image_path", &classifier.image_path),
            ("classifier.feedback_path", &classifier.feedback_path),
        ] {
            if !path.starts_with('/') {
                result.add_error(ValidationError::new(field, "Endpoint path must start with '/'"));
            }
        }

        if classifier.timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "classifier.timeout_secs",
                "timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_patterns(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (i, pattern) in config.patterns.custom.iter().enumerate() {
            let base = format!("patterns.custom[{}]", i);

            if pattern.id.trim().is_empty() {
                result.add_error(ValidationError::new(format!("{}.id", base), "Pattern id cannot be empty"));
            } else if !seen.insert(pattern.id.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.id", base),
                    format!("Duplicate pattern id '{}'", pattern.id),
                ));
            }

            if pattern.name.trim().is_empty() {
                result.add_error(ValidationError::new(format!("{}.name", base), "Pattern name cannot be empty"));
            }

            if pattern.info_url.trim().is_empty() || pattern.info.trim().is_empty() {
                result.add_error(ValidationError::new(
                    base.clone(),
                    "info_url and info must both be set",
                ));
            }

            if pattern.languages.is_empty() || pattern.languages.iter().any(|l| l.trim().is_empty()) {
                result.add_error(ValidationError::new(
                    format!("{}.languages", base),
                    "Languages must be a non-empty list of non-empty codes",
                ));
            }

            if pattern.regexes.is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.regexes", base),
                    "At least one regex is required",
                ));
            }

            for (j, source) in pattern.regexes.iter().enumerate() {
                if let Err(e) = regex::RegexBuilder::new(source).case_insensitive(true).build() {
                    result.add_error(ValidationError::new(
                        format!("{}.regexes[{}]", base, j),
                        format!("Invalid regex: {}", e),
                    ));
                }
            }
        }

        let mut disabled = HashSet::new();
        for id in &config.patterns.disabled {
            if !disabled.insert(id.as_str()) {
                result.add_warning(ValidationWarning::new(
                    "patterns.disabled",
                    format!("Pattern '{}' is disabled more than once", id),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

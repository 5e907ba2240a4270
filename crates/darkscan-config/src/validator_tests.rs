    use super::*;
    use crate::schema::CustomPatternConfig;

    fn custom(id: &str, regexes: &[&str]) -> CustomPatternConfig {
        CustomPatternConfig {
            id: id.to_string(),
            name: "Custom".to_string(),
            info_url: "https://example.com/custom".to_string(),
            info: "A custom pattern.".to_string(),
            languages: vec!["en".to_string()],
            regexes: regexes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_invalid_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "server.port"));
    }

    #[test]
    fn test_validate_text_len_bounds() {
        let mut config = Config::default();
        config.engine.min_text_len = 100;
        config.engine.max_text_len = 100;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "engine.max_text_len"));
    }

    #[test]
    fn test_validate_zero_observation_delay_warns() {
        let mut config = Config::default();
        config.engine.observation_delay_ms = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "engine.observation_delay_ms"));
    }

    #[test]
    fn test_validate_empty_marker_prefix() {
        let mut config = Config::default();
        config.engine.marker_prefix = " ".to_string();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "engine.marker_prefix"));
    }

    #[test]
    fn test_validate_invalid_base_url() {
        let mut config = Config::default();
        config.classifier.base_url = "not a url".to_string();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "classifier.base_url"));
    }

    #[test]
    fn test_validate_non_http_scheme() {
        let mut config = Config::default();
        config.classifier.base_url = "ftp://127.0.0.1".to_string();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "classifier.base_url"));
    }

    #[test]
    fn test_validate_disabled_classifier_skips_url() {
        let mut config = Config::default();
        config.classifier.enabled = false;
        config.classifier.base_url = "not a url".to_string();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_validate_endpoint_path() {
        let mut config = Config::default();
        config.classifier.text_path = "predict".to_string();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "classifier.text_path"));
    }

    #[test]
    fn test_validate_custom_pattern_ok() {
        let mut config = Config::default();
        config.patterns.custom.push(custom("nagging", &[r"\bremind me later\b"]));

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn test_validate_duplicate_custom_ids() {
        let mut config = Config::default();
        config.patterns.custom.push(custom("nagging", &["a"]));
        config.patterns.custom.push(custom("nagging", &["b"]));

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.message.contains("Duplicate")));
    }

    #[test]
    fn test_validate_bad_regex() {
        let mut config = Config::default();
        config.patterns.custom.push(custom("broken", &["(unclosed"]));

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "patterns.custom[0].regexes[0]"));
    }

    #[test]
    fn test_validate_missing_regexes_and_languages() {
        let mut config = Config::default();
        let mut pattern = custom("empty", &[]);
        pattern.languages.clear();
        config.patterns.custom.push(pattern);

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "patterns.custom[0].regexes"));
        assert!(result.errors.iter().any(|e| e.path == "patterns.custom[0].languages"));
    }

    #[test]
    fn test_into_result_joins_errors() {
        let mut config = Config::default();
        config.server.port = 0;
        config.server.host.clear();

        let err = ConfigValidator::validate(&config).unwrap().into_result().unwrap_err();
        let display = err.to_string();
        assert!(display.contains("server.port"));
        assert!(display.contains("server.host"));
    }

//! Config validation: field checks with user-friendly messages.

use crate::schema::HauteConfig;
use thiserror::Error;

const KNOWN_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Latencies above this make the session feel hung.
const SLOW_LATENCY_MS: u64 = 10_000;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &HauteConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_selection(config, &mut report);
    validate_query(config, &mut report);
    validate_ranking(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_selection(config: &HauteConfig, report: &mut ValidationReport) {
    let (min_width, min_height) = config.min_selection();
    if min_width == 0 {
        report.error("selection.minWidth", "must be > 0");
    }
    if min_height == 0 {
        report.error("selection.minHeight", "must be > 0");
    }
}

fn validate_query(config: &HauteConfig, report: &mut ValidationReport) {
    let fallback = config.fallback_term();
    let min_len = config.min_token_len();
    if fallback.trim().is_empty() {
        report.error("query.fallbackTerm", "cannot be empty");
    } else if fallback
        .split(|c: char| c == ',' || c.is_whitespace())
        .all(|t| t.chars().count() < min_len)
    {
        report.warn(
            "query.fallbackTerm",
            format!("no word reaches minTokenLen {min_len}; ranking will see no terms"),
        );
    }
    if min_len == 0 {
        report.warn("query.minTokenLen", "0 keeps every token, including punctuation runs");
    }
    if config.stop_words().iter().any(|w| w.trim().is_empty()) {
        report.error("query.stopWords", "stop words cannot be blank");
    }
}

fn validate_ranking(config: &HauteConfig, report: &mut ValidationReport) {
    let latency = config.ranking_latency_ms();
    if latency > SLOW_LATENCY_MS {
        report.warn(
            "ranking.latencyMs",
            format!("{latency}ms is longer than a user will wait"),
        );
    }
}

fn validate_logging(config: &HauteConfig, report: &mut ValidationReport) {
    let level = config.log_level();
    if !KNOWN_LEVELS.contains(&level.to_lowercase().as_str()) && !level.contains('=') {
        report.warn("logging.level", format!("unrecognized level '{level}'"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{QueryConfig, SelectionConfig};

    #[test]
    fn empty_config_is_valid() {
        let report = validate(&HauteConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_selection_is_error() {
        let cfg = HauteConfig {
            selection: Some(SelectionConfig {
                min_width: Some(0),
                min_height: None,
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "selection.minWidth");
    }

    #[test]
    fn short_fallback_warns() {
        let cfg = HauteConfig {
            query: Some(QueryConfig {
                fallback_term: Some("a b".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert!(report.warnings[0].path.contains("fallbackTerm"));
    }
}

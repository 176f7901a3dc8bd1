//! Haute configuration schema.
//!
//! Every field is optional in the file; [`crate::defaults`] fills the gaps and the
//! resolved accessors below fall back to the same constants.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_FALLBACK_TERM, DEFAULT_GENERAL_FILL, DEFAULT_LOG_LEVEL, DEFAULT_MIN_SELECTION,
    DEFAULT_MIN_TOKEN_LEN, DEFAULT_RANKING_LATENCY_MS, DEFAULT_STOP_WORDS,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for a Haute session host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HauteConfig {
    /// Region selection thresholds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionConfig>,

    /// Query synthesis tuning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryConfig>,

    /// Candidate ranking behavior
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<RankingConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionConfig {
    /// Drags narrower than this (pixels) are treated as clicks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
    /// Summary used when neither facets nor free text were given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_term: Option<String>,
    /// Tokens shorter than this are dropped unless whitelisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_token_len: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
    /// Short tokens that survive the length filter (e.g. "xl").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_token_whitelist: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingConfig {
    /// Simulated backend latency per ranking call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// General-apparel items appended after a routed category bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_fill: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling NDJSON log files; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Emit console logs as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved accessors
// ---------------------------------------------------------------------------

impl HauteConfig {
    /// `(min_width, min_height)` for a confirmed selection.
    pub fn min_selection(&self) -> (u32, u32) {
        let s = self.selection.as_ref();
        (
            s.and_then(|s| s.min_width).unwrap_or(DEFAULT_MIN_SELECTION),
            s.and_then(|s| s.min_height).unwrap_or(DEFAULT_MIN_SELECTION),
        )
    }

    pub fn fallback_term(&self) -> String {
        self.query
            .as_ref()
            .and_then(|q| q.fallback_term.clone())
            .unwrap_or_else(|| DEFAULT_FALLBACK_TERM.to_string())
    }

    pub fn min_token_len(&self) -> usize {
        self.query
            .as_ref()
            .and_then(|q| q.min_token_len)
            .unwrap_or(DEFAULT_MIN_TOKEN_LEN)
    }

    pub fn stop_words(&self) -> Vec<String> {
        self.query
            .as_ref()
            .and_then(|q| q.stop_words.clone())
            .unwrap_or_else(|| DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect())
    }

    pub fn short_token_whitelist(&self) -> Vec<String> {
        self.query
            .as_ref()
            .and_then(|q| q.short_token_whitelist.clone())
            .unwrap_or_default()
    }

    pub fn ranking_latency_ms(&self) -> u64 {
        self.ranking
            .as_ref()
            .and_then(|r| r.latency_ms)
            .unwrap_or(DEFAULT_RANKING_LATENCY_MS)
    }

    pub fn general_fill(&self) -> usize {
        self.ranking
            .as_ref()
            .and_then(|r| r.general_fill)
            .unwrap_or(DEFAULT_GENERAL_FILL)
    }

    pub fn log_level(&self) -> String {
        self.logging
            .as_ref()
            .and_then(|l| l.level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    pub fn log_dir(&self) -> Option<String> {
        self.logging.as_ref().and_then(|l| l.dir.clone())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_resolves_to_defaults() {
        let cfg: HauteConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.min_selection(), (20, 20));
        assert_eq!(cfg.fallback_term(), "fashion item");
        assert_eq!(cfg.stop_words(), vec!["the", "and", "for", "with"]);
        assert_eq!(cfg.ranking_latency_ms(), 3000);
        assert_eq!(cfg.general_fill(), 2);
        assert!(cfg.short_token_whitelist().is_empty());
    }

    #[test]
    fn parses_camel_case_sections() {
        let yaml = r#"
selection:
  minWidth: 32
query:
  shortTokenWhitelist: [xl, xs]
ranking:
  latencyMs: 0
logging:
  level: debug
  json: true
"#;
        let cfg: HauteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.min_selection(), (32, 20));
        assert_eq!(cfg.short_token_whitelist(), vec!["xl", "xs"]);
        assert_eq!(cfg.ranking_latency_ms(), 0);
        assert_eq!(cfg.log_level(), "debug");
        assert!(cfg.log_json());
    }
}

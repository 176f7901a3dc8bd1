//! Config defaults: applies default values to a parsed config.

use crate::schema::{HauteConfig, LoggingConfig, QueryConfig, RankingConfig, SelectionConfig};

/// Smallest accepted selection side, in pixels.
pub const DEFAULT_MIN_SELECTION: u32 = 20;

/// Summary used when the user gave no description at all.
pub const DEFAULT_FALLBACK_TERM: &str = "fashion item";

/// Tokens shorter than this are dropped from the canonical query.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

pub const DEFAULT_STOP_WORDS: [&str; 4] = ["the", "and", "for", "with"];

/// Simulated backend latency for one ranking call.
pub const DEFAULT_RANKING_LATENCY_MS: u64 = 3000;

/// General-apparel items appended after a routed category.
pub const DEFAULT_GENERAL_FILL: usize = 2;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: HauteConfig) -> HauteConfig {
    let config = apply_selection_defaults(config);
    let config = apply_query_defaults(config);
    let config = apply_ranking_defaults(config);
    apply_logging_defaults(config)
}

fn apply_selection_defaults(mut config: HauteConfig) -> HauteConfig {
    let selection = config.selection.get_or_insert_with(SelectionConfig::default);
    selection.min_width.get_or_insert(DEFAULT_MIN_SELECTION);
    selection.min_height.get_or_insert(DEFAULT_MIN_SELECTION);
    config
}

fn apply_query_defaults(mut config: HauteConfig) -> HauteConfig {
    let query = config.query.get_or_insert_with(QueryConfig::default);
    query
        .fallback_term
        .get_or_insert_with(|| DEFAULT_FALLBACK_TERM.to_string());
    query.min_token_len.get_or_insert(DEFAULT_MIN_TOKEN_LEN);
    query
        .stop_words
        .get_or_insert_with(|| DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect());
    query.short_token_whitelist.get_or_insert_with(Vec::new);
    config
}

fn apply_ranking_defaults(mut config: HauteConfig) -> HauteConfig {
    let ranking = config.ranking.get_or_insert_with(RankingConfig::default);
    ranking.latency_ms.get_or_insert(DEFAULT_RANKING_LATENCY_MS);
    ranking.general_fill.get_or_insert(DEFAULT_GENERAL_FILL);
    config
}

fn apply_logging_defaults(mut config: HauteConfig) -> HauteConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}

//! Query synthesis: merges facets, free text, and image analysis into one
//! canonical query.
//!
//! The summary is what the user sees ("Dress, Blue, under $50"); the terms are
//! what ranking sees (`["dress", "blue", "under", "$50"]`). Synthesis never fails:
//! with nothing to go on it falls back to a generic term.

use std::collections::HashSet;
use std::sync::Arc;

use haute_config::HauteConfig;
use haute_config::defaults::{DEFAULT_FALLBACK_TERM, DEFAULT_MIN_TOKEN_LEN, DEFAULT_STOP_WORDS};
use haute_core::{CanonicalQuery, FacetKey, Facets, ImageAnalyzer, ImageHandle};
use tracing::debug;

/// Tokenizer and fallback tuning.
#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub fallback_term: String,
    pub min_token_len: usize,
    pub stop_words: HashSet<String>,
    pub short_token_whitelist: HashSet<String>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            fallback_term: DEFAULT_FALLBACK_TERM.to_string(),
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            short_token_whitelist: HashSet::new(),
        }
    }
}

impl From<&HauteConfig> for QuerySettings {
    fn from(config: &HauteConfig) -> Self {
        let lower = |words: Vec<String>| words.into_iter().map(|w| w.to_lowercase()).collect();
        Self {
            fallback_term: config.fallback_term(),
            min_token_len: config.min_token_len(),
            stop_words: lower(config.stop_words()),
            short_token_whitelist: lower(config.short_token_whitelist()),
        }
    }
}

impl QuerySettings {
    fn keeps(&self, token: &str) -> bool {
        let long_enough =
            token.chars().count() >= self.min_token_len || self.short_token_whitelist.contains(token);
        long_enough && !self.stop_words.contains(token)
    }
}

/// Build the human-readable summary from facets in precedence order, followed by
/// any extra free text. `None` when there is nothing to summarize.
pub fn build_summary(facets: Option<&Facets>, free_text: Option<&str>) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(facets) = facets {
        for key in FacetKey::ALL {
            let Some(value) = facets.get(key) else { continue };
            parts.push(match key {
                FacetKey::PriceCeiling => format!("under {value}"),
                FacetKey::Size => format!("size {value}"),
                _ => value.to_string(),
            });
        }
    }
    if let Some(text) = free_text.map(str::trim).filter(|t| !t.is_empty()) {
        parts.push(text.to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Lowercase, split on commas and whitespace, and drop short tokens and stop-words.
/// Duplicates keep their first position.
pub fn tokenize(text: &str, settings: &QuerySettings) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    lowered
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty() && settings.keeps(t))
        .filter(|t| seen.insert(t.to_string()))
        .map(str::to_string)
        .collect()
}

/// Produces canonical queries; owns the image-analysis seam.
pub struct QuerySynthesizer {
    settings: QuerySettings,
    analyzer: Arc<dyn ImageAnalyzer>,
}

impl QuerySynthesizer {
    pub fn new(settings: QuerySettings, analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self { settings, analyzer }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    pub fn synthesize(
        &self,
        facets: Option<&Facets>,
        free_text: Option<&str>,
        image: Option<&ImageHandle>,
    ) -> CanonicalQuery {
        let summary =
            build_summary(facets, free_text).unwrap_or_else(|| self.settings.fallback_term.clone());
        let mut terms = tokenize(&summary, &self.settings);

        if let Some(image) = image {
            let analysis = self.analyzer.analyze(image);
            debug!(
                analyzer = self.analyzer.name(),
                items = ?analysis.detected_items,
                colors = ?analysis.dominant_colors,
                styles = ?analysis.style_tags,
                "Image analysis merged into query"
            );
            for item in &analysis.detected_items {
                let item = item.trim().to_lowercase();
                if !item.is_empty() && self.settings.keeps(&item) && !terms.contains(&item) {
                    terms.push(item);
                }
            }
        }

        if terms.is_empty() {
            terms = self.fallback_terms();
        }

        debug!(summary = %summary, terms = ?terms, "Synthesized query");
        CanonicalQuery { summary, terms }
    }

    fn fallback_terms(&self) -> Vec<String> {
        let terms = tokenize(&self.settings.fallback_term, &self.settings);
        if !terms.is_empty() {
            return terms;
        }
        let whole = self.settings.fallback_term.trim().to_lowercase();
        if whole.is_empty() {
            vec![DEFAULT_FALLBACK_TERM.to_string()]
        } else {
            vec![whole]
        }
    }
}

//! Candidate ranking over a pluggable [`CandidateSource`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use haute_config::HauteConfig;
use haute_config::defaults::{DEFAULT_GENERAL_FILL, DEFAULT_RANKING_LATENCY_MS};
use haute_core::{Candidate, CandidateSource, CanonicalQuery};
use tracing::{debug, info, warn};

use crate::catalog::{self, CATALOG_VERSION, Category};

/// Simulated backend over the static catalog.
///
/// Every search waits one fixed latency, then routes by keyword. A routed bucket
/// is followed by the first `general_fill` general items; an unrouted query gets
/// general apparel plus the extended items.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    latency: Duration,
    general_fill: usize,
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(DEFAULT_RANKING_LATENCY_MS),
            general_fill: DEFAULT_GENERAL_FILL,
        }
    }
}

impl From<&HauteConfig> for CatalogSource {
    fn from(config: &HauteConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.ranking_latency_ms()),
            general_fill: config.general_fill(),
        }
    }
}

impl CatalogSource {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    pub fn with_general_fill(mut self, general_fill: usize) -> Self {
        self.general_fill = general_fill;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// The ordered result for `query`, without the simulated wait.
    pub fn lookup(&self, query: &CanonicalQuery) -> Vec<Candidate> {
        match catalog::route(query) {
            Some(category) => {
                debug!(category = category.as_str(), "Query routed to category");
                category
                    .candidates()
                    .chain(Category::General.candidates().take(self.general_fill))
                    .collect()
            }
            None => {
                debug!("No category keyword; using general fallback");
                Category::General
                    .candidates()
                    .chain(Category::Extended.candidates())
                    .collect()
            }
        }
    }
}

#[async_trait]
impl CandidateSource for CatalogSource {
    fn name(&self) -> &str {
        "catalog"
    }

    fn version(&self) -> &str {
        CATALOG_VERSION
    }

    async fn search(&self, query: &CanonicalQuery) -> Result<Vec<Candidate>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.lookup(query))
    }
}

/// Turns canonical queries into ranked candidates. Never fails: source errors
/// are logged and produce an empty list.
#[derive(Clone)]
pub struct Ranker {
    source: Arc<dyn CandidateSource>,
}

impl Ranker {
    pub fn new(source: Arc<dyn CandidateSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Rank `query`. Dropping the returned future abandons the request.
    pub async fn rank(&self, query: &CanonicalQuery) -> Vec<Candidate> {
        let started = Instant::now();
        match self.source.search(query).await {
            Ok(candidates) => {
                info!(
                    source = self.source.name(),
                    version = self.source.version(),
                    query = %query,
                    results = candidates.len(),
                    latency_ms = started.elapsed().as_millis() as u64,
                    "Ranking complete"
                );
                candidates
            }
            Err(e) => {
                warn!(source = self.source.name(), query = %query, error = %e, "Ranking failed");
                Vec::new()
            }
        }
    }
}

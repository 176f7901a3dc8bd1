//! Drives a session through the text or image flow.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use haute_core::{Candidate, FacetKey, Facets, Point, Region, SearchMode};
use haute_media::FileImageSource;
use haute_session::Session;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Everything printed after a search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub mode: SearchMode,
    pub summary: String,
    pub terms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    pub candidates: Vec<Candidate>,
}

impl SearchReport {
    fn from_session(session: &Session) -> Result<Self> {
        let query = session
            .query()
            .context("Session finished without a query")?;
        Ok(Self {
            session_id: session.id(),
            started_at: session.started_at(),
            mode: session.mode(),
            summary: query.summary.clone(),
            terms: query.terms.clone(),
            region: session.region(),
            candidates: session.candidates().to_vec(),
        })
    }
}

/// Text flow: custom describe, then search.
pub async fn describe(session: &mut Session, facets: &Facets) -> Result<SearchReport> {
    session.set_mode(SearchMode::Text)?;
    apply_facets(session, facets)?;
    session.search().await.context("Search failed")?;
    SearchReport::from_session(session)
}

/// Image flow: load the photo, select `region`, describe, then search.
pub async fn image(
    session: &mut Session,
    path: &Path,
    region: Region,
    facets: &Facets,
) -> Result<SearchReport> {
    session
        .acquire(&FileImageSource::new(path))
        .await
        .with_context(|| format!("Could not use {} as a photo", path.display()))?;

    session.begin_drag(Point::new(region.x, region.y))?;
    let end = Point::new(
        region.x.saturating_add(region.width),
        region.y.saturating_add(region.height),
    );
    if session.end_drag(end)?.is_none() {
        let (w, h) = session.selector().min_size();
        bail!("Region {region} is smaller than the {w}x{h} minimum");
    }
    let confirmed = session.confirm_selection()?;
    info!(region = %confirmed, "Region selected");

    apply_facets(session, facets)?;
    session.search().await.context("Search failed")?;
    SearchReport::from_session(session)
}

fn apply_facets(session: &mut Session, facets: &Facets) -> Result<()> {
    for key in FacetKey::ALL {
        if let Some(value) = facets.get(key) {
            session.set_facet(key, value)?;
        }
    }
    if !session.facet_collector().can_submit() {
        bail!("Describe the item with --item-type or --details before searching");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use haute_config::{HauteConfig, RankingConfig};
    use haute_core::Stage;
    use haute_understanding::SimulatedVision;

    fn session() -> Session {
        let cfg = HauteConfig {
            ranking: Some(RankingConfig {
                latency_ms: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        Session::from_config(&cfg, Arc::new(SimulatedVision::new()))
    }

    #[tokio::test]
    async fn describe_reports_dress_bucket() {
        let mut s = session();
        let facets = Facets::default().with(FacetKey::ItemType, "Dress");
        let report = describe(&mut s, &facets).await.unwrap();
        assert_eq!(report.summary, "Dress");
        assert_eq!(report.terms, vec!["dress"]);
        assert_eq!(report.candidates[0].title, "Summer Floral Dress");
        assert!(report.region.is_none());
    }

    #[tokio::test]
    async fn describe_without_type_or_details_fails() {
        let mut s = session();
        let facets = Facets::default().with(FacetKey::Color, "Red");
        assert!(describe(&mut s, &facets).await.is_err());
        assert_eq!(s.stage(), Stage::CustomDescribe);
    }

    #[tokio::test]
    async fn image_flow_from_file() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let mut s = session();
        let region = Region { x: 5, y: 5, width: 120, height: 80 };
        let facets = Facets::default().with(FacetKey::FreeText, "white sneakers");
        let report = image(&mut s, file.path(), region, &facets).await.unwrap();

        assert_eq!(report.region, Some(region));
        assert_eq!(report.terms, vec!["white", "sneakers", "shirt", "clothing", "apparel"]);
        assert_eq!(report.candidates[0].id, "6");
    }

    #[tokio::test]
    async fn small_region_is_reported() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();

        let mut s = session();
        let region = Region { x: 10, y: 10, width: 5, height: 5 };
        let facets = Facets::default().with(FacetKey::ItemType, "Bag");
        let err = image(&mut s, file.path(), region, &facets).await.unwrap_err();
        assert!(err.to_string().contains("minimum"));
        assert_eq!(s.stage(), Stage::Select);
    }
}

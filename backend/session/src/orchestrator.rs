//! The session state machine.
//!
//! ```text
//! Capture --image--> Select --region--> Describe --submit--> Search
//! CustomDescribe --submit--> Search
//! any --reset--> Capture
//! ```
//!
//! Ranking is issued as a [`RankTicket`]. Only the ticket of the current
//! in-flight request is accepted; reset and retry make older tickets stale.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use haute_config::HauteConfig;
use haute_core::{
    AcquisitionError, Candidate, CanonicalQuery, FacetKey, Facets, ImageAnalyzer, ImageHandle,
    ImageSource, Point, Region, SearchMode, SessionError, Stage,
};
use haute_search::{CatalogSource, QuerySettings, QuerySynthesizer, Ranker};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::facets::FacetCollector;
use crate::selector::RegionSelector;
use crate::stage::entry_stage;
use crate::view::SessionView;

pub type SessionResult<T> = Result<T, SessionError>;

/// Claim on one ranking request. Hand its query to the ranker and its results
/// back to [`Session::accept_results`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTicket {
    generation: u64,
    query: CanonicalQuery,
}

impl RankTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &CanonicalQuery {
        &self.query
    }
}

pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    stage: Stage,
    mode: SearchMode,
    image: Option<ImageHandle>,
    region: Option<Region>,
    selector: RegionSelector,
    facets: FacetCollector,
    query: Option<CanonicalQuery>,
    candidates: Vec<Candidate>,
    generation: u64,
    in_flight: Option<u64>,
    last_error: Option<AcquisitionError>,
    synthesizer: QuerySynthesizer,
    ranker: Ranker,
}

impl Session {
    pub fn new(synthesizer: QuerySynthesizer, ranker: Ranker, selector: RegionSelector) -> Self {
        let id = Uuid::new_v4();
        info!(session_id = %id, ranker = ranker.source_name(), "Session started");
        Self {
            id,
            started_at: Utc::now(),
            stage: Stage::Capture,
            mode: SearchMode::Image,
            image: None,
            region: None,
            selector,
            facets: FacetCollector::new(),
            query: None,
            candidates: Vec::new(),
            generation: 0,
            in_flight: None,
            last_error: None,
            synthesizer,
            ranker,
        }
    }

    /// A session over the static catalog, tuned by `config`.
    pub fn from_config(config: &HauteConfig, analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self::new(
            QuerySynthesizer::new(QuerySettings::from(config), analyzer),
            Ranker::new(Arc::new(CatalogSource::from(config))),
            RegionSelector::from(config),
        )
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    /// The confirmed region.
    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn selector(&self) -> &RegionSelector {
        &self.selector
    }

    pub fn facets(&self) -> Facets {
        self.facets.snapshot()
    }

    pub fn facet_collector(&self) -> &FacetCollector {
        &self.facets
    }

    pub fn query(&self) -> Option<&CanonicalQuery> {
        self.query.as_ref()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&AcquisitionError> {
        self.last_error.as_ref()
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn view(&self) -> SessionView {
        SessionView::from(self)
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Pull an image from `source`. On failure the session stays in Capture and
    /// keeps the error for display.
    pub async fn acquire(&mut self, source: &dyn ImageSource) -> SessionResult<()> {
        self.expect_stage(&[Stage::Capture], "acquire an image")?;
        match source.acquire().await {
            Ok(image) => self.attach_image(image),
            Err(e) => {
                warn!(session_id = %self.id, source = source.name(), error = %e, "Image acquisition failed");
                self.last_error = Some(e.clone());
                Err(e.into())
            }
        }
    }

    pub fn attach_image(&mut self, image: ImageHandle) -> SessionResult<()> {
        self.expect_stage(&[Stage::Capture], "attach an image")?;
        if image.is_empty() {
            let e = AcquisitionError::Unreadable("image has no data".into());
            self.last_error = Some(e.clone());
            return Err(e.into());
        }
        debug!(session_id = %self.id, image_id = %image.id(), mime = image.mime_type(), bytes = image.len(), "Image attached");
        self.image = Some(image);
        self.last_error = None;
        self.transition(Stage::Select);
        Ok(())
    }

    /// Switch between the image and text entry points. Facets entered so far are
    /// discarded.
    pub fn set_mode(&mut self, mode: SearchMode) -> SessionResult<()> {
        if !self.stage.is_entry() {
            return Err(SessionError::InvalidTransition {
                stage: self.stage,
                action: "switch search mode",
            });
        }
        if mode == self.mode {
            return Ok(());
        }
        self.mode = mode;
        self.facets.reset();
        self.last_error = None;
        self.transition(entry_stage(mode));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn begin_drag(&mut self, at: Point) -> SessionResult<()> {
        self.expect_stage(&[Stage::Select], "start a selection")?;
        self.selector.begin(at);
        Ok(())
    }

    pub fn update_drag(&mut self, at: Point) -> SessionResult<Option<Region>> {
        self.expect_stage(&[Stage::Select], "update a selection")?;
        Ok(self.selector.update(at))
    }

    /// Finish a drag. `None` when the drag was too small; the session stays in
    /// Select either way.
    pub fn end_drag(&mut self, at: Point) -> SessionResult<Option<Region>> {
        self.expect_stage(&[Stage::Select], "finish a selection")?;
        Ok(self.selector.end(at))
    }

    pub fn cancel_drag(&mut self) -> SessionResult<()> {
        self.expect_stage(&[Stage::Select], "cancel a selection")?;
        self.selector.cancel();
        Ok(())
    }

    pub fn clear_selection(&mut self) -> SessionResult<()> {
        self.expect_stage(&[Stage::Select], "clear the selection")?;
        self.selector.clear();
        Ok(())
    }

    pub fn confirm_selection(&mut self) -> SessionResult<Region> {
        self.expect_stage(&[Stage::Select], "confirm a selection")?;
        let region = self
            .selector
            .pending()
            .ok_or(SessionError::MissingArtifact("region"))?;
        info!(session_id = %self.id, region = %region, "Selection confirmed");
        self.region = Some(region);
        self.transition(Stage::Describe);
        Ok(region)
    }

    // -----------------------------------------------------------------------
    // Description
    // -----------------------------------------------------------------------

    pub fn set_facet(&mut self, key: FacetKey, value: impl Into<String>) -> SessionResult<()> {
        self.expect_stage(&[Stage::Describe, Stage::CustomDescribe], "edit facets")?;
        self.facets.set(key, value);
        Ok(())
    }

    pub fn clear_facet(&mut self, key: FacetKey) -> SessionResult<()> {
        self.expect_stage(&[Stage::Describe, Stage::CustomDescribe], "edit facets")?;
        self.facets.clear(key);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Synthesize the query, move to Search and issue a ranking ticket.
    pub fn submit(&mut self) -> SessionResult<RankTicket> {
        self.expect_stage(&[Stage::Describe, Stage::CustomDescribe], "submit a search")?;
        if !self.facets.can_submit() {
            return Err(SessionError::SubmissionDisabled);
        }

        let image = if self.stage == Stage::Describe {
            if self.region.is_none() {
                return Err(SessionError::MissingArtifact("region"));
            }
            Some(
                self.image
                    .as_ref()
                    .ok_or(SessionError::MissingArtifact("image"))?,
            )
        } else {
            None
        };

        let facets = self.facets.snapshot();
        let query = self.synthesizer.synthesize(Some(&facets), None, image);
        info!(session_id = %self.id, summary = %query.summary, terms = ?query.terms, "Search submitted");

        self.query = Some(query.clone());
        self.candidates.clear();
        self.transition(Stage::Search);
        Ok(self.issue_ticket(query))
    }

    /// Re-rank the stored query. Any request still in flight becomes stale.
    pub fn retry(&mut self) -> SessionResult<RankTicket> {
        self.expect_stage(&[Stage::Search], "retry")?;
        let query = self
            .query
            .clone()
            .ok_or(SessionError::MissingArtifact("query"))?;
        info!(session_id = %self.id, summary = %query.summary, "Retrying search");
        self.candidates.clear();
        Ok(self.issue_ticket(query))
    }

    /// Store ranking results. Rejected unless `ticket` is the current request.
    pub fn accept_results(
        &mut self,
        ticket: &RankTicket,
        candidates: Vec<Candidate>,
    ) -> SessionResult<()> {
        if self.stage != Stage::Search || self.in_flight != Some(ticket.generation) {
            debug!(
                session_id = %self.id,
                ticket = ticket.generation,
                current = ?self.in_flight,
                "Discarding stale ranking result"
            );
            return Err(SessionError::StaleResult {
                ticket: ticket.generation,
            });
        }

        self.in_flight = None;
        if candidates.is_empty() {
            warn!(session_id = %self.id, summary = %ticket.query.summary, "Search returned no results");
        } else {
            info!(session_id = %self.id, results = candidates.len(), "Results ready");
        }
        self.candidates = candidates;
        Ok(())
    }

    /// Submit and rank in one step. Dropping the future abandons the request.
    pub async fn search(&mut self) -> SessionResult<&[Candidate]> {
        let ticket = self.submit()?;
        self.complete(ticket).await?;
        Ok(&self.candidates)
    }

    /// Retry and rank in one step.
    pub async fn search_again(&mut self) -> SessionResult<&[Candidate]> {
        let ticket = self.retry()?;
        self.complete(ticket).await?;
        Ok(&self.candidates)
    }

    /// Give up on `ticket` without results. Returns false when it was already
    /// stale. The query is kept, so a retry can follow.
    pub fn abandon(&mut self, ticket: &RankTicket) -> bool {
        if self.in_flight != Some(ticket.generation) {
            return false;
        }
        self.in_flight = None;
        info!(session_id = %self.id, ticket = ticket.generation, "Ranking abandoned");
        true
    }

    async fn complete(&mut self, ticket: RankTicket) -> SessionResult<()> {
        let ranker = self.ranker.clone();
        let mut pending = PendingRank {
            session: self,
            ticket,
        };
        let candidates = ranker.rank(pending.ticket.query()).await;
        pending.session.accept_results(&pending.ticket, candidates)
    }

    /// Back to Capture with every artifact dropped.
    pub fn reset(&mut self) {
        let from = self.stage;
        self.mode = SearchMode::Image;
        self.image = None;
        self.region = None;
        self.selector.clear();
        self.facets.reset();
        self.query = None;
        self.candidates.clear();
        self.in_flight = None;
        self.last_error = None;
        self.stage = Stage::Capture;
        info!(session_id = %self.id, from = %from, "Session reset");
    }

    fn issue_ticket(&mut self, query: CanonicalQuery) -> RankTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        debug!(session_id = %self.id, ticket = self.generation, "Ranking ticket issued");
        RankTicket {
            generation: self.generation,
            query,
        }
    }

    fn expect_stage(&self, allowed: &[Stage], action: &'static str) -> SessionResult<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                stage: self.stage,
                action,
            })
        }
    }

    fn transition(&mut self, to: Stage) {
        let from = self.stage;
        self.stage = to;
        info!(session_id = %self.id, from = %from, to = %to, "Stage transition");
    }
}

/// Ranking awaited by [`Session::search`]. If the caller drops the future
/// before results arrive, the ticket is abandoned on drop.
struct PendingRank<'a> {
    session: &'a mut Session,
    ticket: RankTicket,
}

impl Drop for PendingRank<'_> {
    fn drop(&mut self) {
        // No-op once the results were accepted.
        self.session.abandon(&self.ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use anyhow::bail;
    use async_trait::async_trait;
    use haute_config::RankingConfig;
    use haute_core::CandidateSource;
    use haute_media::FrameImageSource;
    use haute_understanding::SimulatedVision;

    use crate::view::Action;

    const JPEG: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    fn config() -> HauteConfig {
        HauteConfig {
            ranking: Some(RankingConfig {
                latency_ms: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn session() -> Session {
        Session::from_config(&config(), Arc::new(SimulatedVision::new()))
    }

    fn ids(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.as_str()).collect()
    }

    struct DeniedCamera;

    #[async_trait]
    impl ImageSource for DeniedCamera {
        fn name(&self) -> &str {
            "camera"
        }

        async fn acquire(&self) -> Result<ImageHandle, AcquisitionError> {
            Err(AcquisitionError::CaptureDenied("permission denied".into()))
        }
    }

    struct OfflineCatalog;

    #[async_trait]
    impl CandidateSource for OfflineCatalog {
        fn name(&self) -> &str {
            "offline"
        }

        fn version(&self) -> &str {
            "0"
        }

        async fn search(&self, _query: &CanonicalQuery) -> anyhow::Result<Vec<Candidate>> {
            bail!("connection refused")
        }
    }

    async fn selected(session: &mut Session) {
        session.acquire(&FrameImageSource::new(JPEG.to_vec())).await.unwrap();
        session.begin_drag(Point::new(10, 10)).unwrap();
        session.end_drag(Point::new(110, 160)).unwrap().unwrap();
        session.confirm_selection().unwrap();
    }

    #[tokio::test]
    async fn image_flow_end_to_end() {
        let mut s = session();
        assert_eq!(s.stage(), Stage::Capture);

        selected(&mut s).await;
        assert_eq!(s.stage(), Stage::Describe);
        assert_eq!(s.region(), Some(Region { x: 10, y: 10, width: 100, height: 150 }));

        s.set_facet(FacetKey::ItemType, "Dress").unwrap();
        let results = s.search().await.unwrap();
        assert_eq!(ids(results), vec!["4", "5", "1", "2"]);
        assert_eq!(s.stage(), Stage::Search);
        assert_eq!(s.query().unwrap().terms, vec!["dress", "shirt", "clothing", "apparel"]);
        assert!(!s.is_loading());
    }

    #[tokio::test]
    async fn text_flow_routes_sneakers_to_footwear() {
        let mut s = session();
        s.set_mode(SearchMode::Text).unwrap();
        assert_eq!(s.stage(), Stage::CustomDescribe);

        s.set_facet(FacetKey::FreeText, "blue sneakers for running").unwrap();
        let results = s.search().await.unwrap();
        assert_eq!(ids(results), vec!["6", "7", "1", "2"]);
        assert_eq!(s.query().unwrap().terms, vec!["blue", "sneakers", "running"]);
    }

    #[tokio::test]
    async fn denied_capture_stays_in_capture() {
        let mut s = session();
        let err = s.acquire(&DeniedCamera).await.unwrap_err();
        assert!(matches!(err, SessionError::Acquisition(AcquisitionError::CaptureDenied(_))));
        assert_eq!(s.stage(), Stage::Capture);
        assert!(s.last_error().is_some());

        s.acquire(&FrameImageSource::new(JPEG.to_vec())).await.unwrap();
        assert!(s.last_error().is_none());
    }

    #[tokio::test]
    async fn non_image_frame_is_rejected() {
        let mut s = session();
        let source = FrameImageSource::new(b"%PDF-1.4".to_vec());
        let err = s.acquire(&source).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Acquisition(AcquisitionError::InvalidFileType { .. })
        ));
        assert_eq!(s.stage(), Stage::Capture);
    }

    #[tokio::test]
    async fn tiny_drag_keeps_session_in_select() {
        let mut s = session();
        s.acquire(&FrameImageSource::new(JPEG.to_vec())).await.unwrap();
        s.begin_drag(Point::new(10, 10)).unwrap();
        assert_eq!(s.end_drag(Point::new(15, 15)).unwrap(), None);
        assert_eq!(s.stage(), Stage::Select);
        assert!(matches!(
            s.confirm_selection(),
            Err(SessionError::MissingArtifact("region"))
        ));
    }

    #[tokio::test]
    async fn submit_requires_item_type_or_free_text() {
        let mut s = session();
        selected(&mut s).await;
        s.set_facet(FacetKey::Color, "Blue").unwrap();
        assert!(matches!(s.submit(), Err(SessionError::SubmissionDisabled)));
        assert_eq!(s.stage(), Stage::Describe);
    }

    #[test]
    fn out_of_order_actions_are_rejected() {
        let mut s = session();
        assert!(matches!(
            s.set_facet(FacetKey::ItemType, "Dress"),
            Err(SessionError::InvalidTransition { stage: Stage::Capture, .. })
        ));
        assert!(s.begin_drag(Point::new(0, 0)).is_err());
        assert!(s.submit().is_err());
        assert!(s.retry().is_err());
    }

    #[tokio::test]
    async fn mode_toggle_only_from_entry_stages() {
        let mut s = session();
        s.acquire(&FrameImageSource::new(JPEG.to_vec())).await.unwrap();
        assert!(matches!(
            s.set_mode(SearchMode::Text),
            Err(SessionError::InvalidTransition { stage: Stage::Select, .. })
        ));

        s.reset();
        s.set_mode(SearchMode::Text).unwrap();
        s.set_facet(FacetKey::ItemType, "Bag").unwrap();
        s.set_mode(SearchMode::Image).unwrap();
        assert_eq!(s.stage(), Stage::Capture);
        assert!(s.facets().is_empty());
    }

    #[test]
    fn superseded_ticket_is_stale() {
        let mut s = session();
        s.set_mode(SearchMode::Text).unwrap();
        s.set_facet(FacetKey::ItemType, "Dress").unwrap();

        let first = s.submit().unwrap();
        assert!(s.is_loading());
        let second = s.retry().unwrap();
        assert_ne!(first.generation(), second.generation());

        assert!(matches!(
            s.accept_results(&first, Vec::new()),
            Err(SessionError::StaleResult { .. })
        ));
        s.accept_results(&second, Vec::new()).unwrap();
        assert!(!s.is_loading());
    }

    #[test]
    fn reset_invalidates_in_flight_ticket() {
        let mut s = session();
        s.set_mode(SearchMode::Text).unwrap();
        s.set_facet(FacetKey::FreeText, "linen shirt").unwrap();
        let ticket = s.submit().unwrap();
        s.reset();
        assert!(s.accept_results(&ticket, Vec::new()).is_err());
        assert!(s.candidates().is_empty());
    }

    #[tokio::test]
    async fn reset_is_idempotent() {
        let mut s = session();
        selected(&mut s).await;
        s.set_facet(FacetKey::ItemType, "Dress").unwrap();
        s.search().await.unwrap();

        s.reset();
        let once = s.view();
        s.reset();
        assert_eq!(s.view(), once);
        assert_eq!(s.stage(), Stage::Capture);
        assert_eq!(s.mode(), SearchMode::Image);
        assert!(s.image().is_none());
        assert!(s.query().is_none());
    }

    #[tokio::test]
    async fn dropped_search_stops_loading() {
        let cfg = HauteConfig {
            ranking: Some(RankingConfig {
                latency_ms: Some(5000),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut s = Session::from_config(&cfg, Arc::new(SimulatedVision::new()));
        s.set_mode(SearchMode::Text).unwrap();
        s.set_facet(FacetKey::ItemType, "Dress").unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(20), s.search())
            .await
            .is_err();
        assert!(timed_out);

        let view = s.view();
        assert_eq!(view.stage, Stage::Search);
        assert!(!view.loading);
        assert!(view.actions.contains(&Action::Retry));
        assert_eq!(s.query().unwrap().summary, "Dress");
    }

    #[test]
    fn abandon_only_clears_current_ticket() {
        let mut s = session();
        s.set_mode(SearchMode::Text).unwrap();
        s.set_facet(FacetKey::ItemType, "Dress").unwrap();

        let first = s.submit().unwrap();
        let second = s.retry().unwrap();
        assert!(!s.abandon(&first));
        assert!(s.is_loading());

        assert!(s.abandon(&second));
        assert!(!s.is_loading());
        assert!(matches!(
            s.accept_results(&second, Vec::new()),
            Err(SessionError::StaleResult { .. })
        ));
    }

    #[tokio::test]
    async fn ranking_failure_offers_retry() {
        let cfg = config();
        let mut s = Session::new(
            QuerySynthesizer::new(QuerySettings::from(&cfg), Arc::new(SimulatedVision::new())),
            Ranker::new(Arc::new(OfflineCatalog)),
            RegionSelector::from(&cfg),
        );
        s.set_mode(SearchMode::Text).unwrap();
        s.set_facet(FacetKey::ItemType, "Jacket").unwrap();
        assert!(s.search().await.unwrap().is_empty());
        assert!(s.view().no_results);

        assert!(s.search_again().await.unwrap().is_empty());
        assert_eq!(s.query().unwrap().summary, "Jacket");
    }
}

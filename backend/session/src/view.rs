//! Read-only snapshot for the presentation layer, plus presentation-owned
//! favorites.

use std::collections::HashSet;

use haute_core::{Candidate, SearchMode, Stage};
use serde::Serialize;

use crate::orchestrator::Session;
use crate::stage::{self, StepInfo};

/// Intents the presentation layer may offer in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AcquireImage,
    SwitchToText,
    SwitchToImage,
    DragSelection,
    ClearSelection,
    ConfirmSelection,
    EditFacets,
    Submit,
    Retry,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub stage: Stage,
    pub mode: SearchMode,
    pub steps: &'static [StepInfo],
    pub step_index: Option<usize>,
    pub progress: f32,
    pub actions: Vec<Action>,
    pub candidates: Vec<Candidate>,
    pub loading: bool,
    /// Search summary of the submitted query.
    pub summary: Option<String>,
    /// `"Type: Dress, Color: Blue"` while describing.
    pub facet_summary: String,
    pub last_error: Option<String>,
    /// Search finished with nothing to show.
    pub no_results: bool,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let stage = session.stage();
        let mode = session.mode();
        let loading = session.is_loading();
        Self {
            stage,
            mode,
            steps: stage::steps(mode),
            step_index: stage::step_index(mode, stage),
            progress: stage::progress(mode, stage),
            actions: available_actions(session),
            candidates: session.candidates().to_vec(),
            loading,
            summary: session.query().map(|q| q.summary.clone()),
            facet_summary: session.facet_collector().labeled_summary(),
            last_error: session.last_error().map(ToString::to_string),
            no_results: stage == Stage::Search && !loading && session.candidates().is_empty(),
        }
    }
}

fn available_actions(session: &Session) -> Vec<Action> {
    let mut actions = Vec::new();
    match session.stage() {
        Stage::Capture => {
            actions.push(Action::AcquireImage);
            actions.push(Action::SwitchToText);
        }
        Stage::CustomDescribe => {
            actions.push(Action::EditFacets);
            if session.facet_collector().can_submit() {
                actions.push(Action::Submit);
            }
            actions.push(Action::SwitchToImage);
        }
        Stage::Select => {
            actions.push(Action::DragSelection);
            if session.selector().pending().is_some() {
                actions.push(Action::ClearSelection);
                actions.push(Action::ConfirmSelection);
            }
        }
        Stage::Describe => {
            actions.push(Action::EditFacets);
            if session.facet_collector().can_submit() {
                actions.push(Action::Submit);
            }
        }
        // A retry supersedes any request still in flight.
        Stage::Search => actions.push(Action::Retry),
    }
    if session.stage() != Stage::Capture {
        actions.push(Action::Reset);
    }
    actions
}

/// Candidate ids the user has starred. Owned by the presentation layer and
/// untouched by session resets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Favorites {
    ids: HashSet<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership. Returns whether `id` is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use haute_config::{HauteConfig, RankingConfig};
    use haute_core::{FacetKey, ImageHandle, Point};
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

    #[test]
    fn capture_view() {
        let view = session().view();
        assert_eq!(view.stage, Stage::Capture);
        assert_eq!(view.steps.len(), 4);
        assert_eq!(view.step_index, Some(0));
        assert_eq!(view.progress, 0.0);
        assert_eq!(view.actions, vec![Action::AcquireImage, Action::SwitchToText]);
        assert!(!view.no_results);
    }

    #[test]
    fn select_actions_follow_pending_region() {
        let mut s = session();
        s.attach_image(ImageHandle::new("image/png", vec![1u8, 2, 3])).unwrap();
        assert_eq!(s.view().actions, vec![Action::DragSelection, Action::Reset]);

        s.begin_drag(Point::new(0, 0)).unwrap();
        s.end_drag(Point::new(64, 64)).unwrap();
        let view = s.view();
        assert!(view.actions.contains(&Action::ConfirmSelection));
        assert!((view.progress - 1.0 / 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn describe_view_shows_labeled_summary_and_submit() {
        let mut s = session();
        s.set_mode(SearchMode::Text).unwrap();
        s.set_facet(FacetKey::Color, "Blue").unwrap();
        assert!(!s.view().actions.contains(&Action::Submit));

        s.set_facet(FacetKey::ItemType, "Dress").unwrap();
        let view = s.view();
        assert_eq!(view.facet_summary, "Type: Dress, Color: Blue");
        assert!(view.actions.contains(&Action::Submit));
        assert_eq!(view.steps[0].description, "Describe What You Want");
    }

    #[test]
    fn loading_view_offers_retry() {
        let mut s = session();
        s.set_mode(SearchMode::Text).unwrap();
        s.set_facet(FacetKey::ItemType, "Dress").unwrap();
        let ticket = s.submit().unwrap();

        let view = s.view();
        assert!(view.loading);
        assert!(!view.no_results);
        assert_eq!(view.summary.as_deref(), Some("Dress"));
        assert_eq!(view.actions, vec![Action::Retry, Action::Reset]);

        s.accept_results(&ticket, Vec::new()).unwrap();
        let view = s.view();
        assert!(view.no_results);
        assert_eq!(view.actions, vec![Action::Retry, Action::Reset]);
        assert_eq!(view.progress, 1.0);
    }

    #[test]
    fn favorites_toggle() {
        let mut favs = Favorites::new();
        assert!(favs.toggle("4"));
        assert!(favs.contains("4"));
        assert!(!favs.toggle("4"));
        assert!(favs.is_empty());
    }
}

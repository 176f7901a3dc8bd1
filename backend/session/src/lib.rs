//! Visual-search session pipeline: region selection, facet collection, and the
//! orchestrator that sequences capture, selection, description and search.

pub mod facets;
pub mod orchestrator;
pub mod selector;
pub mod stage;
pub mod view;

pub use facets::{FacetCollector, suggestions};
pub use orchestrator::{RankTicket, Session, SessionResult};
pub use selector::RegionSelector;
pub use stage::{StepInfo, entry_stage, progress, step_index, steps};
pub use view::{Action, Favorites, SessionView};

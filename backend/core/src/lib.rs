//! Core types, errors, and collaborator traits for the Haute visual-search session.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AcquisitionError, SessionError};
pub use traits::{CandidateSource, ImageAnalyzer, ImageSource};
pub use types::{
    Candidate, CanonicalQuery, FacetKey, Facets, ImageAnalysis, ImageHandle, Point, Region,
    SearchMode, Stage,
};

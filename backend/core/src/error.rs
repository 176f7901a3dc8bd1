use thiserror::Error;

use crate::types::Stage;

/// Failures reported by an image source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("capture denied: {0}")]
    CaptureDenied(String),

    #[error("invalid file type: expected an image, got {mime_type}")]
    InvalidFileType { mime_type: String },

    #[error("could not read image: {0}")]
    Unreadable(String),
}

/// Outcome of a rejected session transition.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {action} during the {stage} stage")]
    InvalidTransition { stage: Stage, action: &'static str },

    #[error("missing {0}")]
    MissingArtifact(&'static str),

    #[error("an item type or a free-text description is required")]
    SubmissionDisabled,

    #[error("ranking result for request {ticket} is stale")]
    StaleResult { ticket: u64 },

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
}

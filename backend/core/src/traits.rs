use anyhow::Result;
use async_trait::async_trait;

use crate::error::AcquisitionError;
use crate::types::{Candidate, CanonicalQuery, ImageAnalysis, ImageHandle};

/// Supplies raw image bytes from a camera frame or a file selection.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Source name (e.g., "file", "camera").
    fn name(&self) -> &str;

    async fn acquire(&self) -> Result<ImageHandle, AcquisitionError>;
}

/// Seam where a vision model plugs in.
///
/// Analysis never fails from the caller's point of view: an analyzer that cannot
/// read the image reports an empty [`ImageAnalysis`].
pub trait ImageAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    fn analyze(&self, image: &ImageHandle) -> ImageAnalysis;
}

/// Backend that turns a canonical query into scored candidates.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Backend name (e.g., "catalog").
    fn name(&self) -> &str;

    /// Version tag of the underlying data. Equal query + version ⇒ equal output.
    fn version(&self) -> &str;

    async fn search(&self, query: &CanonicalQuery) -> Result<Vec<Candidate>>;
}

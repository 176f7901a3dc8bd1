/// Vision understanding: what a model "sees" in the selected garment.
///
/// `SimulatedVision` stands in for a real recognition model. Swap in any
/// [`ImageAnalyzer`] to integrate one; the session never depends on this type.
use haute_core::{ImageAnalysis, ImageAnalyzer, ImageHandle};
use tracing::{debug, warn};

/// Canned analysis emitted for every readable image.
pub fn default_analysis() -> ImageAnalysis {
    ImageAnalysis {
        dominant_colors: vec!["blue".into(), "white".into(), "black".into()],
        detected_items: vec!["shirt".into(), "clothing".into(), "apparel".into()],
        style_tags: vec!["casual".into(), "modern".into()],
    }
}

/// Deterministic stand-in for a vision model.
pub struct SimulatedVision {
    analysis: ImageAnalysis,
}

impl SimulatedVision {
    pub fn new() -> Self {
        Self {
            analysis: default_analysis(),
        }
    }

    /// Report `analysis` instead of the default canned output.
    pub fn with_analysis(mut self, analysis: ImageAnalysis) -> Self {
        self.analysis = analysis;
        self
    }
}

impl Default for SimulatedVision {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageAnalyzer for SimulatedVision {
    fn name(&self) -> &str {
        "simulated"
    }

    fn analyze(&self, image: &ImageHandle) -> ImageAnalysis {
        if image.is_empty() {
            warn!(image = %image.id(), "[Vision] Empty image payload; reporting nothing");
            return ImageAnalysis::default();
        }
        debug!(
            image = %image.id(),
            mime = image.mime_type(),
            items = ?self.analysis.detected_items,
            "[Vision] Simulated analysis"
        );
        self.analysis.clone()
    }
}

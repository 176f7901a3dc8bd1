//! Pointer-drag region selection over a captured image.

use haute_config::HauteConfig;
use haute_config::defaults::DEFAULT_MIN_SELECTION;
use haute_core::{Point, Region};
use tracing::debug;

/// Turns drag gestures into a normalized [`Region`].
///
/// Only geometry lives here. The session decides when a pending region is
/// confirmed.
#[derive(Debug, Clone)]
pub struct RegionSelector {
    min_width: u32,
    min_height: u32,
    anchor: Option<Point>,
    current: Option<Region>,
    pending: Option<Region>,
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SELECTION, DEFAULT_MIN_SELECTION)
    }
}

impl From<&HauteConfig> for RegionSelector {
    fn from(config: &HauteConfig) -> Self {
        let (min_width, min_height) = config.min_selection();
        Self::new(min_width, min_height)
    }
}

impl RegionSelector {
    pub fn new(min_width: u32, min_height: u32) -> Self {
        Self {
            min_width,
            min_height,
            anchor: None,
            current: None,
            pending: None,
        }
    }

    pub fn min_size(&self) -> (u32, u32) {
        (self.min_width, self.min_height)
    }

    /// Start a drag. Any completed but unconfirmed region is discarded.
    pub fn begin(&mut self, at: Point) {
        self.anchor = Some(at);
        self.current = Some(Region::from_corners(at, at));
        self.pending = None;
    }

    /// Move the pointer. Returns the rectangle to draw while dragging.
    pub fn update(&mut self, at: Point) -> Option<Region> {
        let anchor = self.anchor?;
        let region = Region::from_corners(anchor, at);
        self.current = Some(region);
        Some(region)
    }

    /// Release the pointer. Drags below the minimum size yield `None`.
    pub fn end(&mut self, at: Point) -> Option<Region> {
        let anchor = self.anchor.take()?;
        self.current = None;

        let region = Region::from_corners(anchor, at);
        if !region.meets_minimum(self.min_width, self.min_height) {
            debug!(
                region = %region,
                min_width = self.min_width,
                min_height = self.min_height,
                "Selection too small; ignored"
            );
            return None;
        }

        debug!(region = %region, "Selection completed");
        self.pending = Some(region);
        Some(region)
    }

    /// Abandon an in-progress drag, keeping any earlier completed region.
    pub fn cancel(&mut self) {
        self.anchor = None;
        self.current = None;
    }

    /// Drop everything, including the completed region.
    pub fn clear(&mut self) {
        self.cancel();
        self.pending = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// The rectangle under the pointer while dragging.
    pub fn current(&self) -> Option<Region> {
        self.current
    }

    /// The last completed region awaiting confirmation.
    pub fn pending(&self) -> Option<Region> {
        self.pending
    }
}

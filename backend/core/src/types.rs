use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pointer position in image-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A rectangular sub-area of a captured image, in image-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Normalize two drag corners into a rectangle anchored at the top-left corner.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether both sides reach the given minimums.
    pub fn meets_minimum(&self, min_width: u32, min_height: u32) -> bool {
        self.width >= min_width && self.height >= min_height
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Opaque, immutable reference to raw encoded image bytes.
///
/// Cloning is cheap: the payload is reference-counted and never mutated.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    id: Uuid,
    mime_type: String,
    data: Bytes,
}

impl ImageHandle {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The fixed set of attribute keys a user can describe an item with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetKey {
    ItemType,
    Color,
    Brand,
    Style,
    PriceCeiling,
    Size,
    Material,
    FreeText,
}

impl FacetKey {
    /// All keys, in summary precedence order.
    pub const ALL: [FacetKey; 8] = [
        FacetKey::ItemType,
        FacetKey::Color,
        FacetKey::Brand,
        FacetKey::Style,
        FacetKey::PriceCeiling,
        FacetKey::Size,
        FacetKey::Material,
        FacetKey::FreeText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKey::ItemType => "itemType",
            FacetKey::Color => "color",
            FacetKey::Brand => "brand",
            FacetKey::Style => "style",
            FacetKey::PriceCeiling => "priceCeiling",
            FacetKey::Size => "size",
            FacetKey::Material => "material",
            FacetKey::FreeText => "freeText",
        }
    }

    /// Short label used in the describe-stage summary.
    pub fn label(&self) -> &'static str {
        match self {
            FacetKey::ItemType => "Type",
            FacetKey::Color => "Color",
            FacetKey::Brand => "Brand",
            FacetKey::Style => "Style",
            FacetKey::PriceCeiling => "Price",
            FacetKey::Size => "Size",
            FacetKey::Material => "Material",
            FacetKey::FreeText => "Details",
        }
    }
}

impl fmt::Display for FacetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute values describing the sought item. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub item_type: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub style: Option<String>,
    pub price_ceiling: Option<String>,
    pub size: Option<String>,
    pub material: Option<String>,
    pub free_text: Option<String>,
}

impl Facets {
    pub fn with(mut self, key: FacetKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    fn slot_mut(&mut self, key: FacetKey) -> &mut Option<String> {
        match key {
            FacetKey::ItemType => &mut self.item_type,
            FacetKey::Color => &mut self.color,
            FacetKey::Brand => &mut self.brand,
            FacetKey::Style => &mut self.style,
            FacetKey::PriceCeiling => &mut self.price_ceiling,
            FacetKey::Size => &mut self.size,
            FacetKey::Material => &mut self.material,
            FacetKey::FreeText => &mut self.free_text,
        }
    }

    /// Set a facet. Blank values clear it.
    pub fn set(&mut self, key: FacetKey, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        *self.slot_mut(key) = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn clear(&mut self, key: FacetKey) {
        *self.slot_mut(key) = None;
    }

    /// The non-empty value for `key`, if any.
    pub fn get(&self, key: FacetKey) -> Option<&str> {
        let slot = match key {
            FacetKey::ItemType => &self.item_type,
            FacetKey::Color => &self.color,
            FacetKey::Brand => &self.brand,
            FacetKey::Style => &self.style,
            FacetKey::PriceCeiling => &self.price_ceiling,
            FacetKey::Size => &self.size,
            FacetKey::Material => &self.material,
            FacetKey::FreeText => &self.free_text,
        };
        slot.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        FacetKey::ALL.iter().all(|key| self.get(*key).is_none())
    }

    /// A search may be submitted once an item type or a free-text description exists.
    pub fn can_submit(&self) -> bool {
        self.get(FacetKey::ItemType).is_some() || self.get(FacetKey::FreeText).is_some()
    }

    /// `"Type: Dress, Color: Blue"` style summary for display while describing.
    pub fn labeled_summary(&self) -> String {
        FacetKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|v| format!("{}: {}", key.label(), v)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// What a vision model reports about an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub dominant_colors: Vec<String>,
    pub detected_items: Vec<String>,
    pub style_tags: Vec<String>,
}

/// The normalized query handed to ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalQuery {
    /// Human-readable search summary, e.g. `"Dress, Blue, under $50"`.
    pub summary: String,
    /// Ordered, de-duplicated lowercase terms. Never empty.
    pub terms: Vec<String>,
}

impl CanonicalQuery {
    /// Terms joined by single spaces.
    pub fn text(&self) -> String {
        self.terms.join(" ")
    }

    /// Case-insensitive substring containment over the query text.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.terms.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

impl fmt::Display for CanonicalQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub price: String,
    pub store: String,
    pub image_ref: String,
    pub link: String,
    /// Match percentage in `0..=100`.
    pub similarity: u8,
}

/// Which entry point a session started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    Image,
    Text,
}

/// One step of the guided session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Capture,
    Select,
    Describe,
    Search,
    CustomDescribe,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Capture => "capture",
            Stage::Select => "select",
            Stage::Describe => "describe",
            Stage::Search => "search",
            Stage::CustomDescribe => "custom_describe",
        }
    }

    /// Stages a session can be entered at.
    pub fn is_entry(&self) -> bool {
        matches!(self, Stage::Capture | Stage::CustomDescribe)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_normalizes_any_drag_direction() {
        let r = Region::from_corners(Point::new(120, 90), Point::new(20, 30));
        assert_eq!(r, Region { x: 20, y: 30, width: 100, height: 60 });
        assert_eq!(r.area(), 6000);
    }

    #[test]
    fn region_minimum_is_inclusive() {
        let r = Region { x: 0, y: 0, width: 20, height: 20 };
        assert!(r.meets_minimum(20, 20));
        assert!(!Region { width: 19, ..r }.meets_minimum(20, 20));
    }

    #[test]
    fn blank_facet_values_clear_the_slot() {
        let mut facets = Facets::default().with(FacetKey::Color, "Blue");
        facets.set(FacetKey::Color, "   ");
        assert!(facets.get(FacetKey::Color).is_none());
        assert!(facets.is_empty());
    }

    #[test]
    fn submission_needs_item_type_or_free_text() {
        let facets = Facets::default()
            .with(FacetKey::Color, "Red")
            .with(FacetKey::Brand, "Zara");
        assert!(!facets.can_submit());
        assert!(facets.clone().with(FacetKey::ItemType, "Dress").can_submit());
        assert!(facets.with(FacetKey::FreeText, "something flowy").can_submit());
    }

    #[test]
    fn labeled_summary_follows_precedence() {
        let facets = Facets::default()
            .with(FacetKey::Material, "Silk")
            .with(FacetKey::ItemType, "Dress")
            .with(FacetKey::Color, "Blue");
        assert_eq!(facets.labeled_summary(), "Type: Dress, Color: Blue, Material: Silk");
    }

    #[test]
    fn query_mentions_is_case_insensitive_substring() {
        let q = CanonicalQuery {
            summary: "Dresses".into(),
            terms: vec!["dresses".into(), "blue".into()],
        };
        assert!(q.mentions("DRESS"));
        assert!(!q.mentions("shoes"));
        assert_eq!(q.to_string(), "dresses blue");
    }

    #[test]
    fn image_handle_clones_share_identity() {
        let handle = ImageHandle::new("image/png", vec![1u8, 2, 3]);
        let copy = handle.clone();
        assert_eq!(handle.id(), copy.id());
        assert_eq!(copy.len(), 3);
        assert_eq!(copy.mime_type(), "image/png");
    }
}

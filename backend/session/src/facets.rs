//! Facet collection for the describe stages.

use haute_core::{FacetKey, Facets};
use tracing::debug;

const ITEM_TYPES: &[&str] = &[
    "T-shirt", "Dress", "Jeans", "Jacket", "Shoes", "Bag", "Watch", "Sunglasses", "Sneakers",
    "Boots", "Sweater", "Skirt", "Shorts", "Blazer",
];
const COLORS: &[&str] = &[
    "Black", "White", "Blue", "Red", "Pink", "Green", "Yellow", "Purple", "Brown", "Gray", "Navy",
    "Beige",
];
const BRANDS: &[&str] = &["Nike", "Adidas", "Zara", "H&M", "Uniqlo", "Gap", "Levi's", "Puma"];
const STYLES: &[&str] = &[
    "Casual",
    "Formal",
    "Vintage",
    "Modern",
    "Bohemian",
    "Minimalist",
    "Streetwear",
    "Classic",
    "Sporty",
    "Elegant",
];
const PRICE_CEILINGS: &[&str] = &["$25", "$50", "$100", "$200"];
const SIZES: &[&str] = &["XS", "S", "M", "L", "XL", "XXL"];
const MATERIALS: &[&str] = &["Cotton", "Denim", "Leather", "Silk", "Wool"];

/// Quick-pick values offered for a facet. Free text has none.
pub fn suggestions(key: FacetKey) -> &'static [&'static str] {
    match key {
        FacetKey::ItemType => ITEM_TYPES,
        FacetKey::Color => COLORS,
        FacetKey::Brand => BRANDS,
        FacetKey::Style => STYLES,
        FacetKey::PriceCeiling => PRICE_CEILINGS,
        FacetKey::Size => SIZES,
        FacetKey::Material => MATERIALS,
        FacetKey::FreeText => &[],
    }
}

/// In-memory facet state. Writes are last-write-wins; reads are snapshots.
#[derive(Debug, Clone, Default)]
pub struct FacetCollector {
    facets: Facets,
}

impl FacetCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: FacetKey, value: impl Into<String>) {
        self.facets.set(key, value);
        debug!(facet = %key, value = ?self.facets.get(key), "Facet updated");
    }

    pub fn clear(&mut self, key: FacetKey) {
        self.facets.clear(key);
        debug!(facet = %key, "Facet cleared");
    }

    pub fn reset(&mut self) {
        self.facets = Facets::default();
    }

    pub fn get(&self, key: FacetKey) -> Option<&str> {
        self.facets.get(key)
    }

    pub fn snapshot(&self) -> Facets {
        self.facets.clone()
    }

    pub fn can_submit(&self) -> bool {
        self.facets.can_submit()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn labeled_summary(&self) -> String {
        self.facets.labeled_summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut c = FacetCollector::new();
        c.set(FacetKey::Color, "Red");
        c.set(FacetKey::Color, "Navy");
        assert_eq!(c.get(FacetKey::Color), Some("Navy"));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut c = FacetCollector::new();
        c.set(FacetKey::ItemType, "Dress");
        let snap = c.snapshot();
        c.clear(FacetKey::ItemType);
        assert_eq!(snap.get(FacetKey::ItemType), Some("Dress"));
        assert!(c.is_empty());
    }

    #[test]
    fn free_text_alone_enables_submit() {
        let mut c = FacetCollector::new();
        c.set(FacetKey::Color, "Blue");
        assert!(!c.can_submit());
        c.set(FacetKey::FreeText, "  ");
        assert!(!c.can_submit());
        c.set(FacetKey::FreeText, "with a bow");
        assert!(c.can_submit());
    }

    #[test]
    fn quick_picks() {
        assert_eq!(suggestions(FacetKey::ItemType).len(), 14);
        assert!(suggestions(FacetKey::Brand).contains(&"Levi's"));
        assert_eq!(suggestions(FacetKey::PriceCeiling), &["$25", "$50", "$100", "$200"]);
        assert!(suggestions(FacetKey::FreeText).is_empty());
    }
}

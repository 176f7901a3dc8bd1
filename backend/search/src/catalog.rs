//! Static product catalog, partitioned into category buckets.

use haute_core::{Candidate, CanonicalQuery};
use serde::{Deserialize, Serialize};

/// Bumped whenever an entry below changes. Ranking output is a pure function of
/// the query and this version.
pub const CATALOG_VERSION: &str = "2024.1";

const IMAGE_HOST: &str = "https://images.unsplash.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dresses,
    Footwear,
    General,
    Extended,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dresses => "dresses",
            Category::Footwear => "footwear",
            Category::General => "general",
            Category::Extended => "extended",
        }
    }

    pub fn entries(&self) -> &'static [CatalogEntry] {
        match self {
            Category::Dresses => DRESSES,
            Category::Footwear => FOOTWEAR,
            Category::General => GENERAL,
            Category::Extended => EXTENDED,
        }
    }

    pub fn candidates(self) -> impl Iterator<Item = Candidate> {
        self.entries().iter().map(CatalogEntry::to_candidate)
    }
}

/// One static catalog row. Similarity is pre-assigned and never recomputed.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub price: &'static str,
    pub store: &'static str,
    pub photo: &'static str,
    pub similarity: u8,
}

impl CatalogEntry {
    pub fn image_url(&self) -> String {
        format!("{IMAGE_HOST}/{}?w=300&h=300&fit=crop", self.photo)
    }

    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            id: self.id.to_string(),
            title: self.title.to_string(),
            price: self.price.to_string(),
            store: self.store.to_string(),
            image_ref: self.image_url(),
            link: "#".to_string(),
            similarity: self.similarity,
        }
    }
}

const GENERAL: &[CatalogEntry] = &[
    CatalogEntry {
        id: "1",
        title: "Cotton Basic T-Shirt",
        price: "$24.99",
        store: "Fashion Store",
        photo: "photo-1521572163474-6864f9cf17ab",
        similarity: 95,
    },
    CatalogEntry {
        id: "2",
        title: "Premium Cotton Tee",
        price: "$35.00",
        store: "Style Hub",
        photo: "photo-1583743814966-8936f37f4eb6",
        similarity: 88,
    },
    CatalogEntry {
        id: "3",
        title: "Organic Cotton T-Shirt",
        price: "$28.50",
        store: "Eco Fashion",
        photo: "photo-1586363104862-3a5e2ab60d99",
        similarity: 82,
    },
];

const DRESSES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "4",
        title: "Summer Floral Dress",
        price: "$45.99",
        store: "Dress Boutique",
        photo: "photo-1595777457583-95e059d581b8",
        similarity: 92,
    },
    CatalogEntry {
        id: "5",
        title: "Casual Midi Dress",
        price: "$38.50",
        store: "Fashion Forward",
        photo: "photo-1566479179817-c0ae1ff3e0c0",
        similarity: 87,
    },
];

const FOOTWEAR: &[CatalogEntry] = &[
    CatalogEntry {
        id: "6",
        title: "Classic White Sneakers",
        price: "$79.99",
        store: "Shoe Palace",
        photo: "photo-1549298916-b41d501d3772",
        similarity: 94,
    },
    CatalogEntry {
        id: "7",
        title: "Running Sports Shoes",
        price: "$120.00",
        store: "Athletic Gear",
        photo: "photo-1542291026-7eec264c27ff",
        similarity: 89,
    },
];

const EXTENDED: &[CatalogEntry] = &[
    CatalogEntry {
        id: "8",
        title: "Designer Cotton Top",
        price: "$65.00",
        store: "Luxury Brands",
        photo: "photo-1571455786673-9d9d6c194f90",
        similarity: 75,
    },
    CatalogEntry {
        id: "9",
        title: "Casual Cotton Shirt",
        price: "$32.00",
        store: "Everyday Wear",
        photo: "photo-1622445275576-721325763afe",
        similarity: 70,
    },
];

/// Keyword routes, checked in order. First match wins.
const ROUTES: &[(Category, &[&str])] = &[
    (Category::Dresses, &["dress"]),
    (Category::Footwear, &["shoes", "sneakers"]),
];

/// The category bucket a query routes to, if any keyword matches.
pub fn route(query: &CanonicalQuery) -> Option<Category> {
    ROUTES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| query.mentions(k)))
        .map(|(category, _)| *category)
}

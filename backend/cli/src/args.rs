//! Shared command-line arguments.

use clap::Args;
use haute_core::{FacetKey, Facets, Region};

/// Facet flags accepted by every search command.
#[derive(Debug, Clone, Default, Args)]
pub struct FacetArgs {
    /// Item type, e.g. "Dress"
    #[arg(long)]
    pub item_type: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub style: Option<String>,
    /// Price ceiling, e.g. "$50"
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub material: Option<String>,
    /// Free-text description
    #[arg(long, visible_alias = "text")]
    pub details: Option<String>,
}

impl FacetArgs {
    pub fn to_facets(&self) -> Facets {
        let pairs = [
            (FacetKey::ItemType, &self.item_type),
            (FacetKey::Color, &self.color),
            (FacetKey::Brand, &self.brand),
            (FacetKey::Style, &self.style),
            (FacetKey::PriceCeiling, &self.price),
            (FacetKey::Size, &self.size),
            (FacetKey::Material, &self.material),
            (FacetKey::FreeText, &self.details),
        ];
        let mut facets = Facets::default();
        for (key, value) in pairs {
            if let Some(value) = value {
                facets.set(key, value.as_str());
            }
        }
        facets
    }
}

/// Parse `X,Y,W,H` into a region.
pub fn parse_region(s: &str) -> Result<Region, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, width, height] = parts[..] else {
        return Err(format!("expected X,Y,W,H, got '{s}'"));
    };
    let num = |field: &str, v: &str| {
        v.parse::<u32>()
            .map_err(|_| format!("{field} must be a non-negative integer, got '{v}'"))
    };
    let region = Region {
        x: num("x", x)?,
        y: num("y", y)?,
        width: num("width", width)?,
        height: num("height", height)?,
    };
    if region.x.checked_add(region.width).is_none() || region.y.checked_add(region.height).is_none() {
        return Err(format!("region '{s}' is out of range"));
    }
    Ok(region)
}

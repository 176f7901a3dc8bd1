pub mod catalog;
pub mod query;
pub mod ranker;

pub use catalog::{CATALOG_VERSION, CatalogEntry, Category, route};
pub use query::{QuerySettings, QuerySynthesizer, build_summary, tokenize};
pub use ranker::{CatalogSource, Ranker};

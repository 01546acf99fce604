//! The music catalog: tracks, the catalog service client and filters.

mod catalog;
mod filter;
mod model;

pub use catalog::{CatalogEntry, CatalogSource, HttpCatalog, fetch_catalog};
pub use filter::{Filter, fuzzy_match_positions, natural_order};
pub use model::{Catalog, Track, TrackOrigin};

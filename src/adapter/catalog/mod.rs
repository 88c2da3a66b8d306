//! Instrument catalog sources.

mod loader;

pub use loader::{CatalogFormat, CsvCatalogLoader, YieldUnit};

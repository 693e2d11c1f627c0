//! Choropleth data ingestion.
//!
//! Loads the two inputs of a choropleth map:
//!
//! - **Region layers** ([`GeoTable`]): GeoJSON features with attributes,
//!   reprojected on a best-effort basis to [`TARGET_CRS`].
//! - **Attribute tables** ([`AttributeTable`]): delimited text with a
//!   header row, holding the key and value columns to join.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use choro_ingest::{AttributeTable, CsvOptions, GeoLoadOptions, GeoTable};
//!
//! let geo = GeoTable::load(Path::new("regions.geojson"), &GeoLoadOptions::default())?;
//! let attrs = AttributeTable::load(Path::new("values.csv"), &CsvOptions::default())?;
//! let (key, value) = attrs.infer_key_and_value_columns();
//! ```

mod attributes;
mod error;
mod geo;
mod projection;

// === Error Types ===
pub use error::{LoadError, Result};

// === Region Layers ===
pub use geo::{GeoLoadOptions, GeoTable, Region, key_text};
pub use projection::{PolarStereographic, ProjectionError, TARGET_CRS};

// === Attribute Tables ===
pub use attributes::{AttributeTable, CsvOptions, VALUE_COLUMN_NAMES};

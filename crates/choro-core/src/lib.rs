//! Choropleth core.
//!
//! Control flow: a [`GeoTable`](choro_ingest::GeoTable) and an
//! [`AttributeTable`](choro_ingest::AttributeTable) are joined into one
//! value per region, each value is classified to a color, and the result
//! is handed to a rendering collaborator as a [`RenderPlan`].

#![deny(unsafe_code)]

pub mod edit;
pub mod error;
pub mod join;
pub mod plan;
pub mod session;

pub use edit::parse_edit;
pub use error::{JoinError, PlanError};
pub use join::{JoinReport, coerce_numeric, join};
pub use plan::{Legend, LegendEntry, NO_DATA_LABEL, PlannedRegion, RenderPlan, Renderer};
pub use session::{InferredColumns, Session};

//! Data model for choropleth classification.
//!
//! The types here carry no I/O: colors, bins, exact-value rules, the rule
//! set that turns a joined value into a color, and the outline styling.

#![deny(unsafe_code)]

pub mod color;
pub mod draft;
pub mod error;
pub mod rules;
pub mod style;

pub use color::HexColor;
pub use draft::{BinRowDraft, ExactRowDraft, build_bins, build_exact_values, parse_number};
pub use error::{ParseError, Result};
pub use rules::{Bin, ClassificationMode, ClassificationRuleSet, ExactValue, JoinedValue};
pub use style::{DEFAULT_EDGE_WIDTH, StyleConfig};

//! Scheme files for choropleth styling.
//!
//! A scheme bundles the classification rules with the no-data and outline
//! styling. It is a flat, versionless JSON document:
//!
//! ```text
//! {
//!     "mode": "bins" | "exact",
//!     "bins": [{"lower": number, "upper": number, "color_hex": string}, ...],
//!     "exact_values": [{"value": number, "color_hex": string}, ...],
//!     "no_data_color": string,
//!     "edge_color": string,
//!     "edge_width": number
//! }
//! ```
//!
//! Loading a scheme replaces the live rules and style as a whole.

mod codec;
mod error;
mod io;

pub use codec::{
    BinEntry, ExactEntry, SchemeDocument, deserialize, from_json_str, serialize, to_json_string,
};
pub use error::{FormatError, Result};
pub use io::{load_scheme, save_scheme};

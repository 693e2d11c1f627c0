//! Color values as entered by the user.
//!
//! Colors are validated on construction but keep the text they were
//! written with, so a saved scheme reads back byte-for-byte.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// Color keywords accepted in addition to hex notation.
const NAMED_COLORS: &[&str] = &[
    "aqua",
    "black",
    "blue",
    "brown",
    "cyan",
    "fuchsia",
    "gray",
    "green",
    "grey",
    "lime",
    "magenta",
    "maroon",
    "navy",
    "olive",
    "orange",
    "pink",
    "purple",
    "red",
    "silver",
    "teal",
    "transparent",
    "white",
    "yellow",
];

/// A validated color string: `#rgb`, `#rrggbb`, `#aarrggbb`, or a basic
/// color keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if is_hex_notation(trimmed) || is_named(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ParseError::InvalidColor {
                text: text.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default fill for regions without a usable value.
    pub fn no_data_default() -> Self {
        Self("#D3D3D3".to_string())
    }

    /// Default region outline color.
    pub fn edge_default() -> Self {
        Self("#444444".to_string())
    }

    /// Color given to freshly added rule rows.
    pub fn new_row_default() -> Self {
        Self("#ffffff".to_string())
    }
}

fn is_hex_notation(text: &str) -> bool {
    let Some(digits) = text.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}

fn is_named(text: &str) -> bool {
    NAMED_COLORS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(text))
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl std::str::FromStr for HexColor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hex_forms() {
        for text in ["#abc", "#A1B2C3", "#80ff0000", "  #ffffff "] {
            assert!(HexColor::parse(text).is_ok(), "{text} should parse");
        }
    }

    #[test]
    fn keeps_original_spelling() {
        let color = HexColor::parse(" #D3d3D3 ").unwrap();
        assert_eq!(color.as_str(), "#D3d3D3");
    }

    #[test]
    fn accepts_keywords_case_insensitively() {
        assert_eq!(HexColor::parse("Red").unwrap().as_str(), "Red");
        assert!(HexColor::parse("transparent").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        for text in ["", "#", "#12", "#12345", "#gggggg", "ff0000", "notacolor"] {
            assert!(
                matches!(
                    HexColor::parse(text),
                    Err(ParseError::InvalidColor { .. })
                ),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn serde_validates() {
        let ok: HexColor = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(ok.as_str(), "#00ff00");
        assert!(serde_json::from_str::<HexColor>("\"nope\"").is_err());
    }
}

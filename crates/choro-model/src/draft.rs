//! Raw rule-table rows as typed into an editor, and their validation.
//!
//! A rule list is built all-or-nothing: the first row that fails to parse
//! aborts the build and is reported by its 1-based position.

use crate::color::HexColor;
use crate::error::{ParseError, Result};
use crate::rules::{Bin, ExactValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinRowDraft {
    pub lower: String,
    pub upper: String,
    pub color: String,
}

impl BinRowDraft {
    pub fn new(lower: impl Into<String>, upper: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
            color: color.into(),
        }
    }

    fn parse(&self) -> Result<Bin> {
        Ok(Bin {
            lower: parse_number(&self.lower)?,
            upper: parse_number(&self.upper)?,
            color_hex: HexColor::parse(&self.color)?,
        })
    }
}

impl Default for BinRowDraft {
    fn default() -> Self {
        Self::new("0", "1", HexColor::new_row_default().as_str())
    }
}

impl From<&Bin> for BinRowDraft {
    fn from(bin: &Bin) -> Self {
        Self::new(bin.lower.to_string(), bin.upper.to_string(), bin.color_hex.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactRowDraft {
    pub value: String,
    pub color: String,
}

impl ExactRowDraft {
    pub fn new(value: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            color: color.into(),
        }
    }

    fn parse(&self) -> Result<ExactValue> {
        Ok(ExactValue {
            value: parse_number(&self.value)?,
            color_hex: HexColor::parse(&self.color)?,
        })
    }
}

impl Default for ExactRowDraft {
    fn default() -> Self {
        Self::new("0", HexColor::new_row_default().as_str())
    }
}

impl From<&ExactValue> for ExactRowDraft {
    fn from(ev: &ExactValue) -> Self {
        Self::new(ev.value.to_string(), ev.color_hex.as_str())
    }
}

/// Parse a required decimal number. Blank text is an error here.
pub fn parse_number(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            text: text.to_string(),
        })
}

pub fn build_bins(rows: &[BinRowDraft]) -> Result<Vec<Bin>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            row.parse().map_err(|reason| ParseError::BinRow {
                row: idx + 1,
                reason: Box::new(reason),
            })
        })
        .collect()
}

pub fn build_exact_values(rows: &[ExactRowDraft]) -> Result<Vec<ExactValue>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            row.parse().map_err(|reason| ParseError::ExactRow {
                row: idx + 1,
                reason: Box::new(reason),
            })
        })
        .collect()
}

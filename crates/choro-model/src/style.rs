use serde::{Deserialize, Serialize};

use crate::color::HexColor;

pub const DEFAULT_EDGE_WIDTH: f64 = 0.4;

/// Styling applied around the classification: no-data fill and outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub no_data_color: HexColor,
    pub edge_color: HexColor,
    /// Outline width, never negative.
    pub edge_width: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            no_data_color: HexColor::no_data_default(),
            edge_color: HexColor::edge_default(),
            edge_width: DEFAULT_EDGE_WIDTH,
        }
    }
}

impl StyleConfig {
    /// Set the outline width, clamping negative input to zero.
    pub fn set_edge_width(&mut self, width: f64) {
        self.edge_width = if width.is_nan() { 0.0 } else { width.max(0.0) };
    }
}

//! Per-region colors and styling handed to a rendering collaborator.
//!
//! The plan is a pure function of the region layer, the rule set, and the
//! style. Drawing it is someone else's job; see [`Renderer`].

use serde::Serialize;

use choro_ingest::GeoTable;
use choro_model::{ClassificationMode, ClassificationRuleSet, HexColor, JoinedValue, StyleConfig};

use crate::error::PlanError;

/// Legend label for the no-data swatch.
pub const NO_DATA_LABEL: &str = "No data";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRegion {
    /// Position of the region in the layer.
    pub index: usize,
    pub key: Option<String>,
    pub value: JoinedValue,
    pub fill: HexColor,
    /// The region has no value at all.
    pub missing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: HexColor,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// One swatch per active rule in list order, then the no-data swatch.
    pub fn from_rules(rules: &ClassificationRuleSet, style: &StyleConfig) -> Self {
        let mut entries: Vec<LegendEntry> = match rules.mode {
            ClassificationMode::Bins => rules
                .bins
                .iter()
                .map(|bin| LegendEntry {
                    label: format!("{:?} – {:?}", bin.lower, bin.upper),
                    color: bin.color_hex.clone(),
                })
                .collect(),
            ClassificationMode::Exact => rules
                .exact_values
                .iter()
                .map(|ev| LegendEntry {
                    label: format!("{:?}", ev.value),
                    color: ev.color_hex.clone(),
                })
                .collect(),
        };
        entries.push(LegendEntry {
            label: NO_DATA_LABEL.to_string(),
            color: style.no_data_color.clone(),
        });
        Self { entries }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub regions: Vec<PlannedRegion>,
    pub no_data_color: HexColor,
    pub edge_color: HexColor,
    pub edge_width: f64,
    pub legend: Legend,
}

impl RenderPlan {
    /// Classify every region. The active rule list must not be empty.
    pub fn build(
        geo: &GeoTable,
        rules: &ClassificationRuleSet,
        style: &StyleConfig,
    ) -> Result<Self, PlanError> {
        if rules.active_len() == 0 {
            return Err(match rules.mode {
                ClassificationMode::Bins => PlanError::NoBins,
                ClassificationMode::Exact => PlanError::NoExactValues,
            });
        }

        let regions = geo
            .regions()
            .iter()
            .enumerate()
            .map(|(index, region)| PlannedRegion {
                index,
                key: geo.key_of(region),
                value: region.value,
                fill: rules.classify(region.value, &style.no_data_color).clone(),
                missing: region.value.is_none(),
            })
            .collect();

        Ok(Self {
            regions,
            no_data_color: style.no_data_color.clone(),
            edge_color: style.edge_color.clone(),
            edge_width: style.edge_width,
            legend: Legend::from_rules(rules, style),
        })
    }

    pub fn missing_count(&self) -> usize {
        self.regions.iter().filter(|r| r.missing).count()
    }
}

/// A collaborator that draws a planned map.
pub trait Renderer {
    type Error;

    fn render(&mut self, geo: &GeoTable, plan: &RenderPlan) -> Result<(), Self::Error>;
}

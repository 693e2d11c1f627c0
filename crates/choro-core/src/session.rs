//! Explicit application state for a choropleth front end.
//!
//! A [`Session`] owns the loaded inputs, the rule set, and the style.
//! Every operation validates its input before touching state, so a failed
//! call leaves the session exactly as it was.

use std::path::Path;

use tracing::{debug, info};

use choro_ingest::{AttributeTable, CsvOptions, GeoLoadOptions, GeoTable, LoadError};
use choro_model::{
    BinRowDraft, ClassificationMode, ClassificationRuleSet, ExactRowDraft, JoinedValue,
    ParseError, StyleConfig, build_bins, build_exact_values,
};

use crate::edit::parse_edit;
use crate::error::{JoinError, PlanError};
use crate::join::{JoinReport, join};
use crate::plan::RenderPlan;

/// Key and value columns guessed from a freshly loaded attribute table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredColumns {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    geo: Option<GeoTable>,
    attributes: Option<AttributeTable>,
    rules: ClassificationRuleSet,
    style: StyleConfig,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geo(&self) -> Option<&GeoTable> {
        self.geo.as_ref()
    }

    pub fn attributes(&self) -> Option<&AttributeTable> {
        self.attributes.as_ref()
    }

    pub fn rules(&self) -> &ClassificationRuleSet {
        &self.rules
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StyleConfig {
        &mut self.style
    }

    /// Replace the region layer. Any previous join is discarded with it.
    pub fn load_geo(&mut self, path: &Path, options: &GeoLoadOptions) -> Result<&GeoTable, LoadError> {
        let geo = GeoTable::load(path, options)?;
        Ok(&*self.geo.insert(geo))
    }

    pub fn set_geo(&mut self, geo: GeoTable) {
        self.geo = Some(geo);
    }

    /// Replace the attribute table and guess its key and value columns.
    pub fn load_attributes(
        &mut self,
        path: &Path,
        options: &CsvOptions,
    ) -> Result<InferredColumns, LoadError> {
        let table = AttributeTable::load(path, options)?;
        Ok(self.set_attributes(table))
    }

    pub fn set_attributes(&mut self, table: AttributeTable) -> InferredColumns {
        let (key, value) = table.infer_key_and_value_columns();
        let inferred = InferredColumns {
            key: key.map(str::to_string),
            value: value.map(str::to_string),
        };
        debug!(key = ?inferred.key, value = ?inferred.value, "inferred attribute columns");
        self.attributes = Some(table);
        inferred
    }

    /// Change the layer's key column. Does nothing before a layer is loaded.
    pub fn set_geo_key(&mut self, column: &str) {
        if let Some(geo) = self.geo.as_mut() {
            geo.set_key_column(column);
        }
    }

    pub fn join(&mut self, key_geo: &str, key_csv: &str, val_csv: &str) -> Result<JoinReport, JoinError> {
        let geo = self.geo.as_mut().ok_or(JoinError::GeoNotLoaded)?;
        let attrs = self.attributes.as_ref().ok_or(JoinError::AttributesNotLoaded)?;
        join(geo, attrs, key_geo, key_csv, val_csv)
    }

    /// Apply a value-table edit to every region keyed `region_key`.
    /// Returns how many regions changed.
    pub fn edit_value(&mut self, region_key: &str, text: &str) -> Result<usize, ParseError> {
        let value = parse_edit(text)?;
        Ok(self.set_value(region_key, value))
    }

    pub fn set_value(&mut self, region_key: &str, value: JoinedValue) -> usize {
        self.geo
            .as_mut()
            .map_or(0, |geo| geo.update_value(region_key, value))
    }

    /// Current key/value pairs for the value table.
    pub fn value_rows(&self) -> Vec<(String, JoinedValue)> {
        self.geo.as_ref().map(GeoTable::value_rows).unwrap_or_default()
    }

    pub fn set_mode(&mut self, mode: ClassificationMode) {
        self.rules.set_mode(mode);
    }

    /// Rebuild both rule lists from editor rows. Nothing changes unless
    /// every row of both tables parses.
    pub fn set_rules_from_drafts(
        &mut self,
        mode: ClassificationMode,
        bins: &[BinRowDraft],
        exact_values: &[ExactRowDraft],
    ) -> Result<(), ParseError> {
        let bins = build_bins(bins)?;
        let exact_values = build_exact_values(exact_values)?;
        self.rules = ClassificationRuleSet {
            mode,
            bins,
            exact_values,
        };
        Ok(())
    }

    /// Replace the rule set and style wholesale, as when a scheme is loaded.
    pub fn apply_scheme(&mut self, rules: ClassificationRuleSet, style: StyleConfig) {
        info!(
            mode = rules.mode.as_str(),
            bins = rules.bins.len(),
            exact_values = rules.exact_values.len(),
            "applied scheme"
        );
        self.rules = rules;
        self.style = style;
    }

    /// Current rule set and style, as saved into a scheme.
    pub fn scheme_parts(&self) -> (&ClassificationRuleSet, &StyleConfig) {
        (&self.rules, &self.style)
    }

    pub fn plan(&self) -> Result<RenderPlan, PlanError> {
        let geo = self.geo.as_ref().ok_or(PlanError::GeoNotLoaded)?;
        RenderPlan::build(geo, &self.rules, &self.style)
    }
}

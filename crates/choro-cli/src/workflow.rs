//! The load, join, edit and plan sequence shared by `classify` and
//! `export`, and scheme construction for `scheme new`.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info_span, warn};

use choro_core::{JoinReport, RenderPlan, Session};
use choro_ingest::{CsvOptions, GeoLoadOptions};
use choro_model::{
    BinRowDraft, ClassificationMode, ClassificationRuleSet, ExactRowDraft, HexColor, StyleConfig,
    build_bins, build_exact_values,
};
use choro_scheme::load_scheme;

/// Inputs of one map.
#[derive(Debug, Clone)]
pub struct MapRequest {
    pub geo: PathBuf,
    pub csv: PathBuf,
    pub scheme: PathBuf,
    /// Region attribute to join on; the layer's first attribute when unset.
    pub key_geo: Option<String>,
    /// CSV key column; inferred when unset.
    pub key_csv: Option<String>,
    /// CSV value column; inferred when unset.
    pub value: Option<String>,
    /// Value-table edits applied after the join, in order.
    pub edits: Vec<(String, String)>,
    pub geo_options: GeoLoadOptions,
    pub csv_options: CsvOptions,
}

/// Columns the join actually used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinColumns {
    pub key_geo: String,
    pub key_csv: String,
    pub value: String,
}

/// A joined, edited and classified map.
#[derive(Debug)]
pub struct PreparedMap {
    pub session: Session,
    pub columns: JoinColumns,
    pub report: JoinReport,
    pub plan: RenderPlan,
}

pub fn prepare_map(request: &MapRequest) -> Result<PreparedMap> {
    let span = info_span!("map", geo = %request.geo.display(), csv = %request.csv.display());
    let _guard = span.enter();

    let mut session = Session::new();
    let (rules, style) = load_scheme(&request.scheme)
        .with_context(|| format!("load scheme {}", request.scheme.display()))?;
    session.apply_scheme(rules, style);

    let default_geo_key = session
        .load_geo(&request.geo, &request.geo_options)
        .with_context(|| format!("load region layer {}", request.geo.display()))?
        .key_column()
        .map(str::to_string);
    let inferred = session
        .load_attributes(&request.csv, &request.csv_options)
        .with_context(|| format!("load attribute table {}", request.csv.display()))?;

    let columns = JoinColumns {
        key_geo: request
            .key_geo
            .clone()
            .or(default_geo_key)
            .ok_or_else(|| anyhow!("region layer has no attributes to join on"))?,
        key_csv: request
            .key_csv
            .clone()
            .or(inferred.key)
            .ok_or_else(|| anyhow!("could not infer a key column; pass --key-csv"))?,
        value: request
            .value
            .clone()
            .or(inferred.value)
            .ok_or_else(|| anyhow!("could not infer a value column; pass --value"))?,
    };

    let report = session
        .join(&columns.key_geo, &columns.key_csv, &columns.value)
        .context("join attribute table")?;

    for (key, text) in &request.edits {
        let changed = session
            .edit_value(key, text)
            .with_context(|| format!("edit value of region '{key}'"))?;
        if changed == 0 {
            warn!(key = %key, "edit matched no region");
        }
    }

    let plan = session.plan().context("classify regions")?;
    Ok(PreparedMap {
        session,
        columns,
        report,
        plan,
    })
}

/// Raw scheme settings as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SchemeRequest {
    pub mode: ClassificationMode,
    pub bins: Vec<BinRowDraft>,
    pub exact_values: Vec<ExactRowDraft>,
    pub no_data_color: Option<String>,
    pub edge_color: Option<String>,
    pub edge_width: Option<f64>,
}

/// Validate every row and style field; nothing is built on the first error.
pub fn build_scheme(request: &SchemeRequest) -> Result<(ClassificationRuleSet, StyleConfig)> {
    let bins = build_bins(&request.bins).context("bins")?;
    let exact_values = build_exact_values(&request.exact_values).context("exact values")?;

    let mut style = StyleConfig::default();
    if let Some(text) = &request.no_data_color {
        style.no_data_color = HexColor::parse(text).context("no-data color")?;
    }
    if let Some(text) = &request.edge_color {
        style.edge_color = HexColor::parse(text).context("edge color")?;
    }
    if let Some(width) = request.edge_width {
        if !(width >= 0.0 && width.is_finite()) {
            bail!("edge width must be a non-negative number, got {width}");
        }
        style.set_edge_width(width);
    }

    let rules = ClassificationRuleSet {
        mode: request.mode,
        bins,
        exact_values,
    };
    if rules.active_len() == 0 {
        warn!(mode = rules.mode.as_str(), "scheme has no rules for its mode");
    }
    Ok((rules, style))
}

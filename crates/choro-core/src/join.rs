//! Left join of an attribute table's value column onto a region layer.
//!
//! Keys on both sides are compared as trimmed text. Each region takes the
//! value of the first attribute row with its key; regions without a match
//! and rows whose value is not numeric yield a missing value. A join
//! replaces every region's value, so re-running it is idempotent.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use choro_ingest::{AttributeTable, GeoTable, key_text};
use choro_model::JoinedValue;

use crate::error::JoinError;

/// Counts describing the outcome of a join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub regions: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Matched regions whose source cell was not a number.
    pub non_numeric: usize,
    /// Attribute rows skipped because an earlier row had the same key.
    pub duplicate_keys: usize,
}

/// Coerce a cell to a number. Blank, unparseable, and NaN cells are missing.
pub fn coerce_numeric(cell: &str) -> JoinedValue {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Join `val_csv` from `attrs` onto `geo`, matching `key_geo` to `key_csv`.
///
/// All columns are checked before anything is written. On success
/// `key_geo` becomes the layer's key column.
pub fn join(
    geo: &mut GeoTable,
    attrs: &AttributeTable,
    key_geo: &str,
    key_csv: &str,
    val_csv: &str,
) -> Result<JoinReport, JoinError> {
    if !geo.has_column(key_geo) {
        return Err(JoinError::ColumnNotFound {
            table: "geodata",
            column: key_geo.to_string(),
        });
    }
    let key_idx = column_index(attrs, key_csv)?;
    let val_idx = column_index(attrs, val_csv)?;

    let mut report = JoinReport {
        regions: geo.len(),
        ..JoinReport::default()
    };

    let mut lookup: HashMap<&str, JoinedValue> = HashMap::with_capacity(attrs.len());
    for row in attrs.rows() {
        let key = row[key_idx].trim();
        if key.is_empty() {
            continue;
        }
        if lookup.contains_key(key) {
            report.duplicate_keys += 1;
            continue;
        }
        lookup.insert(key, coerce_numeric(&row[val_idx]));
    }

    let values: Vec<JoinedValue> = geo
        .regions()
        .iter()
        .map(|region| {
            let hit = region
                .properties
                .get(key_geo)
                .and_then(key_text)
                .and_then(|key| lookup.get(key.as_str()).copied());
            match hit {
                Some(value) => {
                    report.matched += 1;
                    if value.is_none() {
                        report.non_numeric += 1;
                    }
                    value
                }
                None => {
                    report.unmatched += 1;
                    None
                }
            }
        })
        .collect();

    geo.set_key_column(key_geo);
    for (region, value) in geo.regions_mut().iter_mut().zip(values) {
        region.value = value;
    }

    if report.duplicate_keys > 0 {
        warn!(
            key_column = key_csv,
            duplicates = report.duplicate_keys,
            "duplicate join keys in attribute table; first row wins"
        );
    }
    info!(
        key_geo,
        key_csv,
        val_csv,
        regions = report.regions,
        matched = report.matched,
        unmatched = report.unmatched,
        non_numeric = report.non_numeric,
        "joined attribute values"
    );
    Ok(report)
}

fn column_index(attrs: &AttributeTable, name: &str) -> Result<usize, JoinError> {
    attrs
        .column_index(name)
        .ok_or_else(|| JoinError::ColumnNotFound {
            table: "CSV data",
            column: name.to_string(),
        })
}

//! The scheme document and its conversion to and from live state.
//!
//! Every key is optional on read. Missing style keys take the
//! [`StyleConfig`] defaults, a missing mode means bins, and missing rule
//! lists are empty. Rule entries themselves must be complete. Every key is
//! written on save.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use choro_model::{
    Bin, ClassificationMode, ClassificationRuleSet, ExactValue, HexColor, StyleConfig,
};

use crate::error::{FormatError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinEntry {
    pub lower: f64,
    pub upper: f64,
    pub color_hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactEntry {
    pub value: f64,
    pub color_hex: String,
}

/// The persisted unit, exactly as it appears on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemeDocument {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub bins: Option<Vec<BinEntry>>,
    #[serde(default)]
    pub exact_values: Option<Vec<ExactEntry>>,
    #[serde(default)]
    pub no_data_color: Option<String>,
    #[serde(default)]
    pub edge_color: Option<String>,
    #[serde(default)]
    pub edge_width: Option<f64>,
}

/// Capture the live rule set and style as a complete document.
pub fn serialize(rules: &ClassificationRuleSet, style: &StyleConfig) -> SchemeDocument {
    SchemeDocument {
        mode: Some(rules.mode.as_str().to_string()),
        bins: Some(
            rules
                .bins
                .iter()
                .map(|bin| BinEntry {
                    lower: bin.lower,
                    upper: bin.upper,
                    color_hex: bin.color_hex.to_string(),
                })
                .collect(),
        ),
        exact_values: Some(
            rules
                .exact_values
                .iter()
                .map(|ev| ExactEntry {
                    value: ev.value,
                    color_hex: ev.color_hex.to_string(),
                })
                .collect(),
        ),
        no_data_color: Some(style.no_data_color.to_string()),
        edge_color: Some(style.edge_color.to_string()),
        edge_width: Some(style.edge_width),
    }
}

/// Validate a document and turn it into a rule set and style.
pub fn deserialize(document: SchemeDocument) -> Result<(ClassificationRuleSet, StyleConfig)> {
    let mode = match document.mode.as_deref() {
        None => ClassificationMode::default(),
        Some(text) => {
            ClassificationMode::parse(text).ok_or_else(|| FormatError::UnknownMode {
                mode: text.to_string(),
            })?
        }
    };

    let bins = document
        .bins
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| -> Result<Bin> {
            Ok(Bin {
                lower: entry.lower,
                upper: entry.upper,
                color_hex: color(&format!("bins[{idx}].color_hex"), &entry.color_hex)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let exact_values = document
        .exact_values
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| -> Result<ExactValue> {
            Ok(ExactValue {
                value: entry.value,
                color_hex: color(&format!("exact_values[{idx}].color_hex"), &entry.color_hex)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let defaults = StyleConfig::default();
    let no_data_color = match document.no_data_color {
        Some(text) => color("no_data_color", &text)?,
        None => defaults.no_data_color,
    };
    let edge_color = match document.edge_color {
        Some(text) => color("edge_color", &text)?,
        None => defaults.edge_color,
    };
    let edge_width = document.edge_width.unwrap_or(defaults.edge_width);
    if edge_width < 0.0 {
        return Err(FormatError::NegativeEdgeWidth { value: edge_width });
    }

    Ok((
        ClassificationRuleSet {
            mode,
            bins,
            exact_values,
        },
        StyleConfig {
            no_data_color,
            edge_color,
            edge_width,
        },
    ))
}

fn color(field: &str, text: &str) -> Result<HexColor> {
    HexColor::parse(text).map_err(|_| FormatError::InvalidColor {
        field: field.to_string(),
        value: text.to_string(),
    })
}

/// Render a document as pretty JSON with four-space indentation.
pub fn to_json_string(rules: &ClassificationRuleSet, style: &StyleConfig) -> Result<String> {
    check_finite(rules, style)?;
    let document = serialize(rules, style);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|source| FormatError::Json { source })?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Parse and validate JSON text.
pub fn from_json_str(text: &str) -> Result<(ClassificationRuleSet, StyleConfig)> {
    let document: SchemeDocument =
        serde_json::from_str(text).map_err(|source| FormatError::Json { source })?;
    deserialize(document)
}

fn check_finite(rules: &ClassificationRuleSet, style: &StyleConfig) -> Result<()> {
    let non_finite = |field: String| FormatError::NonFiniteNumber { field };
    for (idx, bin) in rules.bins.iter().enumerate() {
        if !bin.lower.is_finite() {
            return Err(non_finite(format!("bins[{idx}].lower")));
        }
        if !bin.upper.is_finite() {
            return Err(non_finite(format!("bins[{idx}].upper")));
        }
    }
    for (idx, ev) in rules.exact_values.iter().enumerate() {
        if !ev.value.is_finite() {
            return Err(non_finite(format!("exact_values[{idx}].value")));
        }
    }
    if !style.edge_width.is_finite() {
        return Err(non_finite("edge_width".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let (rules, style) = from_json_str("{}").unwrap();
        assert_eq!(rules, ClassificationRuleSet::default());
        assert_eq!(style, StyleConfig::default());
    }

    #[test]
    fn missing_edge_width_defaults() {
        let (_, style) = from_json_str(r##"{"mode": "exact", "edge_color": "#000"}"##).unwrap();
        assert_eq!(style.edge_width, 0.4);
        assert_eq!(style.edge_color.as_str(), "#000");
    }

    #[test]
    fn incomplete_rule_entry_is_rejected() {
        let err = from_json_str(r##"{"bins": [{"lower": 0, "color_hex": "#fff"}]}"##).unwrap_err();
        assert!(matches!(err, FormatError::Json { .. }));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = from_json_str(r#"{"mode": "quantiles"}"#).unwrap_err();
        assert!(matches!(err, FormatError::UnknownMode { .. }));
    }

    #[test]
    fn bad_color_names_field() {
        let err = from_json_str(r##"{"exact_values": [{"value": 1, "color_hex": "#fff"}, {"value": 2, "color_hex": "blurple"}]}"##)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid color 'blurple' in exact_values[1].color_hex"
        );
    }

    #[test]
    fn negative_edge_width_is_rejected() {
        let err = from_json_str(r#"{"edge_width": -1}"#).unwrap_err();
        assert!(matches!(err, FormatError::NegativeEdgeWidth { .. }));
    }

    #[test]
    fn integers_are_accepted_for_numbers() {
        let (rules, _) = from_json_str(r##"{"bins": [{"lower": 0, "upper": 10, "color_hex": "#ff0000"}]}"##)
            .unwrap();
        assert_eq!(rules.bins[0].upper, 10.0);
    }

    #[test]
    fn non_finite_bounds_cannot_be_written() {
        let rules = ClassificationRuleSet::with_bins(vec![Bin::new(
            f64::NEG_INFINITY,
            0.0,
            HexColor::parse("#fff").unwrap(),
        )]);
        let err = to_json_string(&rules, &StyleConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "bins[0].lower is not a finite number");
    }
}

//! Scheme file saving and loading.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use choro_model::{ClassificationRuleSet, StyleConfig};

use crate::codec::{from_json_str, to_json_string};
use crate::error::{FormatError, Result};

/// Save a scheme to a JSON file.
///
/// Uses atomic write (temp file + rename) so an interrupted save never
/// leaves a truncated scheme behind.
pub fn save_scheme(path: &Path, rules: &ClassificationRuleSet, style: &StyleConfig) -> Result<()> {
    let mut json = to_json_string(rules, style)?;
    json.push('\n');

    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| FormatError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| FormatError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(json.as_bytes()).map_err(|e| FormatError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| FormatError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| FormatError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        mode = rules.mode.as_str(),
        bins = rules.bins.len(),
        exact_values = rules.exact_values.len(),
        "saved scheme"
    );
    Ok(())
}

/// Load and validate a scheme file.
pub fn load_scheme(path: &Path) -> Result<(ClassificationRuleSet, StyleConfig)> {
    let text = fs::read_to_string(path).map_err(|e| FormatError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    let parts = from_json_str(&text)?;
    tracing::info!(path = %path.display(), mode = parts.0.mode.as_str(), "loaded scheme");
    Ok(parts)
}

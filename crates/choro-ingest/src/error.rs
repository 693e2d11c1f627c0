//! Error types for region layer and attribute table loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading input files.
#[derive(Debug, Error)]
pub enum LoadError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Geometry Errors ===
    /// The document is not valid GeoJSON.
    #[error("failed to parse geodata {path}: {message}")]
    GeoJsonParse { path: PathBuf, message: String },

    /// The layer has no features.
    #[error("no geometries found in {path}")]
    NoGeometry { path: PathBuf },

    // === CSV Errors ===
    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has a header but no data rows.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },
}

impl LoadError {
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// The path of the input that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::FileNotFound { path }
            | Self::FileRead { path, .. }
            | Self::GeoJsonParse { path, .. }
            | Self::NoGeometry { path }
            | Self::CsvParse { path, .. }
            | Self::EmptyCsv { path } => path,
        }
    }

    /// A message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        let name = self
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        match self {
            Self::FileNotFound { .. } => format!("The file '{name}' could not be found."),
            Self::FileRead { .. } => format!("The file '{name}' could not be read."),
            Self::GeoJsonParse { message, .. } => {
                format!("Could not read the geodata file '{name}':\n{message}")
            }
            Self::NoGeometry { .. } => format!("No geometries were found in '{name}'."),
            Self::CsvParse { message, .. } => {
                format!("Could not read the CSV file '{name}':\n{message}")
            }
            Self::EmptyCsv { .. } => format!("The CSV file '{name}' is empty or has no data."),
        }
    }
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::NoGeometry {
            path: PathBuf::from("/data/regions.geojson"),
        };
        assert_eq!(err.to_string(), "no geometries found in /data/regions.geojson");
        assert_eq!(
            err.user_message(),
            "No geometries were found in 'regions.geojson'."
        );
    }

    #[test]
    fn test_not_found_is_classified() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = LoadError::from_io(std::path::Path::new("x.csv"), io);
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }
}

//! Error types for join and planning operations.

use thiserror::Error;

/// Errors from joining attribute values onto regions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("geodata is not loaded")]
    GeoNotLoaded,

    #[error("CSV data is not loaded")]
    AttributesNotLoaded,

    /// A named join or value column does not exist.
    #[error("column '{column}' not found in {table}")]
    ColumnNotFound { table: &'static str, column: String },
}

/// Errors raised before handing a map to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("geodata is not loaded; load and join the data first")]
    GeoNotLoaded,

    #[error("no bins defined; add at least one bin")]
    NoBins,

    #[error("no exact values defined; add at least one exact value")]
    NoExactValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_not_found_names_table() {
        let err = JoinError::ColumnNotFound {
            table: "CSV data",
            column: "value".to_string(),
        };
        assert_eq!(err.to_string(), "column 'value' not found in CSV data");
    }
}

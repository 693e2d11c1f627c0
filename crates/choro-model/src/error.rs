use thiserror::Error;

/// Errors raised while parsing user-entered numbers, colors, and rule rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("cannot convert '{text}' to a number")]
    InvalidNumber { text: String },

    #[error("'{text}' is not a valid color")]
    InvalidColor { text: String },

    /// A bin table row failed to parse. `row` is 1-based.
    #[error("invalid values in bin row {row}: {reason}")]
    BinRow { row: usize, reason: Box<ParseError> },

    /// An exact-value table row failed to parse. `row` is 1-based.
    #[error("invalid values in exact value row {row}: {reason}")]
    ExactRow { row: usize, reason: Box<ParseError> },
}

pub type Result<T> = std::result::Result<T, ParseError>;

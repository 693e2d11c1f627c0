//! Single-cell corrections typed into the value table.

use choro_model::{JoinedValue, ParseError, parse_number};

/// Parse an edited value cell. Blank text clears the value; anything else
/// must be a decimal number.
pub fn parse_edit(text: &str) -> Result<JoinedValue, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = parse_number(trimmed).map_err(|_| ParseError::InvalidNumber {
        text: text.to_string(),
    })?;
    Ok(Some(value).filter(|v| !v.is_nan()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_missing_not_zero() {
        assert_eq!(parse_edit(""), Ok(None));
        assert_eq!(parse_edit("   "), Ok(None));
    }

    #[test]
    fn numbers_parse() {
        assert_eq!(parse_edit(" 42 "), Ok(Some(42.0)));
        assert_eq!(parse_edit("-0.5"), Ok(Some(-0.5)));
        assert_eq!(parse_edit("1e-2"), Ok(Some(0.01)));
    }

    #[test]
    fn garbage_is_rejected_with_original_text() {
        assert_eq!(
            parse_edit("12 apples"),
            Err(ParseError::InvalidNumber {
                text: "12 apples".to_string()
            })
        );
    }

    #[test]
    fn nan_text_clears_the_value() {
        assert_eq!(parse_edit("nan"), Ok(None));
    }
}

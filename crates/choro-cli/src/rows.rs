//! Value parsers for rule rows, edits and delimiters given on the command
//! line.
//!
//! Rule rows stay text here. Numbers and colors are validated together
//! when the rule lists are built, so an error names the offending row.

use choro_model::{BinRowDraft, ExactRowDraft};

/// `LOWER,UPPER,COLOR` into a bin row.
pub fn parse_bin_row(text: &str) -> Result<BinRowDraft, String> {
    match split_fields(text).as_slice() {
        [lower, upper, color] => Ok(BinRowDraft::new(*lower, *upper, *color)),
        _ => Err(format!("expected LOWER,UPPER,COLOR but got '{text}'")),
    }
}

/// `VALUE,COLOR` into an exact-value row.
pub fn parse_exact_row(text: &str) -> Result<ExactRowDraft, String> {
    match split_fields(text).as_slice() {
        [value, color] => Ok(ExactRowDraft::new(*value, *color)),
        _ => Err(format!("expected VALUE,COLOR but got '{text}'")),
    }
}

/// `KEY=VALUE` into a value-table edit. An empty value clears the region.
pub fn parse_edit_arg(text: &str) -> Result<(String, String), String> {
    let Some((key, value)) = text.split_once('=') else {
        return Err(format!("expected KEY=VALUE but got '{text}'"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("edit '{text}' has an empty region key"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// A single-byte field delimiter. `tab` and `\t` name the tab character.
pub fn parse_delimiter(text: &str) -> Result<u8, String> {
    match text {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match text.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("delimiter must be a single ASCII character, got '{text}'")),
        },
    }
}

fn split_fields(text: &str) -> Vec<&str> {
    text.split(',').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_row_fields_are_trimmed() {
        let row = parse_bin_row(" 0 , 10.5 ,#ff0000").unwrap();
        assert_eq!(row, BinRowDraft::new("0", "10.5", "#ff0000"));
    }

    #[test]
    fn bin_row_needs_three_fields() {
        assert!(parse_bin_row("0,10").is_err());
        assert!(parse_bin_row("0,10,#fff,extra").is_err());
    }

    #[test]
    fn exact_row_needs_two_fields() {
        assert_eq!(parse_exact_row("3,red").unwrap(), ExactRowDraft::new("3", "red"));
        assert!(parse_exact_row("3").is_err());
    }

    #[test]
    fn edit_splits_on_first_equals() {
        assert_eq!(
            parse_edit_arg("A=b=c").unwrap(),
            ("A".to_string(), "b=c".to_string())
        );
        assert_eq!(parse_edit_arg(" A = ").unwrap(), ("A".to_string(), String::new()));
        assert!(parse_edit_arg("=5").is_err());
        assert!(parse_edit_arg("A5").is_err());
    }

    #[test]
    fn delimiters() {
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("ж").is_err());
    }
}

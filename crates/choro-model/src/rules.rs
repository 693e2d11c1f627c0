//! Value-to-color classification rules.
//!
//! Rules are evaluated first-match in list order. Overlapping bins or
//! duplicate exact values are never reordered or merged: the earlier row
//! wins. The last bin in the list is closed on both ends; every other bin
//! is half-open (`lower <= x < upper`). Which bin is "last" is decided by
//! list position, not by the numerically largest upper bound.

use serde::{Deserialize, Serialize};

use crate::color::HexColor;

/// Numeric value joined onto a region. `None` means missing.
pub type JoinedValue = Option<f64>;

/// Which rule list is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMode {
    #[default]
    Bins,
    Exact,
}

impl ClassificationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bins => "bins",
            Self::Exact => "exact",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "bins" => Some(Self::Bins),
            "exact" => Some(Self::Exact),
            _ => None,
        }
    }
}

/// A numeric interval mapped to a color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub color_hex: HexColor,
}

impl Bin {
    pub fn new(lower: f64, upper: f64, color_hex: HexColor) -> Self {
        Self {
            lower,
            upper,
            color_hex,
        }
    }

    /// Membership test. `is_last` closes the upper bound.
    pub fn contains(&self, x: f64, is_last: bool) -> bool {
        if x.is_nan() {
            return false;
        }
        if is_last {
            self.lower <= x && x <= self.upper
        } else {
            self.lower <= x && x < self.upper
        }
    }
}

/// A single value mapped to a color.
///
/// Matching uses plain `==` on `f64` with no tolerance, so `5.0001` does
/// not match `5`. Values that went through arithmetic before reaching the
/// classifier may miss their rule for this reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactValue {
    pub value: f64,
    pub color_hex: HexColor,
}

impl ExactValue {
    pub fn new(value: f64, color_hex: HexColor) -> Self {
        Self { value, color_hex }
    }

    pub fn matches(&self, x: f64) -> bool {
        x == self.value
    }
}

/// Both rule lists plus the flag choosing the active one.
///
/// Switching the mode never clears the inactive list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRuleSet {
    pub mode: ClassificationMode,
    pub bins: Vec<Bin>,
    pub exact_values: Vec<ExactValue>,
}

impl ClassificationRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bins(bins: Vec<Bin>) -> Self {
        Self {
            mode: ClassificationMode::Bins,
            bins,
            exact_values: Vec::new(),
        }
    }

    pub fn with_exact_values(exact_values: Vec<ExactValue>) -> Self {
        Self {
            mode: ClassificationMode::Exact,
            bins: Vec::new(),
            exact_values,
        }
    }

    pub fn set_mode(&mut self, mode: ClassificationMode) {
        self.mode = mode;
    }

    pub fn replace_bins(&mut self, bins: Vec<Bin>) {
        self.bins = bins;
    }

    pub fn replace_exact_values(&mut self, exact_values: Vec<ExactValue>) {
        self.exact_values = exact_values;
    }

    /// Number of rules in the active list.
    pub fn active_len(&self) -> usize {
        match self.mode {
            ClassificationMode::Bins => self.bins.len(),
            ClassificationMode::Exact => self.exact_values.len(),
        }
    }

    /// Color of the first rule matching `value`, or `None` when the value
    /// is missing, NaN, or matches nothing.
    pub fn match_rule(&self, value: JoinedValue) -> Option<&HexColor> {
        let x = value.filter(|x| !x.is_nan())?;
        match self.mode {
            ClassificationMode::Bins => {
                let last = self.bins.len().saturating_sub(1);
                self.bins
                    .iter()
                    .enumerate()
                    .find(|(idx, bin)| bin.contains(x, *idx == last))
                    .map(|(_, bin)| &bin.color_hex)
            }
            ClassificationMode::Exact => self
                .exact_values
                .iter()
                .find(|ev| ev.matches(x))
                .map(|ev| &ev.color_hex),
        }
    }

    /// Color for `value`, falling back to `no_data` when no rule applies.
    pub fn classify<'a>(&'a self, value: JoinedValue, no_data: &'a HexColor) -> &'a HexColor {
        self.match_rule(value).unwrap_or(no_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(text: &str) -> HexColor {
        HexColor::parse(text).unwrap()
    }

    fn two_bins() -> ClassificationRuleSet {
        ClassificationRuleSet::with_bins(vec![
            Bin::new(0.0, 10.0, color("#ff0000")),
            Bin::new(10.0, 20.0, color("#00ff00")),
        ])
    }

    #[test]
    fn boundary_goes_to_next_bin() {
        let rules = two_bins();
        let no_data = HexColor::no_data_default();
        assert_eq!(rules.classify(Some(10.0), &no_data).as_str(), "#00ff00");
    }

    #[test]
    fn last_bin_is_closed() {
        let rules = two_bins();
        let no_data = HexColor::no_data_default();
        assert_eq!(rules.classify(Some(20.0), &no_data).as_str(), "#00ff00");
        assert_eq!(rules.classify(Some(20.5), &no_data), &no_data);
    }

    #[test]
    fn single_bin_is_closed() {
        let rules = ClassificationRuleSet::with_bins(vec![Bin::new(0.0, 1.0, color("#000"))]);
        assert_eq!(rules.match_rule(Some(1.0)).map(HexColor::as_str), Some("#000"));
    }

    #[test]
    fn last_is_by_position_not_magnitude() {
        let rules = ClassificationRuleSet::with_bins(vec![
            Bin::new(10.0, 20.0, color("#00ff00")),
            Bin::new(0.0, 10.0, color("#ff0000")),
        ]);
        // 20 sits on the open upper edge of the first bin.
        assert_eq!(rules.match_rule(Some(20.0)), None);
        // 10 matches the first row before the closed last row.
        assert_eq!(rules.match_rule(Some(10.0)).map(HexColor::as_str), Some("#00ff00"));
    }

    #[test]
    fn missing_and_nan_are_no_data() {
        let rules = two_bins();
        let no_data = HexColor::no_data_default();
        assert_eq!(rules.classify(None, &no_data), &no_data);
        assert_eq!(rules.classify(Some(f64::NAN), &no_data), &no_data);
    }

    #[test]
    fn empty_rule_set_matches_nothing() {
        let rules = ClassificationRuleSet::new();
        assert_eq!(rules.match_rule(Some(1.0)), None);
    }

    #[test]
    fn exact_requires_bitwise_equal_value() {
        let rules = ClassificationRuleSet::with_exact_values(vec![
            ExactValue::new(5.0, color("#111111")),
            ExactValue::new(7.0, color("#222222")),
        ]);
        let no_data = HexColor::no_data_default();
        assert_eq!(rules.classify(Some(5.0), &no_data).as_str(), "#111111");
        assert_eq!(rules.classify(Some(5.0001), &no_data), &no_data);
    }

    #[test]
    fn mode_switch_keeps_inactive_list() {
        let mut rules = two_bins();
        rules.replace_exact_values(vec![ExactValue::new(1.0, color("#123456"))]);
        rules.set_mode(ClassificationMode::Exact);
        rules.set_mode(ClassificationMode::Bins);
        assert_eq!(rules.bins.len(), 2);
        assert_eq!(rules.exact_values.len(), 1);
        assert_eq!(rules.match_rule(Some(5.0)).map(HexColor::as_str), Some("#ff0000"));
    }
}

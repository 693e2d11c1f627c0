use std::fs;

use choro_model::{Bin, ClassificationMode, ClassificationRuleSet, ExactValue, HexColor, StyleConfig};
use choro_scheme::{
    deserialize, from_json_str, load_scheme, save_scheme, serialize, to_json_string,
};
use proptest::prelude::*;
use tempfile::tempdir;

fn color(text: &str) -> HexColor {
    HexColor::parse(text).expect("color")
}

fn sample() -> (ClassificationRuleSet, StyleConfig) {
    let rules = ClassificationRuleSet {
        mode: ClassificationMode::Bins,
        bins: vec![
            Bin::new(0.0, 10.0, color("#ff0000")),
            Bin::new(10.0, 20.0, color("#00ff00")),
        ],
        exact_values: vec![ExactValue::new(5.0, color("#111111"))],
    };
    (rules, StyleConfig::default())
}

#[test]
fn document_round_trip_keeps_both_lists() {
    let (rules, style) = sample();
    let (back_rules, back_style) = deserialize(serialize(&rules, &style)).expect("deserialize");
    assert_eq!(back_rules, rules);
    assert_eq!(back_style, style);
}

#[test]
fn file_round_trip_in_exact_mode() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("scheme.json");
    let (mut rules, mut style) = sample();
    rules.set_mode(ClassificationMode::Exact);
    style.no_data_color = color("grey");
    style.set_edge_width(1.25);

    save_scheme(&path, &rules, &style).expect("save");
    let (back_rules, back_style) = load_scheme(&path).expect("load");
    assert_eq!(back_rules, rules);
    assert_eq!(back_style, style);
}

#[test]
fn saved_document_shape() {
    let (rules, style) = sample();
    let json = to_json_string(&rules, &style).expect("json");
    insta::assert_snapshot!(json, @r##"
    {
        "mode": "bins",
        "bins": [
            {
                "lower": 0.0,
                "upper": 10.0,
                "color_hex": "#ff0000"
            },
            {
                "lower": 10.0,
                "upper": 20.0,
                "color_hex": "#00ff00"
            }
        ],
        "exact_values": [
            {
                "value": 5.0,
                "color_hex": "#111111"
            }
        ],
        "no_data_color": "#D3D3D3",
        "edge_color": "#444444",
        "edge_width": 0.4
    }
    "##);
}

#[test]
fn hand_written_file_with_missing_keys() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("partial.json");
    fs::write(
        &path,
        r##"{"bins": [{"lower": 0, "upper": 1, "color_hex": "#ABCDEF"}], "comment": "ignored"}"##,
    )
    .expect("write");

    let (rules, style) = load_scheme(&path).expect("load");
    assert_eq!(rules.mode, ClassificationMode::Bins);
    assert_eq!(rules.bins[0].color_hex.as_str(), "#ABCDEF");
    assert!(rules.exact_values.is_empty());
    assert_eq!(style, StyleConfig::default());
}

#[test]
fn exact_value_survives_save_and_load_bit_for_bit() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("exact.json");
    let value = 0.025_000_500_000_000_002_f64;
    let rules = ClassificationRuleSet::with_exact_values(vec![ExactValue::new(
        value,
        color("#222222"),
    )]);
    let style = StyleConfig::default();

    save_scheme(&path, &rules, &style).expect("save");
    let (back_rules, back_style) = load_scheme(&path).expect("load");

    assert_eq!(back_rules.exact_values[0].value.to_bits(), value.to_bits());
    assert_eq!(
        back_rules.classify(Some(value), &back_style.no_data_color).as_str(),
        "#222222"
    );
}

fn finite() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>().prop_filter("finite", |v| v.is_finite()),
        (-10_000_000i64..10_000_000, 0i32..9).prop_map(|(m, e)| m as f64 / 10f64.powi(e)),
    ]
}

fn any_color() -> impl Strategy<Value = HexColor> {
    prop_oneof![
        (0u32..0x0100_0000).prop_map(|c| format!("#{c:06x}")),
        (0u32..0x1000).prop_map(|c| format!("#{c:03X}")),
        prop::sample::select(vec!["red", "Navy", "grey", "transparent"]).prop_map(String::from),
    ]
    .prop_map(|text| HexColor::parse(&text).expect("generated color"))
}

fn any_scheme() -> impl Strategy<Value = (ClassificationRuleSet, StyleConfig)> {
    (
        prop_oneof![Just(ClassificationMode::Bins), Just(ClassificationMode::Exact)],
        prop::collection::vec((finite(), finite(), any_color()), 0..6),
        prop::collection::vec((finite(), any_color()), 0..6),
        any_color(),
        any_color(),
        prop_oneof![0.0f64..100.0, finite().prop_map(f64::abs)],
    )
        .prop_map(|(mode, bins, exact, no_data, edge, width)| {
            let rules = ClassificationRuleSet {
                mode,
                bins: bins
                    .into_iter()
                    .map(|(lower, upper, c)| Bin::new(lower, upper, c))
                    .collect(),
                exact_values: exact
                    .into_iter()
                    .map(|(value, c)| ExactValue::new(value, c))
                    .collect(),
            };
            let style = StyleConfig {
                no_data_color: no_data,
                edge_color: edge,
                edge_width: width,
            };
            (rules, style)
        })
}

proptest! {
    #[test]
    fn json_round_trip_is_exact((rules, style) in any_scheme()) {
        let text = to_json_string(&rules, &style).expect("json");
        let (back_rules, back_style) = from_json_str(&text).expect("parse");

        let bits = |r: &ClassificationRuleSet| -> Vec<u64> {
            r.bins
                .iter()
                .flat_map(|b| [b.lower.to_bits(), b.upper.to_bits()])
                .chain(r.exact_values.iter().map(|e| e.value.to_bits()))
                .collect()
        };
        prop_assert_eq!(bits(&back_rules), bits(&rules));
        prop_assert_eq!(back_style.edge_width.to_bits(), style.edge_width.to_bits());
        prop_assert_eq!(back_rules, rules);
        prop_assert_eq!(back_style, style);
    }
}

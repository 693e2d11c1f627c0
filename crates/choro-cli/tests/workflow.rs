//! End-to-end runs of the map and scheme workflows against temp files.

use std::fs;
use std::path::{Path, PathBuf};

use choro_cli::workflow::{JoinColumns, MapRequest, SchemeRequest, build_scheme, prepare_map};
use choro_ingest::{CsvOptions, GeoLoadOptions};
use choro_model::{BinRowDraft, ClassificationMode, ExactRowDraft, HexColor};
use choro_scheme::{load_scheme, save_scheme};
use tempfile::TempDir;

const LAYER: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"code": "A"}, "geometry": {"type": "Point", "coordinates": [10.0, 70.0]}},
    {"type": "Feature", "properties": {"code": "B"}, "geometry": {"type": "Point", "coordinates": [20.0, 65.0]}},
    {"type": "Feature", "properties": {"code": "C"}, "geometry": {"type": "Point", "coordinates": [30.0, 60.0]}}
  ]
}"#;

const VALUES: &str = "region;Value\nA;5\nB;15\nC;\n";

struct Fixture {
    _dir: TempDir,
    geo: PathBuf,
    csv: PathBuf,
    scheme: PathBuf,
}

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write fixture");
    path
}

fn fixture() -> Fixture {
    let dir = TempDir::new().expect("tempdir");
    let geo = write(dir.path(), "regions.geojson", LAYER);
    let csv = write(dir.path(), "values.csv", VALUES);
    let scheme = dir.path().join("scheme.json");
    let (rules, style) = build_scheme(&SchemeRequest {
        mode: ClassificationMode::Bins,
        bins: vec![
            BinRowDraft::new("0", "10", "#00ff00"),
            BinRowDraft::new("10", "20", "#ff0000"),
        ],
        ..SchemeRequest::default()
    })
    .expect("build scheme");
    save_scheme(&scheme, &rules, &style).expect("save scheme");
    Fixture {
        _dir: dir,
        geo,
        csv,
        scheme,
    }
}

fn request(fixture: &Fixture) -> MapRequest {
    MapRequest {
        geo: fixture.geo.clone(),
        csv: fixture.csv.clone(),
        scheme: fixture.scheme.clone(),
        key_geo: None,
        key_csv: None,
        value: None,
        edits: Vec::new(),
        geo_options: GeoLoadOptions { reproject: false },
        csv_options: CsvOptions { delimiter: b';' },
    }
}

fn fills(prepared: &choro_cli::workflow::PreparedMap) -> Vec<&str> {
    prepared.plan.regions.iter().map(|r| r.fill.as_str()).collect()
}

#[test]
fn infers_columns_and_classifies() {
    let fixture = fixture();
    let prepared = prepare_map(&request(&fixture)).expect("prepare");

    assert_eq!(
        prepared.columns,
        JoinColumns {
            key_geo: "code".to_string(),
            key_csv: "region".to_string(),
            value: "Value".to_string(),
        }
    );
    assert_eq!(prepared.report.matched, 3);
    assert_eq!(prepared.report.non_numeric, 1);
    assert_eq!(fills(&prepared), vec!["#00ff00", "#ff0000", "#D3D3D3"]);
    assert_eq!(prepared.plan.missing_count(), 1);
}

#[test]
fn edits_apply_after_the_join() {
    let fixture = fixture();
    let mut request = request(&fixture);
    request.edits = vec![
        ("C".to_string(), "12".to_string()),
        ("A".to_string(), String::new()),
        ("Z".to_string(), "1".to_string()),
    ];
    let prepared = prepare_map(&request).expect("prepare");

    assert_eq!(fills(&prepared), vec!["#D3D3D3", "#ff0000", "#ff0000"]);
    assert_eq!(prepared.plan.regions[0].value, None);
    assert_eq!(prepared.plan.regions[2].value, Some(12.0));
}

#[test]
fn bad_edit_fails_the_run() {
    let fixture = fixture();
    let mut request = request(&fixture);
    request.edits = vec![("A".to_string(), "lots".to_string())];

    let err = prepare_map(&request).unwrap_err();
    assert!(format!("{err:#}").contains("cannot convert 'lots' to a number"));
}

#[test]
fn unknown_column_is_reported() {
    let fixture = fixture();
    let mut request = request(&fixture);
    request.value = Some("missing".to_string());

    let err = prepare_map(&request).unwrap_err();
    assert!(format!("{err:#}").contains("missing"));
}

#[test]
fn missing_scheme_file_is_reported() {
    let fixture = fixture();
    let mut request = request(&fixture);
    request.scheme = fixture.geo.with_file_name("absent.json");

    let err = prepare_map(&request).unwrap_err();
    assert!(format!("{err}").starts_with("load scheme"));
}

#[test]
fn built_scheme_round_trips_through_disk() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("exact.json");
    let request = SchemeRequest {
        mode: ClassificationMode::Exact,
        exact_values: vec![ExactRowDraft::new("1", "red"), ExactRowDraft::new("2", "#00f")],
        no_data_color: Some("white".to_string()),
        edge_width: Some(1.5),
        ..SchemeRequest::default()
    };
    let (rules, style) = build_scheme(&request).expect("build");
    save_scheme(&path, &rules, &style).expect("save");

    let (loaded_rules, loaded_style) = load_scheme(&path).expect("load");
    assert_eq!(loaded_rules, rules);
    assert_eq!(loaded_style.no_data_color, HexColor::parse("white").expect("color"));
    assert_eq!(loaded_style.edge_width, 1.5);
}

#[test]
fn scheme_rows_are_validated() {
    let request = SchemeRequest {
        bins: vec![
            BinRowDraft::new("0", "1", "#fff"),
            BinRowDraft::new("1", "x", "#fff"),
        ],
        ..SchemeRequest::default()
    };
    let err = build_scheme(&request).unwrap_err();
    assert!(format!("{err:#}").contains("bin row 2"));

    let request = SchemeRequest {
        edge_width: Some(-1.0),
        ..SchemeRequest::default()
    };
    assert!(build_scheme(&request).is_err());

    let request = SchemeRequest {
        edge_color: Some("not-a-color".to_string()),
        ..SchemeRequest::default()
    };
    assert!(build_scheme(&request).is_err());
}

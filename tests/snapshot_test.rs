use gpx_viewer_wasm::options::ViewerOptions;
use gpx_viewer_wasm::viewer::load_file;
use serde_json::{Map, Value};
use std::path::Path;

fn load_fixture_bytes(path: &str) -> Vec<u8> {
    std::fs::read(format!("tests/fixtures/{path}")).unwrap()
}

/// The display-facing part of a view: what the page shows as text.
/// Raw statistics and map geometry are covered by the integration tests.
fn render(fixture: &str) -> Value {
    let bytes = load_fixture_bytes(fixture);
    let view = load_file(fixture, &bytes, &ViewerOptions::default()).unwrap();
    let full = serde_json::to_value(&view).unwrap();

    let mut shown = Map::new();
    for key in ["fileName", "trackNames", "metrics", "preview"] {
        shown.insert(key.to_string(), full[key].clone());
    }
    Value::Object(shown)
}

/// Compare actual output against the expected snapshot file.
/// When `UPDATE_SNAPSHOTS=1` is set, write/overwrite the expected file instead.
fn assert_snapshot(actual: &Value, expected_path: &str) {
    let path = format!("tests/fixtures/expected/{expected_path}");

    if matches!(std::env::var("UPDATE_SNAPSHOTS").as_deref(), Ok("1")) {
        let dir = Path::new(&path).parent().unwrap();
        std::fs::create_dir_all(dir).unwrap();
        let pretty = serde_json::to_string_pretty(actual).unwrap();
        std::fs::write(&path, pretty.as_bytes()).unwrap();
        eprintln!("Updated snapshot: {path}");
        return;
    }

    let expected_str = std::fs::read_to_string(&path).unwrap_or_else(|_| {
        panic!("Expected file not found: {path}. Run with UPDATE_SNAPSHOTS=1 to generate.")
    });
    let expected: Value = serde_json::from_str(&expected_str)
        .unwrap_or_else(|e| panic!("Failed to parse {path}: {e}"));

    assert_eq!(
        *actual, expected,
        "Snapshot mismatch for {path}.\nRun with UPDATE_SNAPSHOTS=1 to update."
    );
}

#[test]
fn snapshot_simple_track() {
    assert_snapshot(&render("simple_track.gpx"), "simple_track.json");
}

#[test]
fn snapshot_multi_track() {
    assert_snapshot(&render("multi_track.gpx"), "multi_track.json");
}

#[test]
fn snapshot_garmin_extensions() {
    assert_snapshot(&render("garmin_extensions.gpx"), "garmin_extensions.json");
}

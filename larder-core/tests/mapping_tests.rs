//! Golden file tests for provider hit normalization.
//!
//! Each file in `fixtures/mapping/` holds one raw provider item and the
//! `UnifiedRecipe` it must map to:
//!
//! ```json
//! { "source": "rakuten", "raw": { ... }, "expected": { "id": "rakuten-42", ... } }
//! ```

use std::fs;
use std::path::Path;

use larder_core::mapper::map_raw_item;
use larder_core::providers::RawItem;
use larder_core::{Source, UnifiedRecipe};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TestCase {
    source: Source,
    raw: serde_json::Value,
    expected: UnifiedRecipe,
}

fn raw_item(source: Source, raw: serde_json::Value) -> RawItem {
    match source {
        Source::TheMealDb => RawItem::TheMealDb(serde_json::from_value(raw).unwrap()),
        Source::Spoonacular => RawItem::Spoonacular(serde_json::from_value(raw).unwrap()),
        Source::Edamam => RawItem::Edamam(serde_json::from_value(raw).unwrap()),
        Source::Rakuten => RawItem::Rakuten(serde_json::from_value(raw).unwrap()),
    }
}

fn load_test_cases() -> Vec<(String, TestCase)> {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mapping");

    let mut cases = Vec::new();
    for entry in fs::read_dir(&fixtures_dir).expect("Failed to read fixtures directory") {
        let path = entry.expect("Failed to read directory entry").path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
            let case: TestCase = serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
            cases.push((name, case));
        }
    }
    cases.sort_by(|a, b| a.0.cmp(&b.0));

    assert!(!cases.is_empty(), "No test fixtures found in {:?}", fixtures_dir);
    cases
}

#[test]
fn golden_mappings() {
    let mut failures = Vec::new();

    for (name, case) in load_test_cases() {
        let actual = map_raw_item(raw_item(case.source, case.raw));
        if actual != case.expected {
            failures.push(format!(
                "{name}:\n  expected: {:?}\n  actual:   {:?}",
                case.expected, actual
            ));
        }
    }

    assert!(
        failures.is_empty(),
        "{} mapping(s) differ:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

#[test]
fn every_mapping_has_id_and_title() {
    for (name, case) in load_test_cases() {
        let recipe = map_raw_item(raw_item(case.source, case.raw));
        assert!(!recipe.id.is_empty(), "{name}: empty id");
        assert!(!recipe.title.is_empty(), "{name}: empty title");
        assert!(
            recipe.id.starts_with(&format!("{}-", case.source)),
            "{name}: id {} lacks source prefix",
            recipe.id
        );
    }
}

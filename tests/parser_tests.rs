use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use uidiff_rs::{
    load_config, load_snapshot, parse_snapshot_json, parse_snapshot_yaml, Classification,
    ParseError, RuleCondition,
};

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_parse_bare_element_list() {
    let json = r#"[
        {"selector": "button#go", "tagName": "button", "text": "Go",
         "attributes": {"id": "go", "class": "btn primary"},
         "styles": {"color": "rgb(0, 0, 0)"},
         "position": {"x": 1, "y": 2, "width": 30, "height": 10},
         "fingerprint": "fp-1"}
    ]"#;
    let elements = parse_snapshot_json(json).unwrap();
    assert_eq!(elements.len(), 1);
    let el = &elements[0];
    assert_eq!(el.tag, "button");
    assert_eq!(el.first_class(), Some("btn"));
    assert_eq!(el.identity_key(), "button#go::id=go");
    assert_eq!(el.fingerprint.as_deref(), Some("fp-1"));
    assert_eq!(el.position.unwrap().width, Some(30.0));
}

#[test]
fn test_parse_page_document() {
    let json = r#"{"url": "https://example.test", "elements": [{"selector": "p"}]}"#;
    let elements = parse_snapshot_json(json).unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, None);
    assert!(elements[0].attributes.is_empty());
}

#[test]
fn test_parse_yaml_snapshot() {
    let yaml = r#"
- selector: h1#title
  tag: h1
  text: Welcome
- selector: p#lede
  tag: p
"#;
    let elements = parse_snapshot_yaml(yaml).unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[1].selector, "p#lede");
}

#[test]
fn test_load_snapshot_by_extension() {
    let json = temp_file(".json", r#"[{"selector": "p#one", "text": "One"}]"#);
    assert_eq!(load_snapshot(json.path()).unwrap().len(), 1);

    let yaml = temp_file(".yml", "elements:\n  - selector: p#one\n  - selector: p#two\n");
    assert_eq!(load_snapshot(yaml.path()).unwrap().len(), 2);
}

#[test]
fn test_load_snapshot_without_extension() {
    let file = temp_file("", "- selector: p#one\n");
    assert_eq!(load_snapshot(file.path()).unwrap().len(), 1);

    let garbage = temp_file("", "::: not a snapshot :::");
    assert!(matches!(
        load_snapshot(garbage.path()),
        Err(ParseError::UnknownFormat { .. })
    ));
}

#[test]
fn test_load_snapshot_invalid_json() {
    let file = temp_file(".json", "{invalid json}");
    assert!(matches!(
        load_snapshot(file.path()),
        Err(ParseError::JsonError { .. })
    ));
}

#[test]
fn test_load_snapshot_not_found() {
    let result = load_snapshot(Path::new("/nonexistent/baseline.json"));
    assert!(matches!(result, Err(ParseError::FileNotFound { .. })));
}

#[test]
fn test_load_toml_config() {
    let file = temp_file(
        ".toml",
        r#"
capture = ["text", "styles"]
max_changes = 50

[text]
similarity_threshold = 0.9

[styles]
ignore = ["transition"]
categories = { visibility = ["cursor"] }

[classification]
advanced = true
interactive_keywords = ["button"]

[[classification.custom_rules]]
property_contains = "href"
change_type = "attribute"
classification = "critical"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert!(config.captures("styles"));
    assert!(!config.captures("position"));
    assert_eq!(config.max_changes, Some(50));
    assert_eq!(config.text.similarity_threshold, 0.9);
    assert_eq!(config.styles.ignore, vec!["transition"]);
    assert_eq!(config.classification.interactive_keywords, vec!["button"]);
    // untouched fields keep their defaults
    assert_eq!(config.classification.text_critical, 0.5);
    assert!(config.structural_detection);

    let rule = &config.classification.custom_rules[0];
    assert_eq!(rule.classification, Classification::Critical);
    assert_eq!(
        rule.conditions[0],
        RuleCondition::PropertyContains("href".to_string())
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_yaml_and_json_config() {
    let yaml = temp_file(
        ".yaml",
        "structural_detection: false\nposition:\n  fallback_magnitude: 0.25\n",
    );
    let config = load_config(yaml.path()).unwrap();
    assert!(!config.structural_detection);
    assert_eq!(config.position.fallback_magnitude, 0.25);

    let json = temp_file(".json", r#"{"classification": {"low_confidence": 0.7}}"#);
    let config = load_config(json.path()).unwrap();
    assert_eq!(config.classification.low_confidence, 0.7);
}

#[test]
fn test_load_config_invalid_toml() {
    let file = temp_file(".toml", "capture = [unterminated");
    assert!(matches!(
        load_config(file.path()),
        Err(ParseError::TomlError { .. })
    ));
}

#[test]
fn test_out_of_range_config_parses_but_fails_validation() {
    let file = temp_file(".toml", "[classification]\ntext_critical = 1.5\n");
    let config = load_config(file.path()).unwrap();
    assert!(config.validate().is_err());
}

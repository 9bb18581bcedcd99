use uidiff_rs::{ConfigError, OutputError, OutputFormat, ParseError, SnapshotError, UidiffError};

#[test]
fn test_parse_error_display() {
    let err = ParseError::file_not_found("baseline.json");
    assert_eq!(err.to_string(), "File not found: baseline.json");
}

#[test]
fn test_unknown_format_error() {
    let err = ParseError::unknown_format("/captures/page.txt");
    assert!(err.to_string().contains("Could not detect file format"));
    assert!(err.to_string().contains("/captures/page.txt"));
}

#[test]
fn test_json_error_keeps_source() {
    let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
    let err = ParseError::json_error("current.json", source);
    assert!(err.to_string().starts_with("Invalid JSON in current.json"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_output_error_display() {
    let err = OutputError::UnknownFormat {
        format: "xml".to_string(),
    };
    assert_eq!(err.to_string(), "Unknown output format: xml");
}

#[test]
fn test_output_format_from_str() {
    assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    let err = "html".parse::<OutputFormat>().unwrap_err();
    assert!(matches!(err, OutputError::UnknownFormat { .. }));
}

#[test]
fn test_snapshot_error_display() {
    let err = SnapshotError::EmptySelector {
        tag: "div".to_string(),
    };
    assert_eq!(err.to_string(), "Element has an empty selector (tag: div)");
}

#[test]
fn test_uidiff_error_from_parse_error() {
    let parse_err = ParseError::file_not_found("baseline.json");
    let err: UidiffError = parse_err.into();
    assert!(matches!(err, UidiffError::Parse(_)));
    assert_eq!(err.to_string(), "File not found: baseline.json");
}

#[test]
fn test_config_error() {
    let err: UidiffError = ConfigError::InvalidRule {
        index: 2,
        message: "min_magnitude 3 is outside [0, 1]".to_string(),
    }
    .into();
    assert!(err.to_string().contains("Invalid configuration"));
    assert!(err.to_string().contains("custom rule #2"));
}

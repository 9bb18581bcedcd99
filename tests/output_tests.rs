use uidiff_rs::output::{format_report, OutputFormat, OutputOptions};
use uidiff_rs::{
    ChangeRecord, ChangeType, Classification, ComprehensiveAnalysisResult, RawChange, Report,
    StructuralAnalysis,
};

fn text_change() -> ChangeRecord {
    let raw = RawChange::new(
        "p#intro",
        "text",
        Some("Submit".to_string()),
        Some("Submit Now".to_string()),
        ChangeType::Text,
        0.4,
    );
    ChangeRecord::classified(raw, Classification::Cosmetic)
}

#[test]
fn test_format_plain_no_changes() {
    let report = Report::Matched { changes: vec![] };
    let output = format_report(&report, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
    assert_eq!(output, "No changes detected.");
}

#[test]
fn test_format_plain_with_changes() {
    let report = Report::Matched {
        changes: vec![
            text_change(),
            ChangeRecord::structural("p#gone", "element_removed", Some("<p>".to_string()), None),
        ],
    };
    let output = format_report(&report, &OutputFormat::Plain, &OutputOptions::default()).unwrap();

    assert!(output.contains("[COSMETIC] p#intro text: \"Submit\" → \"Submit Now\" (magnitude 0.40)"));
    assert!(output.contains("[CRITICAL] p#gone element_removed: \"<p>\" → (none) (magnitude 1.00)"));
    assert!(output.contains("Summary: 1 critical, 1 cosmetic"));
}

#[test]
fn test_format_truncates_long_values() {
    let raw = RawChange::new(
        "p#intro",
        "text",
        Some("x".repeat(200)),
        Some("y".repeat(200)),
        ChangeType::Text,
        1.0,
    );
    let report = Report::Identity {
        changes: vec![ChangeRecord::classified(raw, Classification::Critical)],
    };
    let options = OutputOptions {
        max_value_length: 10,
        ..Default::default()
    };
    let output = format_report(&report, &OutputFormat::Plain, &options).unwrap();
    assert!(output.contains(&format!("\"{}...\"", "x".repeat(10))));
    assert!(!output.contains(&"x".repeat(11)));
}

#[test]
fn test_format_terminal_contains_content() {
    let report = Report::Matched {
        changes: vec![text_change()],
    };
    let output =
        format_report(&report, &OutputFormat::Terminal, &OutputOptions::default()).unwrap();
    assert!(output.contains("p#intro"));
    assert!(output.contains("Summary: 1 cosmetic"));
}

#[test]
fn test_format_structural_report() {
    let mut change = text_change();
    change.context = Some("repeating ul > li (2 → 3 items)".to_string());
    let report = Report::Structural(ComprehensiveAnalysisResult {
        changes: vec![change],
        old_structural_analysis: StructuralAnalysis::default(),
        new_structural_analysis: StructuralAnalysis::default(),
        processing_time_ms: 2.0,
        elements_analyzed: 12,
        changes_per_second: 500.0,
    });

    let plain = format_report(&report, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
    assert!(plain.contains("[repeating ul > li (2 → 3 items)]"));
    assert!(plain.contains("Analyzed 12 elements in 2.0 ms (500 changes/s)"));

    let json = format_report(&report, &OutputFormat::Json, &OutputOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["report"]["mode"], "structural");
    assert_eq!(value["report"]["elementsAnalyzed"], 12);
    assert_eq!(value["report"]["processingTimeMs"], 2.0);
    assert_eq!(value["report"]["oldStructuralAnalysis"]["totalNodes"], 0);
}

#[test]
fn test_format_json_nulls_are_explicit() {
    let report = Report::Identity {
        changes: vec![ChangeRecord::structural(
            "p#new",
            "element_existence",
            None,
            Some("<p>".to_string()),
        )],
    };
    let json = format_report(&report, &OutputFormat::Json, &OutputOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let change = &value["report"]["changes"][0];

    assert!(change["oldValue"].is_null());
    assert!(change.as_object().unwrap().contains_key("oldValue"));
    assert!(change.as_object().unwrap().contains_key("matchConfidence"));
    assert_eq!(change["changeType"], "structural");
    assert_eq!(change["magnitude"], 1.0);
    assert_eq!(value["summary"]["critical"], 1);
}

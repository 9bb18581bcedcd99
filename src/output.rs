//! Output formatting for comparison reports.
//!
//! Reports can be rendered for a terminal (with colors), as plain text, or
//! as JSON.
//!
//! # Examples
//!
//! ```
//! use uidiff_rs::{format_report, OutputFormat, OutputOptions, Report};
//!
//! let report = Report::Matched { changes: vec![] };
//! let output = format_report(&report, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
//! assert_eq!(output, "No changes detected.");
//! ```

use crate::change::{ChangeRecord, Classification};
use crate::error::OutputError;
use crate::pipeline::Report;
use colored::*;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the report
    Json,
    /// Plain text, no colors (suitable for piping)
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            _ => Err(OutputError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Options for controlling output formatting.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Show old and new values next to each change
    pub show_values: bool,
    /// Maximum length for displayed values (truncate if longer)
    pub max_value_length: usize,
    /// Append the per-tier summary line
    pub show_summary: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            show_values: true,
            max_value_length: 80,
            show_summary: true,
        }
    }
}

/// Formats a report according to the specified format and options.
///
/// # Examples
///
/// ```
/// use uidiff_rs::{format_report, ChangeRecord, OutputFormat, OutputOptions, Report};
///
/// let removed = ChangeRecord::structural("nav.main", "element_removed", Some("<nav>".into()), None);
/// let report = Report::Identity { changes: vec![removed] };
///
/// let output = format_report(&report, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
/// assert!(output.contains("[CRITICAL] nav.main"));
/// assert!(output.contains("Summary: 1 critical"));
/// ```
pub fn format_report(
    report: &Report,
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_text(report, options, true)),
        OutputFormat::Json => format_json(report),
        OutputFormat::Plain => Ok(format_text(report, options, false)),
    }
}

fn format_text(report: &Report, options: &OutputOptions, colored: bool) -> String {
    let changes = report.changes();

    if changes.is_empty() {
        return if colored {
            "No changes detected.".dimmed().to_string()
        } else {
            "No changes detected.".to_string()
        };
    }

    let mut output = String::new();
    for change in changes {
        let line = format_change(change, options);
        if colored {
            output.push_str(&paint(&line, change.classification));
        } else {
            output.push_str(&line);
        }
        output.push('\n');
    }

    if options.show_summary {
        output.push('\n');
        output.push_str(&format_summary(report));
        if let Report::Structural(result) = report {
            output.push('\n');
            output.push_str(&format!(
                "Analyzed {} elements in {:.1} ms ({:.0} changes/s)",
                result.elements_analyzed, result.processing_time_ms, result.changes_per_second
            ));
        }
    }

    output
}

/// Formats a single change as one line without colors.
fn format_change(change: &ChangeRecord, options: &OutputOptions) -> String {
    let mut line = format!(
        "[{}] {} {}",
        change.classification.as_str().to_uppercase(),
        change.element,
        change.property
    );

    if options.show_values {
        line.push_str(&format!(
            ": {} → {}",
            format_value(change.old_value.as_deref(), options.max_value_length),
            format_value(change.new_value.as_deref(), options.max_value_length)
        ));
    }

    line.push_str(&format!(" (magnitude {:.2}", change.magnitude));
    if let Some(confidence) = change.match_confidence {
        line.push_str(&format!(", match {:.2}", confidence));
    }
    line.push(')');

    if let Some(context) = &change.context {
        line.push_str(&format!(" [{}]", context));
    }

    line
}

/// Color scheme: critical red, potential magenta, cosmetic yellow, noise dim.
fn paint(line: &str, classification: Classification) -> String {
    match classification {
        Classification::Critical => line.red().to_string(),
        Classification::Potential => line.magenta().to_string(),
        Classification::Cosmetic => line.yellow().to_string(),
        Classification::Noise => line.dimmed().to_string(),
    }
}

/// Quotes a value, truncating it with `...` past `max_length` characters.
fn format_value(value: Option<&str>, max_length: usize) -> String {
    match value {
        None => "(none)".to_string(),
        Some(v) if v.chars().count() > max_length => {
            let truncated: String = v.chars().take(max_length).collect();
            format!("\"{}...\"", truncated)
        }
        Some(v) => format!("\"{}\"", v),
    }
}

fn format_summary(report: &Report) -> String {
    if report.changes().is_empty() {
        return "Summary: No changes".to_string();
    }

    let parts: Vec<String> = Classification::ALL
        .iter()
        .map(|tier| (tier, report.count(*tier)))
        .filter(|(_, count)| *count > 0)
        .map(|(tier, count)| format!("{} {}", count, tier))
        .collect();

    format!("Summary: {}", parts.join(", "))
}

fn format_json(report: &Report) -> Result<String, OutputError> {
    use serde_json::json;

    let output = json!({
        "report": report,
        "summary": {
            "critical": report.count(Classification::Critical),
            "potential": report.count(Classification::Potential),
            "cosmetic": report.count(Classification::Cosmetic),
            "noise": report.count(Classification::Noise),
            "total": report.changes().len(),
        }
    });

    serde_json::to_string_pretty(&output)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

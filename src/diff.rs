//! Per-element diff engine.
//!
//! Compares one baseline element against its matched current counterpart and
//! produces one change record per differing facet: text, attributes, styles
//! and position. Each record is scored and then classified before it leaves
//! the engine.
//!
//! # Examples
//!
//! ```
//! use uidiff_rs::{Config, DiffEngine, ElementSnapshot, ChangeType};
//!
//! let config = Config::default();
//! let engine = DiffEngine::new(&config);
//!
//! let old = ElementSnapshot::new("h1.title", "h1").with_text("Submit");
//! let new = ElementSnapshot::new("h1.title", "h1").with_text("Submit Now");
//!
//! let changes = engine.diff_elements(&old, &new).unwrap();
//! assert_eq!(changes.len(), 1);
//! assert_eq!(changes[0].change_type, ChangeType::Text);
//! ```

use crate::change::{ChangeRecord, ChangeType, RawChange, StyleCategory};
use crate::classify::Classifier;
use crate::config::{Config, CAPTURE_ATTRIBUTES, CAPTURE_POSITION, CAPTURE_STYLES, CAPTURE_TEXT};
use crate::error::SnapshotError;
use crate::similarity::{numeric_magnitude, relative_change, text_similarity};
use crate::snapshot::ElementSnapshot;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const POSITION_AXES: [&str; 2] = ["x", "y"];

/// An attribute ignore pattern, compiled once per engine.
///
/// A pattern is tried as a whole-value regex and, independently, as a
/// literal substring once its `*` wildcards are removed.
#[derive(Debug)]
struct IgnorePattern {
    regex: Option<Regex>,
    literal: String,
}

impl IgnorePattern {
    fn compile(pattern: &str) -> Self {
        let regex = match Regex::new(&format!("^(?:{})$", pattern)) {
            Ok(regex) => Some(regex),
            Err(err) => {
                debug!(pattern, error = %err, "ignore pattern is not a valid regex, using literal match only");
                None
            }
        };
        Self {
            regex,
            literal: pattern.replace('*', ""),
        }
    }

    fn matches(&self, value: &str) -> bool {
        let regex_hit = self.regex.as_ref().is_some_and(|re| re.is_match(value));
        regex_hit || value.contains(&self.literal)
    }
}

pub struct DiffEngine<'a> {
    config: &'a Config,
    classifier: Classifier<'a>,
    ignore_patterns: Vec<IgnorePattern>,
}

impl<'a> DiffEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        let ignore_patterns = config
            .attributes
            .ignore_patterns
            .iter()
            .map(|p| IgnorePattern::compile(p))
            .collect();
        Self {
            config,
            classifier: Classifier::new(&config.classification),
            ignore_patterns,
        }
    }

    pub fn classifier(&self) -> &Classifier<'a> {
        &self.classifier
    }

    /// Diffs two elements believed to be the same logical element.
    ///
    /// Records are emitted in facet order (text, attributes, styles,
    /// position) and, within a facet, in key order.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] when either element is malformed.
    pub fn diff_elements(
        &self,
        baseline: &ElementSnapshot,
        current: &ElementSnapshot,
    ) -> Result<Vec<ChangeRecord>, SnapshotError> {
        baseline.validate()?;
        current.validate()?;

        let mut raw = Vec::new();
        if self.config.captures(CAPTURE_TEXT) {
            self.diff_text(baseline, current, &mut raw);
        }
        if self.config.captures(CAPTURE_ATTRIBUTES) {
            self.diff_attributes(baseline, current, &mut raw);
        }
        if self.config.captures(CAPTURE_STYLES) {
            self.diff_styles(baseline, current, &mut raw);
        }
        if self.config.captures(CAPTURE_POSITION) {
            self.diff_position(baseline, current, &mut raw);
        }

        debug!(
            selector = %baseline.selector,
            changes = raw.len(),
            "diffed element pair"
        );

        Ok(raw
            .into_iter()
            .map(|change| self.classifier.finalize(change))
            .collect())
    }

    fn diff_text(&self, baseline: &ElementSnapshot, current: &ElementSnapshot, out: &mut Vec<RawChange>) {
        let old = baseline.text_or_empty();
        let new = current.text_or_empty();
        if old == new {
            return;
        }

        let similarity = text_similarity(old, new);
        if similarity < self.config.text.similarity_threshold {
            out.push(RawChange::new(
                &baseline.selector,
                "text",
                baseline.text.clone(),
                current.text.clone(),
                ChangeType::Text,
                1.0 - similarity,
            ));
        }
    }

    fn diff_attributes(
        &self,
        baseline: &ElementSnapshot,
        current: &ElementSnapshot,
        out: &mut Vec<RawChange>,
    ) {
        for key in union_keys(&baseline.attributes, &current.attributes) {
            let old = baseline.attributes.get(key).map(String::as_str);
            let new = current.attributes.get(key).map(String::as_str);
            if old == new || self.attribute_ignored(old, new) {
                continue;
            }

            out.push(RawChange::new(
                &baseline.selector,
                format!("attr_{}", key),
                old.map(str::to_string),
                new.map(str::to_string),
                ChangeType::Attribute,
                presence_magnitude(old, new),
            ));
        }
    }

    fn attribute_ignored(&self, old: Option<&str>, new: Option<&str>) -> bool {
        self.ignore_patterns
            .iter()
            .any(|p| [old, new].into_iter().flatten().any(|v| p.matches(v)))
    }

    fn diff_styles(&self, baseline: &ElementSnapshot, current: &ElementSnapshot, out: &mut Vec<RawChange>) {
        let styles = &self.config.styles;

        for key in union_keys(&baseline.styles, &current.styles) {
            if styles.is_ignored(key) {
                continue;
            }
            let old = baseline.styles.get(key).map(String::as_str);
            let new = current.styles.get(key).map(String::as_str);
            if old == new {
                continue;
            }

            let category = styles.category_for(key);
            let (magnitude, minimum) = match category {
                StyleCategory::Color => (styles.color_importance, styles.color_min_change),
                StyleCategory::Dimension => {
                    (numeric_magnitude(old, new), styles.dimension_min_change)
                }
                _ => (presence_magnitude(old, new), 0.0),
            };
            if magnitude <= 0.0 || magnitude < minimum {
                continue;
            }

            out.push(RawChange::new(
                &baseline.selector,
                key.as_str(),
                old.map(str::to_string),
                new.map(str::to_string),
                ChangeType::Style(category),
                magnitude,
            ));
        }
    }

    fn diff_position(
        &self,
        baseline: &ElementSnapshot,
        current: &ElementSnapshot,
        out: &mut Vec<RawChange>,
    ) {
        let styles = &self.config.styles;
        if styles.is_ignored("position") {
            return;
        }

        for axis in POSITION_AXES {
            let property = format!("position_{}", axis);
            if styles.is_ignored(&property) {
                continue;
            }

            let old = baseline.position.and_then(|p| p.axis(axis));
            let new = current.position.and_then(|p| p.axis(axis));
            let magnitude = match (old, new) {
                (None, None) => continue,
                (Some(o), Some(n)) if o == n => continue,
                (Some(o), Some(n)) => relative_change(o, n),
                _ => self.config.position.fallback_magnitude,
            };
            if magnitude <= 0.0 {
                continue;
            }

            out.push(RawChange::new(
                &baseline.selector,
                property,
                old.map(|v| v.to_string()),
                new.map(|v| v.to_string()),
                ChangeType::Layout,
                magnitude,
            ));
        }
    }
}

/// Sorted union of the keys of two maps.
fn union_keys<'m>(
    a: &'m BTreeMap<String, String>,
    b: &'m BTreeMap<String, String>,
) -> BTreeSet<&'m String> {
    a.keys().chain(b.keys()).collect()
}

/// 0.5 for a value that changed, 1.0 for one that appeared or vanished.
fn presence_magnitude(old: Option<&str>, new: Option<&str>) -> f64 {
    if old.is_some() && new.is_some() {
        0.5
    } else {
        1.0
    }
}

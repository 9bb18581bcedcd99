//! Report filtering.
//!
//! Filters run after classification and only decide what is shown; they
//! never change a record.
//!
//! # Examples
//!
//! ```
//! use uidiff_rs::filter::FilterConfig;
//! use uidiff_rs::{ChangeRecord, Classification};
//!
//! let filter = FilterConfig::new()
//!     .min_classification(Classification::Cosmetic)
//!     .ignore_selector("#ad-slot");
//!
//! let removed = ChangeRecord::structural("nav", "element_removed", None, None);
//! assert!(filter.should_include(&removed));
//!
//! let ad = ChangeRecord::structural("div#ad-slot", "element_removed", None, None);
//! assert!(!filter.should_include(&ad));
//! ```

use crate::change::{ChangeRecord, Classification};
use crate::pipeline::Report;

#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Records below this tier are hidden
    pub min_classification: Option<Classification>,
    /// Records whose selector contains any of these are hidden
    pub ignore_selectors: Vec<String>,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_classification(mut self, tier: Classification) -> Self {
        self.min_classification = Some(tier);
        self
    }

    pub fn ignore_selector(mut self, selector: &str) -> Self {
        self.ignore_selectors.push(selector.to_string());
        self
    }

    pub fn has_filters(&self) -> bool {
        self.min_classification.is_some() || !self.ignore_selectors.is_empty()
    }

    pub fn should_include(&self, change: &ChangeRecord) -> bool {
        if let Some(min) = self.min_classification {
            if change.classification < min {
                return false;
            }
        }

        !self
            .ignore_selectors
            .iter()
            .any(|s| change.element.contains(s.as_str()))
    }
}

pub fn filter_changes(changes: &[ChangeRecord], config: &FilterConfig) -> Vec<ChangeRecord> {
    changes
        .iter()
        .filter(|change| config.should_include(change))
        .cloned()
        .collect()
}

/// Applies the filter to a report in place.
pub fn filter_report(report: &mut Report, config: &FilterConfig) {
    if !config.has_filters() {
        return;
    }
    report
        .changes_mut()
        .retain(|change| config.should_include(change));
}

//! Severity classification of change records.
//!
//! Classification is an ordered cascade: the first rule that applies decides
//! the tier and later rules are never consulted. The order is:
//!
//! 1. selector contains an interactive keyword → critical
//! 2. structural change, or `element_*` property → critical
//! 3. property contains an accessibility keyword → critical
//! 4. text changes, by magnitude → critical / cosmetic / noise
//! 5. layout changes → cosmetic / noise
//! 6. `color`, `background-color`, `font-family` → cosmetic / noise
//! 7. other style changes → critical / cosmetic / noise
//! 8. user rules, when advanced classification is enabled
//! 9. noise
//!
//! Because of this ordering a color change on a `button` is always critical:
//! rule 1 fires before any property-based rule is looked at.

use crate::change::{ChangeRecord, ChangeType, Classification, RawChange};
use crate::config::ClassificationConfig;

pub struct Classifier<'a> {
    config: &'a ClassificationConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a ClassificationConfig) -> Self {
        Self { config }
    }

    /// Attaches a tier to a freshly scored change.
    pub fn finalize(&self, raw: RawChange) -> ChangeRecord {
        let classification = self.classify_parts(
            &raw.element,
            &raw.property,
            &raw.change_type,
            raw.magnitude,
        );
        ChangeRecord::classified(raw, classification)
    }

    pub fn classify(&self, record: &ChangeRecord) -> Classification {
        self.classify_parts(
            &record.element,
            &record.property,
            &record.change_type,
            record.magnitude,
        )
    }

    /// Re-runs the cascade over every record in place.
    pub fn reclassify_all(&self, records: &mut [ChangeRecord]) {
        for record in records {
            record.classification = self.classify(record);
        }
    }

    pub fn classify_parts(
        &self,
        element: &str,
        property: &str,
        change_type: &ChangeType,
        magnitude: f64,
    ) -> Classification {
        let c = self.config;

        if contains_keyword(element, &c.interactive_keywords) {
            return Classification::Critical;
        }

        if *change_type == ChangeType::Structural || property.starts_with("element_") {
            return Classification::Critical;
        }

        if contains_keyword(property, &c.accessibility_keywords) {
            return Classification::Critical;
        }

        if property == "text" || *change_type == ChangeType::Text {
            return if magnitude >= c.text_critical {
                Classification::Critical
            } else if magnitude >= c.text_critical / 2.0 {
                Classification::Cosmetic
            } else {
                Classification::Noise
            };
        }

        if *change_type == ChangeType::Layout || property.starts_with("position_") {
            return tier_or_noise(magnitude >= c.position_base, Classification::Cosmetic);
        }

        if property == "color" || property == "background-color" || property.contains("font-family")
        {
            return tier_or_noise(magnitude >= c.color_cosmetic, Classification::Cosmetic);
        }

        if change_type.is_style() {
            return if magnitude >= c.style_critical {
                Classification::Critical
            } else if magnitude >= c.style_cosmetic {
                Classification::Cosmetic
            } else {
                Classification::Noise
            };
        }

        if c.advanced {
            if let Some(rule) = c
                .custom_rules
                .iter()
                .find(|rule| rule.matches(property, change_type, magnitude))
            {
                return rule.classification;
            }
        }

        Classification::Noise
    }
}

fn tier_or_noise(condition: bool, tier: Classification) -> Classification {
    if condition {
        tier
    } else {
        Classification::Noise
    }
}

/// Case-insensitive substring test against any keyword.
fn contains_keyword(haystack: &str, keywords: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| haystack.contains(&k.to_lowercase()))
}

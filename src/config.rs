//! Configuration for the diff and classification engines.
//!
//! Every section and every field has a default, so a partial (or empty)
//! configuration file is always usable. Files are loaded through
//! [`crate::parser::load_config`].

use crate::change::{ChangeType, Classification, StyleCategory};
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_TEXT_SIMILARITY_THRESHOLD: f64 = 0.95;
pub const DEFAULT_COLOR_IMPORTANCE: f64 = 0.8;
pub const DEFAULT_DIMENSION_MIN_CHANGE: f64 = 0.05;
pub const DEFAULT_COLOR_MIN_CHANGE: f64 = 0.1;
pub const DEFAULT_POSITION_FALLBACK_MAGNITUDE: f64 = 0.5;
pub const DEFAULT_TEXT_CRITICAL: f64 = 0.5;
pub const DEFAULT_POSITION_BASE: f64 = 0.05;
pub const DEFAULT_COLOR_COSMETIC: f64 = 0.3;
pub const DEFAULT_STYLE_CRITICAL: f64 = 0.8;
pub const DEFAULT_STYLE_COSMETIC: f64 = 0.2;
pub const DEFAULT_LOW_CONFIDENCE: f64 = 0.5;

pub const CAPTURE_TEXT: &str = "text";
pub const CAPTURE_ATTRIBUTES: &str = "attributes";
pub const CAPTURE_STYLES: &str = "styles";
pub const CAPTURE_POSITION: &str = "position";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Facets to compare: any of `text`, `attributes`, `styles`, `position`
    pub capture: Vec<String>,
    pub text: TextConfig,
    pub attributes: AttributeConfig,
    pub styles: StyleConfig,
    pub position: PositionConfig,
    pub classification: ClassificationConfig,
    /// Report elements present in only one snapshot
    pub structural_detection: bool,
    /// Stop emitting once this many records exist
    pub max_changes: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: strings(&[
                CAPTURE_TEXT,
                CAPTURE_ATTRIBUTES,
                CAPTURE_STYLES,
                CAPTURE_POSITION,
            ]),
            text: TextConfig::default(),
            attributes: AttributeConfig::default(),
            styles: StyleConfig::default(),
            position: PositionConfig::default(),
            classification: ClassificationConfig::default(),
            structural_detection: true,
            max_changes: None,
        }
    }
}

impl Config {
    pub fn captures(&self, facet: &str) -> bool {
        self.capture.iter().any(|c| c == facet)
    }

    /// Checks every threshold is a finite number in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classification;
        let thresholds = [
            ("text.similarity_threshold", self.text.similarity_threshold),
            ("styles.color_importance", self.styles.color_importance),
            (
                "styles.dimension_min_change",
                self.styles.dimension_min_change,
            ),
            ("styles.color_min_change", self.styles.color_min_change),
            (
                "position.fallback_magnitude",
                self.position.fallback_magnitude,
            ),
            ("classification.text_critical", c.text_critical),
            ("classification.position_base", c.position_base),
            ("classification.color_cosmetic", c.color_cosmetic),
            ("classification.style_critical", c.style_critical),
            ("classification.style_cosmetic", c.style_cosmetic),
            ("classification.low_confidence", c.low_confidence),
        ];

        for (field, value) in thresholds {
            if !is_unit_interval(value) {
                return Err(ConfigError::out_of_range(field, value));
            }
        }

        for (index, rule) in c.custom_rules.iter().enumerate() {
            for condition in &rule.conditions {
                if let RuleCondition::MinMagnitude(min) = condition {
                    if !is_unit_interval(*min) {
                        return Err(ConfigError::InvalidRule {
                            index,
                            message: format!("min_magnitude {} is outside [0, 1]", min),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

fn is_unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Text changes are reported only when similarity falls below this
    pub similarity_threshold: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_TEXT_SIMILARITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    /// Regex or wildcard patterns; an attribute whose old or new value
    /// matches any of them is not reported
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Style properties never compared. Also accepts `position`,
    /// `position_x` and `position_y` to silence layout changes.
    pub ignore: Vec<String>,
    /// Category name to the properties it covers
    pub categories: BTreeMap<String, Vec<String>>,
    /// Fixed magnitude assigned to any color change
    pub color_importance: f64,
    pub dimension_min_change: f64,
    pub color_min_change: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            categories: BTreeMap::new(),
            color_importance: DEFAULT_COLOR_IMPORTANCE,
            dimension_min_change: DEFAULT_DIMENSION_MIN_CHANGE,
            color_min_change: DEFAULT_COLOR_MIN_CHANGE,
        }
    }
}

impl StyleConfig {
    pub fn is_ignored(&self, property: &str) -> bool {
        self.ignore.iter().any(|p| p == property)
    }

    /// Category for `property`: the configured mapping first, then name
    /// heuristics.
    pub fn category_for(&self, property: &str) -> StyleCategory {
        self.categories
            .iter()
            .find(|(_, properties)| properties.iter().any(|p| p == property))
            .map(|(category, _)| StyleCategory::from_name(category))
            .unwrap_or_else(|| heuristic_category(property))
    }
}

fn heuristic_category(property: &str) -> StyleCategory {
    let contains_any = |needles: &[&str]| needles.iter().any(|n| property.contains(n));

    if contains_any(&[
        "width", "height", "margin", "padding", "border", "top", "left", "bottom", "right",
    ]) {
        StyleCategory::Dimension
    } else if contains_any(&["font", "text", "line-height", "letter-spacing"]) {
        StyleCategory::Typography
    } else if contains_any(&["color", "background"]) {
        StyleCategory::Color
    } else if contains_any(&["opacity", "display", "visibility", "z-index"]) {
        StyleCategory::Visibility
    } else {
        StyleCategory::Other
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    /// Magnitude used when a coordinate is missing on one side
    pub fallback_magnitude: f64,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            fallback_magnitude: DEFAULT_POSITION_FALLBACK_MAGNITUDE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub text_critical: f64,
    pub position_base: f64,
    pub color_cosmetic: f64,
    pub style_critical: f64,
    pub style_cosmetic: f64,
    /// Pairings below this confidence turn their changes into `potential`
    pub low_confidence: f64,
    pub interactive_keywords: Vec<String>,
    pub accessibility_keywords: Vec<String>,
    /// Enables `custom_rules`
    pub advanced: bool,
    pub custom_rules: Vec<CustomRule>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            text_critical: DEFAULT_TEXT_CRITICAL,
            position_base: DEFAULT_POSITION_BASE,
            color_cosmetic: DEFAULT_COLOR_COSMETIC,
            style_critical: DEFAULT_STYLE_CRITICAL,
            style_cosmetic: DEFAULT_STYLE_COSMETIC,
            low_confidence: DEFAULT_LOW_CONFIDENCE,
            interactive_keywords: strings(&["button", "input", "form", "a", "select"]),
            accessibility_keywords: strings(&["aria", "alt", "role"]),
            advanced: false,
            custom_rules: Vec::new(),
        }
    }
}

/// One predicate of a custom rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleCondition {
    PropertyContains(String),
    ChangeTypeIs(ChangeType),
    MinMagnitude(f64),
}

impl RuleCondition {
    pub fn holds(&self, property: &str, change_type: &ChangeType, magnitude: f64) -> bool {
        match self {
            RuleCondition::PropertyContains(needle) => property.contains(needle.as_str()),
            RuleCondition::ChangeTypeIs(expected) => change_type == expected,
            RuleCondition::MinMagnitude(min) => magnitude >= *min,
        }
    }
}

/// A user rule: when every condition holds, the change gets
/// `classification`. A rule with no conditions matches everything.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "CustomRuleDef")]
pub struct CustomRule {
    pub conditions: Vec<RuleCondition>,
    pub classification: Classification,
}

impl CustomRule {
    pub fn new(classification: Classification) -> Self {
        Self {
            conditions: Vec::new(),
            classification,
        }
    }

    pub fn when(mut self, condition: RuleCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn matches(&self, property: &str, change_type: &ChangeType, magnitude: f64) -> bool {
        self.conditions
            .iter()
            .all(|c| c.holds(property, change_type, magnitude))
    }
}

/// File form of a custom rule.
#[derive(Debug, Deserialize)]
struct CustomRuleDef {
    #[serde(default)]
    property_contains: Option<String>,
    #[serde(default)]
    change_type: Option<ChangeType>,
    #[serde(default)]
    min_magnitude: Option<f64>,
    classification: Classification,
}

impl From<CustomRuleDef> for CustomRule {
    fn from(def: CustomRuleDef) -> Self {
        let mut conditions = Vec::new();
        if let Some(needle) = def.property_contains {
            conditions.push(RuleCondition::PropertyContains(needle));
        }
        if let Some(change_type) = def.change_type {
            conditions.push(RuleCondition::ChangeTypeIs(change_type));
        }
        if let Some(min) = def.min_magnitude {
            conditions.push(RuleCondition::MinMagnitude(min));
        }
        Self {
            conditions,
            classification: def.classification,
        }
    }
}

//! Change records: the unit of output of a comparison run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket a style property falls into for scoring and classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleCategory {
    Dimension,
    Typography,
    Color,
    Visibility,
    Other,
    /// A category name introduced by configuration.
    Custom(String),
}

impl StyleCategory {
    pub fn from_name(name: &str) -> Self {
        match name {
            "dimension" => StyleCategory::Dimension,
            "typography" => StyleCategory::Typography,
            "color" => StyleCategory::Color,
            "visibility" => StyleCategory::Visibility,
            "other" => StyleCategory::Other,
            custom => StyleCategory::Custom(custom.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StyleCategory::Dimension => "dimension",
            StyleCategory::Typography => "typography",
            StyleCategory::Color => "color",
            StyleCategory::Visibility => "visibility",
            StyleCategory::Other => "other",
            StyleCategory::Custom(name) => name,
        }
    }
}

/// What kind of facet changed. Drives classification routing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ChangeType {
    Text,
    Attribute,
    Style(StyleCategory),
    Layout,
    Structural,
    ElementAdded,
    ElementRemoved,
}

impl ChangeType {
    pub fn is_style(&self) -> bool {
        matches!(self, ChangeType::Style(_))
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::Text => write!(f, "text"),
            ChangeType::Attribute => write!(f, "attribute"),
            ChangeType::Style(category) => write!(f, "style_{}", category.name()),
            ChangeType::Layout => write!(f, "layout"),
            ChangeType::Structural => write!(f, "structural"),
            ChangeType::ElementAdded => write!(f, "element_added"),
            ChangeType::ElementRemoved => write!(f, "element_removed"),
        }
    }
}

impl std::str::FromStr for ChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ChangeType::Text),
            "attribute" => Ok(ChangeType::Attribute),
            "layout" => Ok(ChangeType::Layout),
            "structural" => Ok(ChangeType::Structural),
            "element_added" => Ok(ChangeType::ElementAdded),
            "element_removed" => Ok(ChangeType::ElementRemoved),
            other => match other.strip_prefix("style_") {
                Some(category) if !category.is_empty() => {
                    Ok(ChangeType::Style(StyleCategory::from_name(category)))
                }
                _ => Err(format!("unknown change type '{}'", other)),
            },
        }
    }
}

impl From<ChangeType> for String {
    fn from(change_type: ChangeType) -> Self {
        change_type.to_string()
    }
}

impl TryFrom<String> for ChangeType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Severity tier assigned to a change.
///
/// Variants are declared from least to most severe so that ordering
/// comparisons read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Below the reporting threshold
    Noise,
    /// Visually noticeable but not functional
    Cosmetic,
    /// Uncertain because the element pairing itself was low confidence
    Potential,
    /// Functionally significant
    Critical,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Critical,
        Classification::Potential,
        Classification::Cosmetic,
        Classification::Noise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Noise => "noise",
            Classification::Cosmetic => "cosmetic",
            Classification::Potential => "potential",
            Classification::Critical => "critical",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored difference that has not been classified yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChange {
    pub element: String,
    pub property: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_type: ChangeType,
    pub magnitude: f64,
}

impl RawChange {
    pub fn new(
        element: impl Into<String>,
        property: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
        change_type: ChangeType,
        magnitude: f64,
    ) -> Self {
        Self {
            element: element.into(),
            property: property.into(),
            old_value,
            new_value,
            change_type,
            magnitude: magnitude.clamp(0.0, 1.0),
        }
    }
}

/// A single classified difference between baseline and current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Selector of the element the change belongs to
    pub element: String,
    /// Changed facet, e.g. `text`, `attr_href`, `color`, `position_x`
    pub property: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_type: ChangeType,
    /// How different, in `[0, 1]`
    pub magnitude: f64,
    pub classification: Classification,
    /// Pairing confidence, absent for identity-keyed pairing
    pub match_confidence: Option<f64>,
    /// Structural annotation added by enrichment
    #[serde(default)]
    pub context: Option<String>,
}

impl ChangeRecord {
    pub fn classified(raw: RawChange, classification: Classification) -> Self {
        Self {
            element: raw.element,
            property: raw.property,
            old_value: raw.old_value,
            new_value: raw.new_value,
            change_type: raw.change_type,
            magnitude: raw.magnitude,
            classification,
            match_confidence: None,
            context: None,
        }
    }

    /// Presence/absence change. Always full magnitude and critical.
    pub fn structural(
        element: impl Into<String>,
        property: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        let raw = RawChange::new(
            element,
            property,
            old_value,
            new_value,
            ChangeType::Structural,
            1.0,
        );
        Self::classified(raw, Classification::Critical)
    }

    pub fn with_match_confidence(mut self, confidence: f64) -> Self {
        self.match_confidence = Some(confidence);
        self
    }
}

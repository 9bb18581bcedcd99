//! Element snapshots captured from a rendered page.
//!
//! A snapshot is the flat list of element descriptors extracted from one page
//! state. The capture itself happens elsewhere; this module only describes the
//! shape of the data and the identity rules the pipeline relies on.

use crate::error::SnapshotError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Strips positional pseudo-classes (`:nth-of-type(3)`, `:nth-child(2n)`, ...)
/// and collapses whitespace, so selectors compare by structure rather than
/// by position.
pub fn normalize_selector(selector: &str) -> String {
    static NTH_REGEX: OnceLock<Regex> = OnceLock::new();
    let nth_regex = NTH_REGEX
        .get_or_init(|| Regex::new(r":nth-[a-z-]+\([^)]*\)").expect("Invalid nth regex"));

    nth_regex
        .replace_all(selector, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Bounding box of an element as reported by the capture.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementPosition {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl ElementPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: None,
            height: None,
        }
    }

    /// Returns the coordinate for `axis` ("x" or "y").
    pub fn axis(&self, axis: &str) -> Option<f64> {
        match axis {
            "x" => Some(self.x),
            "y" => Some(self.y),
            _ => None,
        }
    }
}

/// One captured element.
///
/// Attribute and style maps are ordered so that the records produced for a
/// single element always come out in the same order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub selector: String,
    #[serde(default, alias = "tagName")]
    pub tag: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    #[serde(default)]
    pub position: Option<ElementPosition>,
    #[serde(default)]
    pub fingerprint: Option<String>,
}

impl ElementSnapshot {
    pub fn new(selector: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(ElementPosition::new(x, y));
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Text content, with a missing value read as the empty string.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes
            .get("id")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn first_class(&self) -> Option<&str> {
        self.attributes
            .get("class")
            .and_then(|classes| classes.split_whitespace().next())
    }

    /// Key used to pair elements when no matcher is involved.
    ///
    /// Position and text are deliberately left out so that an element whose
    /// content moved or changed still pairs with its counterpart.
    pub fn identity_key(&self) -> String {
        if let Some(id) = self.id() {
            format!("{}::id={}", self.selector, id)
        } else if let Some(class) = self.first_class() {
            format!("{}::class={}", self.selector, class)
        } else {
            self.selector.clone()
        }
    }

    /// Checks the element is usable for diffing.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.selector.trim().is_empty() {
            return Err(SnapshotError::EmptySelector {
                tag: self.tag.clone(),
            });
        }

        if let Some(position) = &self.position {
            let fields = [
                ("x", Some(position.x)),
                ("y", Some(position.y)),
                ("width", position.width),
                ("height", position.height),
            ];
            for (field, value) in fields {
                if value.is_some_and(|v| !v.is_finite()) {
                    return Err(SnapshotError::NonFinitePosition {
                        selector: self.selector.clone(),
                        field: field.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// On-disk form of a snapshot: either a bare element list or a document
/// with the captured URL alongside the elements.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SnapshotDocument {
    Elements(Vec<ElementSnapshot>),
    Page {
        #[serde(default)]
        url: Option<String>,
        elements: Vec<ElementSnapshot>,
    },
}

impl SnapshotDocument {
    pub fn url(&self) -> Option<&str> {
        match self {
            SnapshotDocument::Elements(_) => None,
            SnapshotDocument::Page { url, .. } => url.as_deref(),
        }
    }

    pub fn into_elements(self) -> Vec<ElementSnapshot> {
        match self {
            SnapshotDocument::Elements(elements) => elements,
            SnapshotDocument::Page { elements, .. } => elements,
        }
    }
}

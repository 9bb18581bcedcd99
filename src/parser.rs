//! Loading snapshot and configuration files.
//!
//! Formats are detected from the file extension (`.json`, `.yaml`/`.yml`,
//! `.toml`). When the extension is unknown or missing, each supported format
//! is tried in turn.
//!
//! # Examples
//!
//! ```no_run
//! use uidiff_rs::parser::{load_config, load_snapshot};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let baseline = load_snapshot(Path::new("baseline.json"))?;
//! let config = load_config(Path::new("uidiff.toml"))?;
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::error::ParseError;
use crate::snapshot::{ElementSnapshot, SnapshotDocument};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Serialization format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    Json,
    Yaml,
    Toml,
}

impl FormatHint {
    /// Detects the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("json") => Some(FormatHint::Json),
            Some("yaml") | Some("yml") => Some(FormatHint::Yaml),
            Some("toml") => Some(FormatHint::Toml),
            _ => None,
        }
    }
}

/// Loads a snapshot file (JSON or YAML) into its element list.
///
/// # Errors
///
/// This function will return an error if:
/// - The file does not exist (`ParseError::FileNotFound`)
/// - The file cannot be read (`ParseError::ReadError`)
/// - The content is not a valid snapshot in the detected format
/// - The format cannot be determined (`ParseError::UnknownFormat`)
pub fn load_snapshot(path: &Path) -> Result<Vec<ElementSnapshot>, ParseError> {
    let content = read_file(path)?;
    let display = path.to_string_lossy().to_string();

    let document: SnapshotDocument = match FormatHint::from_path(path) {
        Some(FormatHint::Json) => {
            serde_json::from_str(&content).map_err(|e| ParseError::json_error(display, e))?
        }
        Some(FormatHint::Yaml) => {
            serde_yaml::from_str(&content).map_err(|e| ParseError::yaml_error(display, e))?
        }
        _ => serde_json::from_str(&content)
            .ok()
            .or_else(|| serde_yaml::from_str(&content).ok())
            .ok_or_else(|| ParseError::unknown_format(display))?,
    };

    Ok(document.into_elements())
}

/// Parses a JSON snapshot from a string.
pub fn parse_snapshot_json(content: &str) -> Result<Vec<ElementSnapshot>, serde_json::Error> {
    let document: SnapshotDocument = serde_json::from_str(content)?;
    Ok(document.into_elements())
}

/// Parses a YAML snapshot from a string.
pub fn parse_snapshot_yaml(content: &str) -> Result<Vec<ElementSnapshot>, serde_yaml::Error> {
    let document: SnapshotDocument = serde_yaml::from_str(content)?;
    Ok(document.into_elements())
}

/// Loads a configuration file (TOML, YAML or JSON).
///
/// Missing sections and fields take their defaults; the result is not
/// validated here.
pub fn load_config(path: &Path) -> Result<Config, ParseError> {
    let content = read_file(path)?;
    let display = path.to_string_lossy().to_string();

    match FormatHint::from_path(path) {
        Some(format) => parse_as(&content, format, &display),
        None => [FormatHint::Json, FormatHint::Yaml, FormatHint::Toml]
            .into_iter()
            .find_map(|format| parse_as(&content, format, &display).ok())
            .ok_or_else(|| ParseError::unknown_format(display)),
    }
}

fn parse_as<T: DeserializeOwned>(
    content: &str,
    format: FormatHint,
    display: &str,
) -> Result<T, ParseError> {
    match format {
        FormatHint::Json => {
            serde_json::from_str(content).map_err(|e| ParseError::json_error(display, e))
        }
        FormatHint::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ParseError::yaml_error(display, e))
        }
        FormatHint::Toml => toml::from_str(content).map_err(|e| ParseError::toml_error(display, e)),
    }
}

fn read_file(path: &Path) -> Result<String, ParseError> {
    if !path.exists() {
        return Err(ParseError::file_not_found(
            path.to_string_lossy().to_string(),
        ));
    }

    fs::read_to_string(path)
        .map_err(|e| ParseError::read_error(path.to_string_lossy().to_string(), e))
}

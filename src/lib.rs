//! UIDIFF - change detection for rendered UI snapshots.
//!
//! This library compares two DOM snapshots (baseline and current), scores
//! each difference between paired elements, and classifies it as `critical`,
//! `potential`, `cosmetic` or `noise`.
//!
//! # Example
//!
//! ```no_run
//! use uidiff_rs::{
//!     format_report, load_snapshot, ComparisonMode, Config, FingerprintMatcher, OutputFormat,
//!     OutputOptions, Pipeline, SelectorStructureAnalyzer,
//! };
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let baseline = load_snapshot(Path::new("baseline.json"))?;
//! let current = load_snapshot(Path::new("current.json"))?;
//!
//! let config = Config::default();
//! let pipeline = Pipeline::new(&config)?;
//! let report = pipeline.run(
//!     ComparisonMode::Matched,
//!     &baseline,
//!     &current,
//!     &FingerprintMatcher::new(),
//!     &SelectorStructureAnalyzer::new(),
//! );
//!
//! let output = format_report(&report, &OutputFormat::Terminal, &OutputOptions::default())?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod change;
pub mod classify;
pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod prune;
pub mod similarity;
pub mod snapshot;
pub mod structure;

// Re-export commonly used types for convenience
pub use change::{ChangeRecord, ChangeType, Classification, RawChange, StyleCategory};
pub use classify::Classifier;
pub use config::{
    AttributeConfig, ClassificationConfig, Config, CustomRule, PositionConfig, RuleCondition,
    StyleConfig, TextConfig,
};
pub use diff::DiffEngine;
pub use error::{ConfigError, OutputError, ParseError, SnapshotError, UidiffError};
pub use filter::{filter_changes, filter_report, FilterConfig};
pub use matcher::{ElementMatcher, FingerprintMatcher, MatchResult, MatchedPair};
pub use output::{format_report, OutputFormat, OutputOptions};
pub use parser::{load_config, load_snapshot, parse_snapshot_json, parse_snapshot_yaml, FormatHint};
pub use pipeline::{ComparisonMode, ComprehensiveAnalysisResult, Pipeline, Report};
pub use prune::prune_ancestor_duplicates;
pub use snapshot::{ElementPosition, ElementSnapshot};
pub use structure::{SelectorStructureAnalyzer, StructuralAnalysis, StructuralAnalyzer};

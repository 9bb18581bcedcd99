//! Orchestration of a comparison run.
//!
//! Three strategies are offered, from simplest to richest:
//!
//! - [`Pipeline::compare_by_identity`] pairs elements by identity key.
//! - [`Pipeline::compare_with_matcher`] delegates pairing to an
//!   [`ElementMatcher`] and tags changes on weakly matched pairs as
//!   `potential`.
//! - [`Pipeline::compare_with_structure`] additionally runs a
//!   [`StructuralAnalyzer`] and reports timing figures.
//!
//! A pipeline holds only read-only configuration. The records of a run are
//! collected into a value owned by that call, so one pipeline can serve
//! overlapping runs.

use crate::change::{ChangeRecord, Classification};
use crate::config::Config;
use crate::diff::DiffEngine;
use crate::error::ConfigError;
use crate::matcher::{ElementMatcher, MatchResult, MatchedPair};
use crate::prune::prune_ancestor_duplicates;
use crate::snapshot::ElementSnapshot;
use crate::structure::{StructuralAnalysis, StructuralAnalyzer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Which pairing strategy produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    Identity,
    Matched,
    Structural,
}

/// Result of the structurally enriched comparison.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveAnalysisResult {
    pub changes: Vec<ChangeRecord>,
    pub old_structural_analysis: StructuralAnalysis,
    pub new_structural_analysis: StructuralAnalysis,
    pub processing_time_ms: f64,
    pub elements_analyzed: usize,
    pub changes_per_second: f64,
}

/// Output of [`Pipeline::run`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Report {
    Identity { changes: Vec<ChangeRecord> },
    Matched { changes: Vec<ChangeRecord> },
    Structural(ComprehensiveAnalysisResult),
}

impl Report {
    pub fn mode(&self) -> ComparisonMode {
        match self {
            Report::Identity { .. } => ComparisonMode::Identity,
            Report::Matched { .. } => ComparisonMode::Matched,
            Report::Structural(_) => ComparisonMode::Structural,
        }
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        match self {
            Report::Identity { changes } | Report::Matched { changes } => changes,
            Report::Structural(result) => &result.changes,
        }
    }

    pub fn changes_mut(&mut self) -> &mut Vec<ChangeRecord> {
        match self {
            Report::Identity { changes } | Report::Matched { changes } => changes,
            Report::Structural(result) => &mut result.changes,
        }
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.changes()
            .iter()
            .filter(|c| c.classification == classification)
            .count()
    }
}

/// Records per second; zero when no time has elapsed.
pub fn changes_per_second(records: usize, elapsed_ms: f64) -> f64 {
    if elapsed_ms <= 0.0 {
        0.0
    } else {
        records as f64 * 1000.0 / elapsed_ms
    }
}

/// Records emitted by one run, bounded by the optional cap.
struct ChangeCollector {
    records: Vec<ChangeRecord>,
    cap: Option<usize>,
}

impl ChangeCollector {
    fn new(cap: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            cap,
        }
    }

    fn is_full(&self) -> bool {
        self.cap.is_some_and(|cap| self.records.len() >= cap)
    }

    /// Adds records up to the cap. Returns false once the cap is reached.
    fn extend(&mut self, records: impl IntoIterator<Item = ChangeRecord>) -> bool {
        for record in records {
            if self.is_full() {
                break;
            }
            self.records.push(record);
        }
        if self.is_full() {
            info!(cap = ?self.cap, "change cap reached, stopping");
            return false;
        }
        true
    }

    fn into_records(self) -> Vec<ChangeRecord> {
        self.records
    }
}

pub struct Pipeline<'c> {
    config: &'c Config,
    engine: DiffEngine<'c>,
}

impl<'c> Pipeline<'c> {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a threshold is out of range.
    pub fn new(config: &'c Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            engine: DiffEngine::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Runs the strategy for `mode`, using `matcher` and `analyzer` where the
    /// mode needs them.
    pub fn run<M, A>(
        &self,
        mode: ComparisonMode,
        baseline: &[ElementSnapshot],
        current: &[ElementSnapshot],
        matcher: &M,
        analyzer: &A,
    ) -> Report
    where
        M: ElementMatcher + ?Sized,
        A: StructuralAnalyzer + ?Sized,
    {
        match mode {
            ComparisonMode::Identity => Report::Identity {
                changes: self.compare_by_identity(baseline, current),
            },
            ComparisonMode::Matched => Report::Matched {
                changes: self.compare_with_matcher(baseline, current, matcher),
            },
            ComparisonMode::Structural => Report::Structural(self.compare_with_structure(
                baseline, current, matcher, analyzer,
            )),
        }
    }

    /// Pairs elements by [`ElementSnapshot::identity_key`].
    ///
    /// Keys are visited in sorted order so that output, and the records kept
    /// under a cap, are reproducible. When a key occurs more than once in a
    /// snapshot the last element wins.
    pub fn compare_by_identity(
        &self,
        baseline: &[ElementSnapshot],
        current: &[ElementSnapshot],
    ) -> Vec<ChangeRecord> {
        let old_by_key = index_by_identity(baseline);
        let new_by_key = index_by_identity(current);
        let mut collector = ChangeCollector::new(self.config.max_changes);
        self.collect_by_identity(&old_by_key, &new_by_key, &mut collector);

        let mut records = collector.into_records();
        self.engine.classifier().reclassify_all(&mut records);
        info!(
            mode = "identity",
            changes = records.len(),
            "comparison finished"
        );
        records
    }

    /// Pairs elements with `matcher`, then removes duplicate ancestor text
    /// changes.
    pub fn compare_with_matcher<M>(
        &self,
        baseline: &[ElementSnapshot],
        current: &[ElementSnapshot],
        matcher: &M,
    ) -> Vec<ChangeRecord>
    where
        M: ElementMatcher + ?Sized,
    {
        let result = matcher.match_elements(baseline, current);
        debug!(
            pairs = result.pairs.len(),
            removed = result.removed.len(),
            added = result.added.len(),
            "elements matched"
        );

        let mut collector = ChangeCollector::new(self.config.max_changes);
        self.collect_matched(&result, &mut collector);

        let records = prune_ancestor_duplicates(collector.into_records());
        info!(
            mode = "matched",
            changes = records.len(),
            "comparison finished"
        );
        records
    }

    /// Match-enhanced comparison with structural context and timing.
    pub fn compare_with_structure<M, A>(
        &self,
        baseline: &[ElementSnapshot],
        current: &[ElementSnapshot],
        matcher: &M,
        analyzer: &A,
    ) -> ComprehensiveAnalysisResult
    where
        M: ElementMatcher + ?Sized,
        A: StructuralAnalyzer + ?Sized,
    {
        let started = Instant::now();

        let old_analysis = analyzer.analyze_structure(baseline);
        let new_analysis = analyzer.analyze_structure(current);
        let changes = self.compare_with_matcher(baseline, current, matcher);
        let mut changes = analyzer.analyze_structural_changes(changes, &old_analysis, &new_analysis);
        if let Some(cap) = self.config.max_changes {
            changes.truncate(cap);
        }

        let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        let result = ComprehensiveAnalysisResult {
            changes_per_second: changes_per_second(changes.len(), processing_time_ms),
            changes,
            old_structural_analysis: old_analysis,
            new_structural_analysis: new_analysis,
            processing_time_ms,
            elements_analyzed: baseline.len() + current.len(),
        };
        info!(
            elements = result.elements_analyzed,
            changes = result.changes.len(),
            elapsed_ms = result.processing_time_ms,
            "structural comparison finished"
        );
        result
    }

    fn collect_by_identity(
        &self,
        old_by_key: &BTreeMap<String, &ElementSnapshot>,
        new_by_key: &BTreeMap<String, &ElementSnapshot>,
        collector: &mut ChangeCollector,
    ) {
        for (key, old) in old_by_key {
            let emitted = match new_by_key.get(key) {
                Some(new) => self.diff_pair(old, new),
                None if self.config.structural_detection => vec![ChangeRecord::structural(
                    &old.selector,
                    "element_existence",
                    Some(describe(old)),
                    None,
                )],
                None => continue,
            };
            if !collector.extend(emitted) {
                return;
            }
        }

        if !self.config.structural_detection {
            return;
        }
        let added = new_by_key
            .iter()
            .filter(|(key, _)| !old_by_key.contains_key(*key))
            .map(|(_, new)| {
                ChangeRecord::structural(
                    &new.selector,
                    "element_existence",
                    None,
                    Some(describe(new)),
                )
            });
        collector.extend(added);
    }

    fn collect_matched(&self, result: &MatchResult<'_>, collector: &mut ChangeCollector) {
        for pair in &result.pairs {
            if !collector.extend(self.diff_matched_pair(pair)) {
                return;
            }
        }

        if !self.config.structural_detection {
            return;
        }
        let removed = result.removed.iter().map(|el| {
            ChangeRecord::structural(&el.selector, "element_removed", Some(describe(el)), None)
        });
        if !collector.extend(removed) {
            return;
        }
        let added = result.added.iter().map(|el| {
            ChangeRecord::structural(&el.selector, "element_added", None, Some(describe(el)))
        });
        collector.extend(added);
    }

    fn diff_matched_pair(&self, pair: &MatchedPair<'_>) -> Vec<ChangeRecord> {
        let low_confidence = pair.confidence < self.config.classification.low_confidence;
        self.diff_pair(pair.baseline, pair.current)
            .into_iter()
            .map(|record| {
                let mut record = record.with_match_confidence(pair.confidence);
                if low_confidence {
                    record.classification = Classification::Potential;
                }
                record
            })
            .collect()
    }

    /// Diffs one pair; a malformed pair is logged and contributes nothing.
    fn diff_pair(&self, old: &ElementSnapshot, new: &ElementSnapshot) -> Vec<ChangeRecord> {
        match self.engine.diff_elements(old, new) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    baseline = %old.selector,
                    current = %new.selector,
                    error = %err,
                    "skipping element pair"
                );
                Vec::new()
            }
        }
    }
}

fn index_by_identity(elements: &[ElementSnapshot]) -> BTreeMap<String, &ElementSnapshot> {
    elements.iter().map(|el| (el.identity_key(), el)).collect()
}

/// Short value used for the present side of an existence change.
fn describe(element: &ElementSnapshot) -> String {
    if element.tag.is_empty() {
        element.selector.clone()
    } else {
        format!("<{}>", element.tag)
    }
}

//! Structural analysis of snapshots.
//!
//! An analyzer summarises the shape of a snapshot (size, depth, repeating
//! patterns such as list items or table rows) and uses those summaries to
//! annotate change records with structural context.

use crate::change::ChangeRecord;
use crate::snapshot::{normalize_selector, ElementSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;

/// A selector shape that occurs more than once, e.g. `ul.results > li`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatingPattern {
    pub pattern: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralAnalysis {
    pub total_nodes: usize,
    pub max_depth: usize,
    /// Sorted by pattern
    pub repeating_patterns: Vec<RepeatingPattern>,
}

impl StructuralAnalysis {
    pub fn pattern_count(&self, pattern: &str) -> usize {
        self.repeating_patterns
            .iter()
            .find(|p| p.pattern == pattern)
            .map_or(0, |p| p.count)
    }
}

pub trait StructuralAnalyzer {
    fn analyze_structure(&self, elements: &[ElementSnapshot]) -> StructuralAnalysis;

    /// Returns the final, annotated change list.
    fn analyze_structural_changes(
        &self,
        changes: Vec<ChangeRecord>,
        old: &StructuralAnalysis,
        new: &StructuralAnalysis,
    ) -> Vec<ChangeRecord>;
}

/// Analyzer that works from selectors alone.
///
/// Depth is the number of compound selectors in a selector; repeating
/// patterns are selectors that coincide once positional indices are
/// stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorStructureAnalyzer;

impl SelectorStructureAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

fn selector_depth(selector: &str) -> usize {
    selector
        .split(|c: char| c.is_whitespace() || matches!(c, '>' | '+' | '~'))
        .filter(|part| !part.is_empty())
        .count()
}

impl StructuralAnalyzer for SelectorStructureAnalyzer {
    fn analyze_structure(&self, elements: &[ElementSnapshot]) -> StructuralAnalysis {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for el in elements {
            *counts.entry(normalize_selector(&el.selector)).or_default() += 1;
        }

        StructuralAnalysis {
            total_nodes: elements.len(),
            max_depth: elements
                .iter()
                .map(|el| selector_depth(&el.selector))
                .max()
                .unwrap_or(0),
            repeating_patterns: counts
                .into_iter()
                .filter(|(_, count)| *count >= 2)
                .map(|(pattern, count)| RepeatingPattern { pattern, count })
                .collect(),
        }
    }

    fn analyze_structural_changes(
        &self,
        mut changes: Vec<ChangeRecord>,
        old: &StructuralAnalysis,
        new: &StructuralAnalysis,
    ) -> Vec<ChangeRecord> {
        for change in &mut changes {
            let pattern = normalize_selector(&change.element);
            let old_count = old.pattern_count(&pattern);
            let new_count = new.pattern_count(&pattern);
            if old_count >= 2 || new_count >= 2 {
                change.context = Some(format!(
                    "repeating {} ({} → {} items)",
                    pattern, old_count, new_count
                ));
            }
        }
        changes
    }
}

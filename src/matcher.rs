//! Pairing of baseline and current elements.
//!
//! The pipeline only depends on the [`ElementMatcher`] trait; any strategy
//! (fingerprints, DOM paths, geometry) can be plugged in. [`FingerprintMatcher`]
//! is the strategy used by the command-line tool.

use crate::snapshot::{normalize_selector, ElementSnapshot};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A baseline element and the current element it was paired with.
#[derive(Debug, Clone, Copy)]
pub struct MatchedPair<'a> {
    pub baseline: &'a ElementSnapshot,
    pub current: &'a ElementSnapshot,
    /// How sure the matcher is that these are the same element, in `[0, 1]`
    pub confidence: f64,
}

/// Outcome of pairing two snapshots.
#[derive(Debug, Clone, Default)]
pub struct MatchResult<'a> {
    pub pairs: Vec<MatchedPair<'a>>,
    /// Baseline elements with no current counterpart
    pub removed: Vec<&'a ElementSnapshot>,
    /// Current elements with no baseline counterpart
    pub added: Vec<&'a ElementSnapshot>,
}

pub trait ElementMatcher {
    fn match_elements<'a>(
        &self,
        baseline: &'a [ElementSnapshot],
        current: &'a [ElementSnapshot],
    ) -> MatchResult<'a>;
}

/// Greedy multi-pass matcher.
///
/// Passes run from most to least reliable signal; an element paired by an
/// earlier pass is never reconsidered:
///
/// 1. identical fingerprint
/// 2. identical identity key (selector plus id or first class)
/// 3. identical selector
/// 4. same tag and same selector once positional indices are stripped
///
/// Within a pass, baseline elements are visited in input order and take the
/// first free current candidate, so the result is deterministic.
#[derive(Debug, Clone)]
pub struct FingerprintMatcher {
    pub fingerprint_confidence: f64,
    pub identity_confidence: f64,
    pub selector_confidence: f64,
    pub positional_confidence: f64,
}

impl Default for FingerprintMatcher {
    fn default() -> Self {
        Self {
            fingerprint_confidence: 1.0,
            identity_confidence: 0.9,
            selector_confidence: 0.8,
            positional_confidence: 0.4,
        }
    }
}

impl FingerprintMatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElementMatcher for FingerprintMatcher {
    fn match_elements<'a>(
        &self,
        baseline: &'a [ElementSnapshot],
        current: &'a [ElementSnapshot],
    ) -> MatchResult<'a> {
        let mut state = PairingState::new(baseline.len(), current.len());

        state.run_pass(baseline, current, self.fingerprint_confidence, |el| {
            el.fingerprint.clone().filter(|f| !f.is_empty())
        });
        state.run_pass(baseline, current, self.identity_confidence, |el| {
            Some(el.identity_key())
        });
        state.run_pass(baseline, current, self.selector_confidence, |el| {
            Some(el.selector.clone())
        });
        state.run_pass(baseline, current, self.positional_confidence, |el| {
            Some((el.tag.clone(), normalize_selector(&el.selector)))
        });

        state.into_result(baseline, current)
    }
}

struct PairingState {
    /// For each baseline index, the paired current index and confidence
    baseline_pairs: Vec<Option<(usize, f64)>>,
    current_used: Vec<bool>,
}

impl PairingState {
    fn new(baseline_len: usize, current_len: usize) -> Self {
        Self {
            baseline_pairs: vec![None; baseline_len],
            current_used: vec![false; current_len],
        }
    }

    fn run_pass<K, F>(
        &mut self,
        baseline: &[ElementSnapshot],
        current: &[ElementSnapshot],
        confidence: f64,
        key: F,
    ) where
        K: Eq + Hash,
        F: Fn(&ElementSnapshot) -> Option<K>,
    {
        let mut candidates: HashMap<K, VecDeque<usize>> = HashMap::new();
        for (j, el) in current.iter().enumerate() {
            if self.current_used[j] {
                continue;
            }
            if let Some(k) = key(el) {
                candidates.entry(k).or_default().push_back(j);
            }
        }

        for (i, el) in baseline.iter().enumerate() {
            if self.baseline_pairs[i].is_some() {
                continue;
            }
            let Some(k) = key(el) else { continue };
            if let Some(j) = candidates.get_mut(&k).and_then(VecDeque::pop_front) {
                self.baseline_pairs[i] = Some((j, confidence));
                self.current_used[j] = true;
            }
        }
    }

    fn into_result<'a>(
        self,
        baseline: &'a [ElementSnapshot],
        current: &'a [ElementSnapshot],
    ) -> MatchResult<'a> {
        let mut result = MatchResult::default();

        for (i, pair) in self.baseline_pairs.iter().enumerate() {
            match pair {
                Some((j, confidence)) => result.pairs.push(MatchedPair {
                    baseline: &baseline[i],
                    current: &current[*j],
                    confidence: *confidence,
                }),
                None => result.removed.push(&baseline[i]),
            }
        }

        result.added = current
            .iter()
            .zip(&self.current_used)
            .filter(|(_, used)| !**used)
            .map(|(el, _)| el)
            .collect();

        result
    }
}

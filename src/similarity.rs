//! Scoring helpers shared by the diff engine.
//!
//! Text is compared with a normalized Levenshtein distance; dimension-like
//! values (`12px`, `1.5em`, raw coordinates) are compared by the relative
//! change of their first numeric token.

use regex::Regex;
use std::sync::OnceLock;

/// Levenshtein distance over Unicode scalar values.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Similarity in `[0, 1]`: `1 - distance / max(len(a), len(b))`.
///
/// Two empty strings are identical; exactly one empty string is maximally
/// different.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();

    match (len_a, len_b) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        _ => {
            let longest = len_a.max(len_b) as f64;
            1.0 - edit_distance(a, b) as f64 / longest
        }
    }
}

/// Extracts the first run of digits and dots from `value` as a number.
pub fn first_number(value: &str) -> Option<f64> {
    static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    let number_regex =
        NUMBER_REGEX.get_or_init(|| Regex::new(r"[0-9.]+").expect("Invalid number regex"));

    number_regex
        .find(value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Relative change from `old` to `new`, capped at 1.0.
///
/// A zero baseline has no meaningful ratio, so the absolute new value is used
/// instead.
pub fn relative_change(old: f64, new: f64) -> f64 {
    let change = if old == 0.0 {
        new.abs()
    } else {
        (new - old).abs() / old.abs()
    };
    change.clamp(0.0, 1.0)
}

/// Magnitude for two unit-bearing strings such as `"12px"` and `"18px"`.
///
/// When either side has no parseable number the comparison degrades to a
/// binary equal / not equal score.
pub fn numeric_magnitude(old: Option<&str>, new: Option<&str>) -> f64 {
    match (old.and_then(first_number), new.and_then(first_number)) {
        (Some(o), Some(n)) => relative_change(o, n),
        _ => {
            if old == new {
                0.0
            } else {
                1.0
            }
        }
    }
}

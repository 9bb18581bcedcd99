//! Removal of aggregate text changes that duplicate a more specific one.
//!
//! When a leaf's text changes, every ancestor whose text content includes the
//! leaf reports the same change again. This pass keeps the most specific
//! record and drops the aggregates.
//!
//! Ancestry is judged from selector strings, not from the real tree: after
//! normalization, `A` is treated as an ancestor of `B` when `B` contains `A`.
//! That can over-match (`.item` inside `.item-wrapper`) or under-match
//! (ancestors whose selector is not a prefix of the descendant's). The
//! behaviour is kept as is so reports stay comparable between runs.

use crate::change::{ChangeRecord, ChangeType};
use crate::snapshot::normalize_selector;
use tracing::{debug, info};

/// Longest leaf text considered by the selector-independent pass.
const MAX_LEAF_TEXT_CHARS: usize = 60;

/// Heuristic ancestor test on normalized selectors.
pub fn is_selector_ancestor(ancestor: &str, descendant: &str) -> bool {
    if ancestor.is_empty() {
        return false;
    }
    descendant.contains(ancestor)
        || descendant.starts_with(&format!("{}>", ancestor))
        || descendant.starts_with(&format!("{} ", ancestor))
}

struct TextChange<'r> {
    index: usize,
    selector: String,
    old: &'r str,
    new: &'r str,
}

/// Prunes duplicate ancestor text changes. Non-text records pass through
/// untouched and the relative order of survivors is preserved.
pub fn prune_ancestor_duplicates(changes: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
    let remove = removal_mask(&changes);

    let pruned = remove.iter().filter(|r| **r).count();
    if pruned > 0 {
        info!(pruned, "removed duplicate ancestor text changes");
    } else {
        debug!("no duplicate ancestor text changes");
    }

    changes
        .into_iter()
        .zip(remove)
        .filter(|(_, removed)| !removed)
        .map(|(change, _)| change)
        .collect()
}

/// Marks every record to drop. All marks are decided against the same input
/// so the result does not depend on record order.
fn removal_mask(changes: &[ChangeRecord]) -> Vec<bool> {
    let texts: Vec<TextChange> = changes
        .iter()
        .enumerate()
        .filter(|(_, c)| c.change_type == ChangeType::Text)
        .map(|(index, c)| TextChange {
            index,
            selector: normalize_selector(&c.element),
            old: c.old_value.as_deref().unwrap_or(""),
            new: c.new_value.as_deref().unwrap_or(""),
        })
        .collect();

    let mut remove = vec![false; changes.len()];

    for ancestor in &texts {
        for descendant in &texts {
            if ancestor.index != descendant.index
                && is_selector_ancestor(&ancestor.selector, &descendant.selector)
                && aggregates(ancestor, descendant)
            {
                remove[ancestor.index] = true;
            }
        }
    }

    // Second pass over the survivors only, independent of selectors.
    let survivors: Vec<&TextChange> = texts.iter().filter(|t| !remove[t.index]).collect();
    let mut leaf_duplicates = Vec::new();
    for leaf in &survivors {
        for container in &survivors {
            if leaf.index != container.index && contains_leaf_text(container, leaf) {
                leaf_duplicates.push(container.index);
            }
        }
    }
    for index in leaf_duplicates {
        remove[index] = true;
    }

    remove
}

/// The ancestor's texts contain the descendant's on both sides and are
/// strictly longer on at least one.
fn aggregates(ancestor: &TextChange, descendant: &TextChange) -> bool {
    ancestor.old.contains(descendant.old)
        && ancestor.new.contains(descendant.new)
        && (ancestor.old.len() > descendant.old.len() || ancestor.new.len() > descendant.new.len())
}

/// A short leaf text appears inside the container's longer text, on both
/// the old and the new side.
fn contains_leaf_text(container: &TextChange, leaf: &TextChange) -> bool {
    let short_enough = |s: &str| !s.is_empty() && s.chars().count() <= MAX_LEAF_TEXT_CHARS;

    short_enough(leaf.old)
        && short_enough(leaf.new)
        && container.old.len() > leaf.old.len()
        && container.old.contains(leaf.old)
        && container.new.contains(leaf.new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{Classification, RawChange};

    fn text(selector: &str, old: &str, new: &str) -> ChangeRecord {
        let raw = RawChange::new(
            selector,
            "text",
            Some(old.to_string()),
            Some(new.to_string()),
            ChangeType::Text,
            0.3,
        );
        ChangeRecord::classified(raw, Classification::Cosmetic)
    }

    fn selectors(changes: &[ChangeRecord]) -> Vec<&str> {
        changes.iter().map(|c| c.element.as_str()).collect()
    }

    #[test]
    fn test_is_selector_ancestor() {
        assert!(is_selector_ancestor("div.card", "div.card span.price"));
        assert!(is_selector_ancestor("div.card", "div.card>span"));
        assert!(is_selector_ancestor(".item", ".item-wrapper"));
        assert!(!is_selector_ancestor("", "div"));
        assert!(!is_selector_ancestor("div.card span", "div.card"));
    }

    #[test]
    fn test_prunes_card_aggregate() {
        let changes = vec![
            text("div.card", "Price: $10", "Price: $12"),
            text("div.card span.price", "$10", "$12"),
        ];
        let pruned = prune_ancestor_duplicates(changes);
        assert_eq!(selectors(&pruned), vec!["div.card span.price"]);
    }

    #[test]
    fn test_keeps_unrelated_text_changes() {
        let changes = vec![
            text("div.card", "Price: $10", "Price: $12"),
            text("div.card h2", "Old title", "New title"),
        ];
        let pruned = prune_ancestor_duplicates(changes.clone());
        assert_eq!(pruned, changes);
    }

    #[test]
    fn test_nth_indices_ignored_for_ancestry() {
        let changes = vec![
            text("ul > li:nth-of-type(2)", "Item two - $5", "Item two - $6"),
            text("ul > li:nth-of-type(2) b", "$5", "$6"),
        ];
        let pruned = prune_ancestor_duplicates(changes);
        assert_eq!(selectors(&pruned), vec!["ul > li:nth-of-type(2) b"]);
    }

    #[test]
    fn test_leaf_pass_ignores_selectors() {
        let changes = vec![
            text("section.summary", "Total 3 items", "Total 4 items"),
            text("p.count", "3 items", "4 items"),
        ];
        let pruned = prune_ancestor_duplicates(changes);
        assert_eq!(selectors(&pruned), vec!["p.count"]);
    }

    #[test]
    fn test_leaf_pass_skips_long_text() {
        let long_old = "x".repeat(61);
        let long_new = "y".repeat(61);
        let changes = vec![
            text("section.one", &format!("{} tail", long_old), &format!("{} tail", long_new)),
            text("p.two", &long_old, &long_new),
        ];
        let pruned = prune_ancestor_duplicates(changes.clone());
        assert_eq!(pruned.len(), 2);
    }

    #[test]
    fn test_non_text_records_untouched() {
        let structural = ChangeRecord::structural("div.card", "element_removed", None, None);
        let changes = vec![
            structural.clone(),
            text("div.card", "Price: $10", "Price: $12"),
            text("div.card span", "$10", "$12"),
        ];
        let pruned = prune_ancestor_duplicates(changes);
        assert_eq!(pruned.len(), 2);
        assert_eq!(pruned[0], structural);
    }

    #[test]
    fn test_identical_duplicates_both_kept() {
        let changes = vec![text("p", "a b", "a c"), text("p", "a b", "a c")];
        assert_eq!(prune_ancestor_duplicates(changes).len(), 2);
    }

    #[test]
    fn test_prune_is_idempotent_on_chain() {
        let changes = vec![
            text("main", "Cart: Price: $10 total", "Cart: Price: $12 total"),
            text("main div.card", "Price: $10", "Price: $12"),
            text("main div.card span", "$10", "$12"),
        ];
        let once = prune_ancestor_duplicates(changes);
        assert_eq!(selectors(&once), vec!["main div.card span"]);
        let twice = prune_ancestor_duplicates(once.clone());
        assert_eq!(twice, once);
    }
}

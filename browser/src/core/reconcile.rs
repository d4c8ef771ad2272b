//! Page reconciler: merge a page-scoped checkbox event into the selection.
//!
//! Only ids on the current page may change. Decisions recorded for every
//! other id are carried over untouched, which is what keeps selection alive
//! across page changes.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::selection::SelectionState;
use crate::core::types::{Artwork, RecordId};

/// Compute the next selection from the full set of ids checked on this page.
///
/// For each row on `page_rows`: checked ids are added to `selected` and
/// removed from `deselected`; unchecked ids are added to `deselected`, even
/// when they were never selected. Ids in `checked_on_page` that are not on
/// the page are ignored.
pub fn apply_page_selection(
    page_rows: &[Artwork],
    checked_on_page: &BTreeSet<RecordId>,
    prev: &SelectionState,
) -> SelectionState {
    let mut next = prev.clone();

    for row in page_rows {
        if checked_on_page.contains(&row.id) {
            next.selected.insert(row.id);
            next.deselected.remove(&row.id);
        } else {
            next.deselected.insert(row.id);
        }
    }

    debug!(
        page_rows = page_rows.len(),
        checked = checked_on_page.len(),
        effective = next.effective_selected_count(),
        "applied page selection"
    );
    next
}

/// Check the first `n` rows of the page (in page order) and uncheck the rest.
///
/// `n` is clamped to `0..=page_rows.len()`; negative or oversized values are
/// not errors.
pub fn apply_select_first_n_on_page(
    page_rows: &[Artwork],
    n: i64,
    prev: &SelectionState,
) -> SelectionState {
    let capped = clamp_count(n, page_rows.len());
    let checked: BTreeSet<RecordId> = page_rows.iter().take(capped).map(|row| row.id).collect();
    apply_page_selection(page_rows, &checked, prev)
}

fn clamp_count(n: i64, len: usize) -> usize {
    if n <= 0 {
        return 0;
    }
    usize::try_from(n).map_or(len, |n| n.min(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{id_set, page};

    fn ids(rows: &[Artwork]) -> Vec<RecordId> {
        rows.iter().map(|row| row.id).collect()
    }

    #[test]
    fn keeps_prior_ids_outside_page() {
        let prev = SelectionState {
            selected: id_set(&[100]),
            deselected: BTreeSet::new(),
        };

        let next = apply_page_selection(&page(&[1, 2, 3]), &id_set(&[1, 3]), &prev);

        assert!(next.selected.contains(&RecordId(100)));
        assert!(next.selected.contains(&RecordId(1)));
        assert!(next.selected.contains(&RecordId(3)));
        assert!(next.deselected.contains(&RecordId(2)));
    }

    #[test]
    fn checking_first_rows_of_a_fresh_page() {
        let rows = page(&[1, 2, 3]);
        let next = apply_page_selection(&rows, &id_set(&[1, 3]), &SelectionState::new());

        assert_eq!(next.selected, id_set(&[1, 3]));
        assert_eq!(next.deselected, id_set(&[2]));
        assert_eq!(
            ids(&next.selected_rows_on_page(&rows)),
            vec![RecordId(1), RecordId(3)]
        );
    }

    #[test]
    fn selection_survives_navigation_to_another_page() {
        let first = apply_page_selection(
            &page(&[1, 2, 3]),
            &id_set(&[1, 3]),
            &SelectionState::new(),
        );
        let second = apply_page_selection(&page(&[4, 5]), &id_set(&[4]), &first);

        assert!(second.selected.is_superset(&id_set(&[1, 3, 4])));
        assert!(second.deselected.is_superset(&id_set(&[2, 5])));
        assert!(second.is_selected(RecordId(1)));
        assert!(!second.is_selected(RecordId(5)));
    }

    #[test]
    fn rechecking_clears_suppression() {
        let prev = SelectionState {
            selected: id_set(&[1]),
            deselected: id_set(&[1]),
        };
        let next = apply_page_selection(&page(&[1]), &id_set(&[1]), &prev);

        assert!(next.is_selected(RecordId(1)));
        assert!(next.deselected.is_empty());
    }

    #[test]
    fn unchecking_keeps_id_in_selected_but_suppresses_it() {
        let prev = apply_page_selection(&page(&[1, 2]), &id_set(&[1, 2]), &SelectionState::new());
        let next = apply_page_selection(&page(&[1, 2]), &id_set(&[2]), &prev);

        assert!(next.selected.contains(&RecordId(1)));
        assert!(next.deselected.contains(&RecordId(1)));
        assert!(!next.is_selected(RecordId(1)));
        assert_eq!(next.effective_selected_count(), 1);
    }

    #[test]
    fn foreign_checked_ids_are_ignored() {
        let next = apply_page_selection(&page(&[1, 2]), &id_set(&[2, 99]), &SelectionState::new());

        assert!(!next.selected.contains(&RecordId(99)));
        assert!(!next.deselected.contains(&RecordId(99)));
        assert_eq!(next.selected, id_set(&[2]));
    }

    #[test]
    fn empty_page_returns_prior_state() {
        let prev = SelectionState {
            selected: id_set(&[1, 2]),
            deselected: id_set(&[2]),
        };
        assert_eq!(apply_page_selection(&[], &id_set(&[1]), &prev), prev);
    }

    #[test]
    fn revisiting_with_same_checks_is_idempotent() {
        let rows = page(&[1, 2, 3]);
        let checked = id_set(&[2]);
        let once = apply_page_selection(&rows, &checked, &SelectionState::new());
        let elsewhere = apply_page_selection(&page(&[7, 8]), &id_set(&[8]), &once);
        let again = apply_page_selection(&rows, &checked, &elsewhere);

        assert_eq!(apply_page_selection(&rows, &checked, &once), once);
        assert_eq!(again, elsewhere);
    }

    #[test]
    fn select_first_n_caps_at_page_length() {
        let next = apply_select_first_n_on_page(&page(&[1, 2, 3]), 10, &SelectionState::new());

        assert_eq!(next.selected, id_set(&[1, 2, 3]));
        assert!(next.deselected.is_empty());
    }

    #[test]
    fn select_first_n_negative_deselects_whole_page() {
        let next = apply_select_first_n_on_page(&page(&[1, 2, 3]), -5, &SelectionState::new());

        assert!(next.selected.is_empty());
        assert_eq!(next.deselected, id_set(&[1, 2, 3]));
    }

    #[test]
    fn select_first_n_follows_page_order() {
        let rows = page(&[30, 10, 20]);
        let next = apply_select_first_n_on_page(&rows, 2, &SelectionState::new());

        assert_eq!(next.selected, id_set(&[30, 10]));
        assert_eq!(next.deselected, id_set(&[20]));
        assert_eq!(
            ids(&next.selected_rows_on_page(&rows)),
            vec![RecordId(30), RecordId(10)]
        );
    }

    #[test]
    fn select_first_n_preserves_other_pages() {
        let prev = SelectionState {
            selected: id_set(&[50, 51]),
            deselected: id_set(&[51]),
        };
        let next = apply_select_first_n_on_page(&page(&[1, 2]), 1, &prev);

        assert!(next.is_selected(RecordId(50)));
        assert!(!next.is_selected(RecordId(51)));
        assert!(next.is_selected(RecordId(1)));
        assert!(!next.is_selected(RecordId(2)));
    }

    #[test]
    fn clamp_count_handles_extremes() {
        assert_eq!(clamp_count(i64::MIN, 5), 0);
        assert_eq!(clamp_count(0, 5), 0);
        assert_eq!(clamp_count(3, 5), 3);
        assert_eq!(clamp_count(i64::MAX, 5), 5);
        assert_eq!(clamp_count(4, 0), 0);
    }
}

//! Selection store: which catalog records are effectively selected.
//!
//! Only one page of records is ever loaded, so the store cannot enumerate the
//! catalog. It keeps two sets instead:
//!
//! - `selected`: ids the user has checked at some point.
//! - `deselected`: ids seen unchecked on a visited page. Membership here
//!   overrides `selected` until the id is checked again.
//!
//! An id is effectively selected iff it is in `selected` and not in
//! `deselected`. States are values: reconciliation returns a new state rather
//! than mutating the previous one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{Artwork, RecordId};

/// Session-wide selection, replaced wholesale on every reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected: BTreeSet<RecordId>,
    pub deselected: BTreeSet<RecordId>,
}

impl SelectionState {
    /// Empty state: nothing selected, nothing suppressed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        is_selected(id, &self.selected, &self.deselected)
    }

    pub fn selected_rows_on_page(&self, page_rows: &[Artwork]) -> Vec<Artwork> {
        selected_rows_on_page(page_rows, &self.selected, &self.deselected)
    }

    pub fn effective_selected_count(&self) -> usize {
        effective_selected_count(&self.selected, &self.deselected)
    }

    pub fn effective_selected_ids(&self) -> Vec<RecordId> {
        effective_selected_ids(&self.selected, &self.deselected)
    }
}

/// True if `id` is in `selected` and not suppressed by `deselected`.
pub fn is_selected(
    id: RecordId,
    selected: &BTreeSet<RecordId>,
    deselected: &BTreeSet<RecordId>,
) -> bool {
    selected.contains(&id) && !deselected.contains(&id)
}

/// Rows of the current page that should render as checked, in page order.
pub fn selected_rows_on_page(
    page_rows: &[Artwork],
    selected: &BTreeSet<RecordId>,
    deselected: &BTreeSet<RecordId>,
) -> Vec<Artwork> {
    page_rows
        .iter()
        .filter(|row| is_selected(row.id, selected, deselected))
        .cloned()
        .collect()
}

/// Number of ids in `selected` that are not suppressed.
///
/// Ids the user never checked are not counted, so this is a count over
/// recorded decisions, not over the whole catalog.
pub fn effective_selected_count(
    selected: &BTreeSet<RecordId>,
    deselected: &BTreeSet<RecordId>,
) -> usize {
    selected.difference(deselected).count()
}

/// Effectively selected ids in ascending order.
pub fn effective_selected_ids(
    selected: &BTreeSet<RecordId>,
    deselected: &BTreeSet<RecordId>,
) -> Vec<RecordId> {
    selected.difference(deselected).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{id_set, page};

    #[test]
    fn is_selected_requires_selected_and_not_deselected() {
        let selected = id_set(&[1, 2]);
        let deselected = id_set(&[2]);

        assert!(is_selected(RecordId(1), &selected, &deselected));
        assert!(!is_selected(RecordId(2), &selected, &deselected));
        assert!(!is_selected(RecordId(3), &selected, &deselected));
    }

    #[test]
    fn deselected_only_id_is_not_selected() {
        let state = SelectionState {
            selected: BTreeSet::new(),
            deselected: id_set(&[7]),
        };
        assert!(!state.is_selected(RecordId(7)));
    }

    #[test]
    fn selected_rows_keep_page_order_and_ignore_foreign_ids() {
        let rows = page(&[3, 1, 2]);
        let selected = id_set(&[1, 3, 42]);
        let deselected = BTreeSet::new();

        let checked: Vec<RecordId> = selected_rows_on_page(&rows, &selected, &deselected)
            .iter()
            .map(|row| row.id)
            .collect();
        assert_eq!(checked, vec![RecordId(3), RecordId(1)]);
    }

    #[test]
    fn selected_rows_on_empty_page_is_empty() {
        let state = SelectionState {
            selected: id_set(&[1]),
            deselected: BTreeSet::new(),
        };
        assert!(state.selected_rows_on_page(&[]).is_empty());
    }

    #[test]
    fn effective_count_subtracts_suppressed_ids() {
        let selected = id_set(&[1, 2, 3, 4]);
        let deselected = id_set(&[2, 4, 9]);

        assert_eq!(effective_selected_count(&selected, &deselected), 2);
        assert_eq!(
            effective_selected_ids(&selected, &deselected),
            vec![RecordId(1), RecordId(3)]
        );
    }

    #[test]
    fn new_state_selects_nothing() {
        let state = SelectionState::new();
        assert_eq!(state.effective_selected_count(), 0);
        assert!(state.effective_selected_ids().is_empty());
    }
}

//! Per-page checkbox state derived from a [`SelectionState`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::RowId;
use crate::selection::SelectionState;

/// State of the "whole page" checkbox in a table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckboxState {
    Checked,
    Indeterminate,
    Unchecked,
}

impl fmt::Display for CheckboxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckboxState::Checked => write!(f, "checked"),
            CheckboxState::Indeterminate => write!(f, "indeterminate"),
            CheckboxState::Unchecked => write!(f, "unchecked"),
        }
    }
}

/// Classify a page: checked if every id is selected, unchecked if none are
/// (or the page is empty), indeterminate otherwise.
pub fn page_checkbox_state(page_ids: &[RowId], state: &SelectionState) -> CheckboxState {
    let selected = page_ids.iter().filter(|id| state.is_selected(id)).count();
    if selected == 0 {
        CheckboxState::Unchecked
    } else if selected == page_ids.len() {
        CheckboxState::Checked
    } else {
        CheckboxState::Indeterminate
    }
}

/// The page of rows a table is currently showing, plus the server total for
/// the active filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    ids: Vec<RowId>,
    total: u64,
}

impl PageView {
    pub fn new(ids: Vec<RowId>, total: u64) -> Self {
        Self { ids, total }
    }

    pub fn ids(&self) -> &[RowId] {
        &self.ids
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn checkbox_state(&self, state: &SelectionState) -> CheckboxState {
        page_checkbox_state(&self.ids, state)
    }

    pub fn selected_on_page(&self, state: &SelectionState) -> usize {
        self.ids.iter().filter(|id| state.is_selected(id)).count()
    }

    /// Header checkbox click: a fully checked page is cleared, anything else
    /// is filled.
    pub fn toggle_page(&self, state: &mut SelectionState) -> CheckboxState {
        if self.checkbox_state(state) == CheckboxState::Checked {
            state.deselect_page(&self.ids);
        } else {
            state.select_page(&self.ids);
        }
        self.checkbox_state(state)
    }

    /// Whether to show the "select all N matching rows" prompt.
    pub fn offer_select_all(&self, state: &SelectionState) -> bool {
        !state.is_select_all()
            && self.total > self.ids.len() as u64
            && self.checkbox_state(state) == CheckboxState::Checked
    }
}

//! Exclusion-aware row selection over a server-paginated collection.
//!
//! A table can hold two kinds of selection:
//!
//! - **Explicit**: the user ticked individual rows, possibly across several
//!   pages. The ticked ids live in `selected`.
//! - **All with exclusions**: the user chose "select all rows matching the
//!   filter". The matching set is never materialized; only the rows the user
//!   unticked afterwards are stored, in `excluded`.
//!
//! Exactly one of the two id sets is meaningful at a time, gated by
//! `select_all`. The other is always empty.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectionError};
use crate::filters::ActiveFilters;
use crate::id::RowId;
use crate::id_set::IdSet;
use crate::request::BulkRequest;
use crate::sync::MutationTicket;

/// Default page size for a freshly mounted table.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Which of the three selection shapes a [`SelectionState`] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Nothing selected
    Empty,
    /// Some rows explicitly ticked
    PartialExplicit,
    /// Every matching row except the excluded ones
    AllWithExclusions,
}

/// Selection state owned by one table instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    selected: IdSet,
    select_all: bool,
    excluded: IdSet,
    per_page: u32,
    filters: ActiveFilters,
    generation: u64,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl SelectionState {
    /// Create an empty selection for a table showing `per_page` rows.
    pub fn new(per_page: u32) -> Self {
        Self {
            selected: IdSet::new(),
            select_all: false,
            excluded: IdSet::new(),
            per_page,
            filters: ActiveFilters::new(),
            generation: 0,
        }
    }

    /// Create an empty selection scoped to `filters`.
    pub fn with_filters(per_page: u32, filters: ActiveFilters) -> Self {
        Self {
            filters,
            ..Self::new(per_page)
        }
    }

    /// Include one row.
    ///
    /// In select-all mode this re-includes a previously excluded row.
    pub fn select_one(&mut self, id: RowId) {
        let changed = if self.select_all {
            self.excluded.remove(&id)
        } else {
            self.selected.insert(id)
        };
        if changed {
            self.generation += 1;
        }
        self.debug_check();
    }

    /// Exclude one row.
    ///
    /// In select-all mode this records the row as an exception.
    pub fn deselect_one(&mut self, id: RowId) {
        let changed = if self.select_all {
            self.excluded.insert(id)
        } else {
            self.selected.remove(&id)
        };
        if changed {
            self.generation += 1;
        }
        self.debug_check();
    }

    /// Flip one row's membership. Returns the new membership.
    pub fn toggle_one(&mut self, id: RowId) -> bool {
        if self.is_selected(&id) {
            self.deselect_one(id);
            false
        } else {
            self.select_one(id);
            true
        }
    }

    /// Include every id on a page.
    pub fn select_page<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a RowId>,
    {
        for id in ids {
            self.select_one(id.clone());
        }
    }

    /// Exclude every id on a page.
    pub fn deselect_page<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a RowId>,
    {
        for id in ids {
            self.deselect_one(id.clone());
        }
    }

    /// Select every row matching the current filters.
    pub fn select_all_matching(&mut self) {
        self.select_all = true;
        self.selected.clear();
        self.excluded.clear();
        self.generation += 1;
        tracing::debug!(generation = self.generation, "selection switched to select-all");
    }

    /// Reset to the empty, explicit state.
    pub fn deselect_all(&mut self) {
        self.select_all = false;
        self.selected.clear();
        self.excluded.clear();
        self.generation += 1;
        tracing::debug!(generation = self.generation, "selection cleared");
    }

    /// Replace the filter scope.
    ///
    /// A selection never survives a change of filters: if `filters` differs
    /// from the current scope the selection is cleared. Returns true when a
    /// reset happened.
    pub fn apply_filters(&mut self, filters: ActiveFilters) -> bool {
        if filters == self.filters {
            return false;
        }
        tracing::debug!(
            had_select_all = self.select_all,
            excluded = self.excluded.len(),
            selected = self.selected.len(),
            "filters changed, dropping selection"
        );
        self.filters = filters;
        self.deselect_all();
        true
    }

    /// Record the page size. The selection itself is kept.
    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page;
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        if self.select_all {
            !self.excluded.contains(id)
        } else {
            self.selected.contains(id)
        }
    }

    /// Number of rows the selection covers, given the server-reported total
    /// for the current filters.
    pub fn effective_count(&self, total_matching: u64) -> u64 {
        if self.select_all {
            total_matching.saturating_sub(self.excluded.len() as u64)
        } else {
            self.selected.len() as u64
        }
    }

    pub fn mode(&self) -> SelectionMode {
        if self.select_all {
            SelectionMode::AllWithExclusions
        } else if self.selected.is_empty() {
            SelectionMode::Empty
        } else {
            SelectionMode::PartialExplicit
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mode() == SelectionMode::Empty
    }

    pub fn is_select_all(&self) -> bool {
        self.select_all
    }

    /// Explicitly selected ids. Always empty in select-all mode.
    pub fn selected(&self) -> &IdSet {
        &self.selected
    }

    /// Ids excluded from select-all. Always empty outside select-all mode.
    pub fn excluded(&self) -> &IdSet {
        &self.excluded
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn filters(&self) -> &ActiveFilters {
        &self.filters
    }

    /// Counter bumped on every reset and every effective membership change;
    /// used to discard late mutation results.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Verify that at most one of the id sets is populated and that it is the
    /// one `select_all` says is active.
    pub fn check_invariants(&self) -> Result<()> {
        let stray = if self.select_all {
            !self.selected.is_empty()
        } else {
            !self.excluded.is_empty()
        };
        if stray {
            return Err(SelectionError::InconsistentSelectionState {
                selected: self.selected.len(),
                excluded: self.excluded.len(),
            });
        }
        Ok(())
    }

    fn debug_check(&self) {
        debug_assert!(
            self.check_invariants().is_ok(),
            "selection invariant broken: {:?}",
            self
        );
    }

    /// Stamp an outgoing bulk request with the current generation.
    pub fn begin_mutation(&self, request: &BulkRequest) -> MutationTicket {
        MutationTicket::new(self.generation, request.action.kind())
    }

    /// Accept the result of a finished mutation.
    ///
    /// Fails with [`SelectionError::StaleMutation`] if the selection has been
    /// reset or edited since the ticket was issued; the caller must then ignore the
    /// result. Otherwise clears the selection when `reset` is set.
    pub fn complete_mutation(&mut self, ticket: MutationTicket, reset: bool) -> Result<()> {
        if ticket.generation != self.generation {
            tracing::warn!(
                ticket = ticket.generation,
                current = self.generation,
                kind = %ticket.kind,
                "discarding stale mutation result"
            );
            return Err(SelectionError::StaleMutation {
                ticket: ticket.generation,
                current: self.generation,
            });
        }
        tracing::debug!(kind = %ticket.kind, reset, "mutation acknowledged");
        if reset {
            self.deselect_all();
        }
        Ok(())
    }
}

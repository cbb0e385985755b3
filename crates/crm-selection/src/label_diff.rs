//! Minimal add/remove deltas between two label sets.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::id::RowId;
use crate::id_set::IdSet;
use crate::request::{BulkAction, BulkRequest, BulkRequestBuilder};
use crate::selection::SelectionState;

/// Label ids share the canonical row id representation.
pub type LabelId = RowId;

/// Labels to add and remove to move rows from one label set to another.
///
/// `added` never overlaps the previous set, `removed` is always a subset of
/// it, and the two never share an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDiff {
    pub added: Vec<LabelId>,
    pub removed: Vec<LabelId>,
}

impl LabelDiff {
    /// Compute the delta from `previous` to `next`.
    ///
    /// `next` is the authoritative new state: an empty `next` removes every
    /// previous label. Duplicates in either input are ignored.
    pub fn between(previous: &[LabelId], next: &[LabelId]) -> Self {
        let prev: IdSet = previous.iter().collect();
        let next: IdSet = next.iter().collect();
        Self {
            added: next.difference(&prev),
            removed: prev.difference(&next),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Apply the delta to a label set: `(previous \ removed) ∪ added`.
    pub fn apply(&self, previous: &[LabelId]) -> IdSet {
        let mut out: IdSet = previous.iter().collect();
        for id in &self.removed {
            out.remove(id);
        }
        out.extend(self.added.iter().cloned());
        out
    }

    /// Turn the delta into a label-assignment request addressed at whatever
    /// `state` currently selects, checked against `builder`'s id keys.
    pub fn apply_to_targets(
        &self,
        builder: &BulkRequestBuilder,
        state: &SelectionState,
    ) -> Result<BulkRequest> {
        builder.build(
            BulkAction::AssignLabels(self.clone()),
            state,
            Default::default(),
        )
    }
}

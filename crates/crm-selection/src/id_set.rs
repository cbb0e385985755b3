//! Hash-backed identifier set.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::id::RowId;

/// A set of row ids with O(1) membership.
///
/// Iteration order of the backing set is unspecified, so [`IdSet::to_vec`]
/// returns ids sorted to keep request payloads deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSet {
    ids: HashSet<RowId>,
}

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Returns true if it was not already present.
    pub fn insert(&mut self, id: RowId) -> bool {
        self.ids.insert(id)
    }

    /// Remove an id. Returns true if it was present.
    pub fn remove(&mut self, id: &RowId) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.ids.iter()
    }

    /// Ids in sorted order.
    pub fn to_vec(&self) -> Vec<RowId> {
        let mut out: Vec<RowId> = self.ids.iter().cloned().collect();
        out.sort();
        out
    }

    /// Ids present in `self` but not in `other`, sorted.
    pub fn difference(&self, other: &IdSet) -> Vec<RowId> {
        let mut out: Vec<RowId> = self.ids.difference(&other.ids).cloned().collect();
        out.sort();
        out
    }

    pub fn is_disjoint(&self, other: &IdSet) -> bool {
        self.ids.is_disjoint(&other.ids)
    }
}

impl FromIterator<RowId> for IdSet {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<RowId> for IdSet {
    fn extend<I: IntoIterator<Item = RowId>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl<'a> FromIterator<&'a RowId> for IdSet {
    fn from_iter<I: IntoIterator<Item = &'a RowId>>(iter: I) -> Self {
        iter.into_iter().cloned().collect()
    }
}

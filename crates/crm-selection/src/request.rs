//! Bulk request payloads.
//!
//! A request addresses either an explicit list of row ids or "every row
//! matching these filters except these ids". The two shapes never appear in
//! the same payload.
//!
//! ```text
//! { "client_ids": ["55", "56"], "add_label_ids": ["7"] }
//! { "select_all": true, "non_client_ids": ["101"], "per_page": 10, "q": "acme" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SelectionError};
use crate::filters::ActiveFilters;
use crate::id::RowId;
use crate::label_diff::LabelDiff;
use crate::resource::{IdFieldNames, TargetResource};
use crate::selection::SelectionState;

pub const SELECT_ALL_KEY: &str = "select_all";
pub const PER_PAGE_KEY: &str = "per_page";
pub const ADD_LABELS_KEY: &str = "add_label_ids";
pub const REMOVE_LABELS_KEY: &str = "remove_label_ids";
pub const ASSIGN_AGENTS_KEY: &str = "assign_agent_ids";
pub const ASSIGN_TEAMS_KEY: &str = "assign_team_ids";

/// What a bulk request does, without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkActionKind {
    Delete,
    AssignLabels,
    Reassign,
}

impl fmt::Display for BulkActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkActionKind::Delete => write!(f, "delete"),
            BulkActionKind::AssignLabels => write!(f, "assign_labels"),
            BulkActionKind::Reassign => write!(f, "reassign"),
        }
    }
}

/// The mutation to apply to the selected rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Delete,
    AssignLabels(LabelDiff),
    Reassign {
        agent_ids: Vec<RowId>,
        team_ids: Vec<RowId>,
    },
}

impl BulkAction {
    pub fn kind(&self) -> BulkActionKind {
        match self {
            BulkAction::Delete => BulkActionKind::Delete,
            BulkAction::AssignLabels(_) => BulkActionKind::AssignLabels,
            BulkAction::Reassign { .. } => BulkActionKind::Reassign,
        }
    }
}

/// Which rows a request addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestTarget {
    /// Exactly these rows
    Explicit(Vec<RowId>),
    /// Every row matching `filters` except `excluded`
    AllExcept {
        excluded: Vec<RowId>,
        filters: ActiveFilters,
        per_page: u32,
    },
}

/// A fully assembled bulk mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkRequest {
    pub target: RequestTarget,
    pub action: BulkAction,
    /// Caller-supplied fields passed through unchanged
    pub extra: BTreeMap<String, Value>,
}

impl BulkRequest {
    /// True when sending the request could not change anything.
    pub fn is_noop(&self) -> bool {
        let no_rows = matches!(&self.target, RequestTarget::Explicit(ids) if ids.is_empty());
        let no_change = match &self.action {
            BulkAction::AssignLabels(diff) => diff.is_empty(),
            BulkAction::Reassign {
                agent_ids,
                team_ids,
            } => agent_ids.is_empty() && team_ids.is_empty(),
            BulkAction::Delete => false,
        };
        no_rows || no_change
    }

    /// Render the wire payload.
    ///
    /// Filters are copied verbatim, and a `per_page` filter replaces the
    /// selection's own page size. Empty label and reassignment lists are
    /// omitted. Any other key written twice (an extra field shadowing an id
    /// key, a filter named `select_all`, ...) is rejected as
    /// [`SelectionError::MixedPayloadShape`].
    pub fn to_json(&self, fields: &IdFieldNames) -> Result<Value> {
        let mut out = Map::new();

        match &self.target {
            RequestTarget::Explicit(ids) => {
                put(&mut out, &fields.include, ids_value(ids))?;
            }
            RequestTarget::AllExcept {
                excluded,
                filters,
                per_page,
            } => {
                put(&mut out, SELECT_ALL_KEY, Value::Bool(true))?;
                put(&mut out, &fields.exclude, ids_value(excluded))?;
                if !filters.contains_key(PER_PAGE_KEY) {
                    put(&mut out, PER_PAGE_KEY, Value::from(*per_page))?;
                }
                for (key, value) in filters.iter() {
                    put(&mut out, key, value.clone())?;
                }
            }
        }

        match &self.action {
            BulkAction::Delete => {}
            BulkAction::AssignLabels(diff) => {
                put_non_empty(&mut out, ADD_LABELS_KEY, &diff.added)?;
                put_non_empty(&mut out, REMOVE_LABELS_KEY, &diff.removed)?;
            }
            BulkAction::Reassign {
                agent_ids,
                team_ids,
            } => {
                put_non_empty(&mut out, ASSIGN_AGENTS_KEY, agent_ids)?;
                put_non_empty(&mut out, ASSIGN_TEAMS_KEY, team_ids)?;
            }
        }

        for (key, value) in &self.extra {
            put(&mut out, key, value.clone())?;
        }

        // Id keys are configurable, so check the two shapes never meet.
        if out.contains_key(SELECT_ALL_KEY) && out.contains_key(&fields.include) {
            return Err(SelectionError::MixedPayloadShape(format!(
                "payload carries both {} and {}",
                fields.include, SELECT_ALL_KEY
            )));
        }

        Ok(Value::Object(out))
    }
}

fn ids_value(ids: &[RowId]) -> Value {
    Value::Array(ids.iter().map(|id| Value::String(id.to_string())).collect())
}

fn put(out: &mut Map<String, Value>, key: &str, value: Value) -> Result<()> {
    if out.contains_key(key) {
        return Err(SelectionError::MixedPayloadShape(format!(
            "key {:?} set more than once",
            key
        )));
    }
    out.insert(key.to_string(), value);
    Ok(())
}

fn put_non_empty(out: &mut Map<String, Value>, key: &str, ids: &[RowId]) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }
    put(out, key, ids_value(ids))
}

/// Assembles [`BulkRequest`]s for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkRequestBuilder {
    fields: IdFieldNames,
}

impl BulkRequestBuilder {
    pub fn new(fields: IdFieldNames) -> Self {
        Self { fields }
    }

    pub fn for_resource(resource: TargetResource) -> Self {
        Self::new(resource.id_fields())
    }

    pub fn fields(&self) -> &IdFieldNames {
        &self.fields
    }

    /// Build a request addressed at the rows `state` selects.
    ///
    /// Fails if the state is inconsistent or if the resulting payload would
    /// mix the explicit and select-all shapes.
    pub fn build(
        &self,
        action: BulkAction,
        state: &SelectionState,
        extra: BTreeMap<String, Value>,
    ) -> Result<BulkRequest> {
        state.check_invariants()?;

        let target = if state.is_select_all() {
            RequestTarget::AllExcept {
                excluded: state.excluded().to_vec(),
                filters: state.filters().clone(),
                per_page: state.per_page(),
            }
        } else {
            RequestTarget::Explicit(state.selected().to_vec())
        };

        let request = BulkRequest {
            target,
            action,
            extra,
        };
        request.to_json(&self.fields)?;

        tracing::debug!(
            kind = %request.action.kind(),
            select_all = state.is_select_all(),
            "built bulk request"
        );
        Ok(request)
    }

    /// Build and render in one step.
    pub fn build_json(
        &self,
        action: BulkAction,
        state: &SelectionState,
        extra: BTreeMap<String, Value>,
    ) -> Result<Value> {
        self.build(action, state, extra)?.to_json(&self.fields)
    }
}

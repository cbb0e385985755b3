//! Gesture scripts.
//!
//! A script is a JSON array of steps applied in order to an empty selection,
//! ending with the bulk action to build:
//!
//! ```json
//! [
//!   {"filters": {"q": "acme"}},
//!   {"select_all": true},
//!   {"deselect": [101, "142"]},
//!   {"action": {"labels": {"previous": [3], "next": [7]}}}
//! ]
//! ```

use std::collections::BTreeMap;

use crm_selection::{
    ActiveFilters, BulkAction, BulkRequest, BulkRequestBuilder, LabelDiff, RowId,
    SelectionConfig, SelectionError, SelectionState,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Script loading and replay errors
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Malformed script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Script must end with exactly one action step")]
    MissingAction,

    #[error("Step {index}: {source}")]
    Step {
        index: usize,
        #[source]
        source: SelectionError,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Select(Vec<Value>),
    Deselect(Vec<Value>),
    SelectAll(bool),
    Clear(bool),
    Filters(Value),
    PerPage(u32),
    Action(ActionSpec),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSpec {
    Delete,
    Labels {
        #[serde(default)]
        previous: Vec<Value>,
        #[serde(default)]
        next: Vec<Value>,
    },
    Reassign {
        #[serde(default)]
        agent_ids: Vec<Value>,
        #[serde(default)]
        team_ids: Vec<Value>,
    },
}

impl ActionSpec {
    fn to_action(&self) -> Result<BulkAction, SelectionError> {
        Ok(match self {
            ActionSpec::Delete => BulkAction::Delete,
            ActionSpec::Labels { previous, next } => BulkAction::AssignLabels(LabelDiff::between(
                &RowId::from_json_list(previous)?,
                &RowId::from_json_list(next)?,
            )),
            ActionSpec::Reassign {
                agent_ids,
                team_ids,
            } => BulkAction::Reassign {
                agent_ids: RowId::from_json_list(agent_ids)?,
                team_ids: RowId::from_json_list(team_ids)?,
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        let steps: Vec<Step> = serde_json::from_str(text)?;
        let actions = steps
            .iter()
            .filter(|s| matches!(s, Step::Action(_)))
            .count();
        if actions != 1 || !matches!(steps.last(), Some(Step::Action(_))) {
            return Err(ScriptError::MissingAction);
        }
        Ok(Self { steps })
    }
}

/// Final selection and the request built from it.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub state: SelectionState,
    pub request: BulkRequest,
}

pub fn replay(script: &Script, config: &SelectionConfig) -> Result<ReplayOutcome, ScriptError> {
    let builder = BulkRequestBuilder::new(config.id_fields.clone());
    let mut state = SelectionState::new(config.default_per_page);
    let mut request = None;

    for (index, step) in script.steps.iter().enumerate() {
        let at = |source| ScriptError::Step { index, source };
        tracing::debug!(index, ?step, "applying step");
        match step {
            Step::Select(ids) => {
                let ids = RowId::from_json_list(ids).map_err(at)?;
                state.select_page(&ids);
            }
            Step::Deselect(ids) => {
                let ids = RowId::from_json_list(ids).map_err(at)?;
                state.deselect_page(&ids);
            }
            Step::SelectAll(true) => state.select_all_matching(),
            Step::SelectAll(false) | Step::Clear(true) => state.deselect_all(),
            Step::Clear(false) => {}
            Step::Filters(filters) => {
                state.apply_filters(ActiveFilters::from_json(filters));
            }
            Step::PerPage(per_page) => state.set_per_page(*per_page),
            Step::Action(spec) => {
                let action = spec.to_action().map_err(at)?;
                request = Some(
                    builder
                        .build(action, &state, BTreeMap::new())
                        .map_err(at)?,
                );
            }
        }
    }

    let request = request.ok_or(ScriptError::MissingAction)?;
    Ok(ReplayOutcome { state, request })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_selection::TargetResource;
    use rstest::rstest;
    use serde_json::json;

    fn run(text: &str) -> Result<Value, ScriptError> {
        let config = SelectionConfig::default();
        let outcome = replay(&Script::from_json(text)?, &config)?;
        Ok(outcome.request.to_json(&config.id_fields).unwrap())
    }

    #[test]
    fn select_all_label_script() {
        let payload = run(
            r#"[
                {"filters": {"q": "acme"}},
                {"select_all": true},
                {"deselect": [101, "142"]},
                {"action": {"labels": {"previous": [3], "next": [7]}}}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            payload,
            json!({
                "select_all": true,
                "non_client_ids": ["101", "142"],
                "per_page": 10,
                "q": "acme",
                "add_label_ids": ["7"],
                "remove_label_ids": ["3"],
            })
        );
    }

    #[test]
    fn filter_change_drops_earlier_picks() {
        let payload = run(
            r#"[
                {"select": [1, 2]},
                {"filters": {"q": "b"}},
                {"select": [3]},
                {"action": "delete"}
            ]"#,
        )
        .unwrap();
        assert_eq!(payload, json!({"client_ids": ["3"]}));
    }

    #[test]
    fn reassign_with_resource_keys() {
        let config = SelectionConfig::for_resource(TargetResource::IbRequests);
        let script = Script::from_json(
            r#"[{"select": [4]}, {"action": {"reassign": {"agent_ids": [9]}}}]"#,
        )
        .unwrap();
        let outcome = replay(&script, &config).unwrap();
        assert_eq!(
            outcome.request.to_json(&config.id_fields).unwrap(),
            json!({"request_ids": ["4"], "assign_agent_ids": ["9"]})
        );
    }

    #[rstest]
    #[case("[]")]
    #[case(r#"[{"select": [1]}]"#)]
    #[case(r#"[{"action": "delete"}, {"select": [1]}]"#)]
    #[case(r#"[{"action": "delete"}, {"action": "delete"}]"#)]
    fn scripts_need_one_trailing_action(#[case] text: &str) {
        assert!(matches!(
            Script::from_json(text),
            Err(ScriptError::MissingAction)
        ));
    }

    #[test]
    fn null_id_reports_step() {
        let err = run(r#"[{"select": [1, null]}, {"action": "delete"}]"#).unwrap_err();
        match err {
            ScriptError::Step { index, source } => {
                assert_eq!(index, 0);
                assert!(matches!(source, SelectionError::InvalidIdentifier(_)));
            }
            other => panic!("Expected step error, got {other}"),
        }
    }
}

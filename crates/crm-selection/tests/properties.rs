//! Property-based tests for selection and label diffing.

use std::collections::{HashMap, HashSet};

use crm_selection::{page_checkbox_state, CheckboxState, IdSet, LabelDiff, RowId, SelectionState};
use proptest::prelude::*;

fn row(n: u16) -> RowId {
    RowId::from(n as u32)
}

fn rows(raw: &[u16]) -> Vec<RowId> {
    raw.iter().map(|&n| row(n)).collect()
}

#[derive(Debug, Clone)]
enum Gesture {
    Select(u16),
    Deselect(u16),
    SelectPage(Vec<u16>),
    DeselectPage(Vec<u16>),
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        (0u16..30).prop_map(Gesture::Select),
        (0u16..30).prop_map(Gesture::Deselect),
        prop::collection::vec(0u16..30, 0..8).prop_map(Gesture::SelectPage),
        prop::collection::vec(0u16..30, 0..8).prop_map(Gesture::DeselectPage),
    ]
}

/// Replay gestures and record the last call that touched each id.
fn replay(state: &mut SelectionState, gestures: &[Gesture]) -> HashMap<u16, bool> {
    let mut last = HashMap::new();
    for g in gestures {
        match g {
            Gesture::Select(n) => {
                state.select_one(row(*n));
                last.insert(*n, true);
            }
            Gesture::Deselect(n) => {
                state.deselect_one(row(*n));
                last.insert(*n, false);
            }
            Gesture::SelectPage(page) => {
                state.select_page(&rows(page));
                for n in page {
                    last.insert(*n, true);
                }
            }
            Gesture::DeselectPage(page) => {
                state.deselect_page(&rows(page));
                for n in page {
                    last.insert(*n, false);
                }
            }
        }
    }
    last
}

proptest! {
    #[test]
    fn explicit_membership_follows_last_gesture(gestures in prop::collection::vec(gesture(), 0..60)) {
        let mut state = SelectionState::default();
        let last = replay(&mut state, &gestures);
        for n in 0u16..30 {
            let expected = last.get(&n).copied().unwrap_or(false);
            prop_assert_eq!(state.is_selected(&row(n)), expected);
        }
        prop_assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn select_all_membership_follows_last_gesture(gestures in prop::collection::vec(gesture(), 0..60)) {
        let mut state = SelectionState::default();
        state.select_all_matching();
        let last = replay(&mut state, &gestures);
        for n in 0u16..30 {
            let expected = last.get(&n).copied().unwrap_or(true);
            prop_assert_eq!(state.is_selected(&row(n)), expected);
        }
        prop_assert!(state.selected().is_empty());
    }

    #[test]
    fn excluding_k_ids_from_select_all(excluded in prop::collection::hash_set(0u16..1000, 0..50), extra in 0u64..10_000) {
        let total = 1000 + extra;
        let mut state = SelectionState::default();
        state.select_all_matching();
        for n in &excluded {
            state.deselect_one(row(*n));
        }
        prop_assert_eq!(state.effective_count(total), total - excluded.len() as u64);
    }

    #[test]
    fn diff_reconstructs_next(
        prev in prop::collection::vec(0u16..20, 0..15),
        next in prop::collection::vec(0u16..20, 0..15),
    ) {
        let prev = rows(&prev);
        let next = rows(&next);
        let diff = LabelDiff::between(&prev, &next);

        let added: HashSet<_> = diff.added.iter().cloned().collect();
        let removed: HashSet<_> = diff.removed.iter().cloned().collect();
        prop_assert!(added.is_disjoint(&removed));

        let prev_set: IdSet = prev.iter().collect();
        prop_assert!(diff.added.iter().all(|id| !prev_set.contains(id)));
        prop_assert!(diff.removed.iter().all(|id| prev_set.contains(id)));

        prop_assert_eq!(diff.apply(&prev), next.iter().collect::<IdSet>());
    }

    #[test]
    fn diff_of_identical_sets_is_empty(labels in prop::collection::vec(0u16..20, 0..15)) {
        let labels = rows(&labels);
        prop_assert!(LabelDiff::between(&labels, &labels).is_empty());
    }

    #[test]
    fn checkbox_state_classifies_pages(
        size in prop::sample::select(vec![1usize, 10, 200]),
        seed in prop::collection::vec(any::<bool>(), 200),
        select_all in any::<bool>(),
    ) {
        let page: Vec<RowId> = (0..size as u32).map(RowId::from).collect();
        let mut state = SelectionState::default();
        if select_all {
            state.select_all_matching();
        }
        let mut chosen = 0;
        for (id, &pick) in page.iter().zip(seed.iter()) {
            if pick {
                state.select_one(id.clone());
                chosen += 1;
            } else {
                state.deselect_one(id.clone());
            }
        }

        let expected = if chosen == 0 {
            CheckboxState::Unchecked
        } else if chosen == size {
            CheckboxState::Checked
        } else {
            CheckboxState::Indeterminate
        };
        prop_assert_eq!(page_checkbox_state(&page, &state), expected);
    }
}

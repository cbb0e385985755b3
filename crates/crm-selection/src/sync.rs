//! Completion tracking for in-flight bulk mutations.
//!
//! A table must not refetch on a timer after sending a bulk mutation. It
//! waits for the mutation call itself to finish, hands the ticket back to its
//! [`SelectionState`](crate::SelectionState) (which rejects results from a
//! selection that has since been reset), and, if the backend is eventually
//! consistent, polls a read-your-write check with [`await_consistent`].

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::config::ConsistencyPolicy;
use crate::request::BulkActionKind;

/// Issued when a bulk mutation is sent; identifies the selection generation
/// it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationTicket {
    pub generation: u64,
    pub kind: BulkActionKind,
}

impl MutationTicket {
    pub fn new(generation: u64, kind: BulkActionKind) -> Self {
        Self { generation, kind }
    }
}

/// How a read-your-write wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The check passed on the given attempt
    Consistent { attempts: u32 },
    /// Every attempt failed; the caller should refetch anyway and surface
    /// possibly stale data
    GaveUp { attempts: u32 },
}

impl SyncOutcome {
    pub fn is_consistent(&self) -> bool {
        matches!(self, SyncOutcome::Consistent { .. })
    }
}

/// Poll `check` until it reports that the mutation is visible.
///
/// Sleeps between attempts with exponential backoff from `policy`. An error
/// from `check` ends the wait immediately.
pub async fn await_consistent<F, Fut, E>(
    policy: &ConsistencyPolicy,
    mut check: F,
) -> Result<SyncOutcome, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        if check().await? {
            tracing::info!(attempts = attempt, "bulk mutation visible");
            return Ok(SyncOutcome::Consistent { attempts: attempt });
        }
        if attempt < max_attempts {
            let delay = policy.backoff(attempt);
            tracing::warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                "bulk mutation not visible yet, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    tracing::warn!(attempts = max_attempts, "gave up waiting for bulk mutation");
    Ok(SyncOutcome::GaveUp {
        attempts: max_attempts,
    })
}

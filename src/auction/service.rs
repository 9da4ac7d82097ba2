use std::sync::Arc;

use tokio::sync::Mutex;

use super::state::{now_secs, AuctionState, BidOutcome, ResultOutcome, Role, StateSnapshot};
use crate::replication::replicator::ReplicationSink;

/// The RPC-facing auction component.
///
/// Holds the node's single `AuctionState` behind one lock. The lock covers
/// only the read/compute/write on the state, never a network call:
/// replication is handed to the sink after the lock is released and is never
/// awaited, so a slow or dead backup cannot delay a caller's answer.
pub struct AuctionService {
    state: Mutex<AuctionState>,
    sink: Arc<dyn ReplicationSink>,
    role: Role,
}

impl AuctionService {
    pub fn new(role: Role, sink: Arc<dyn ReplicationSink>) -> Self {
        Self {
            state: Mutex::new(AuctionState::new(role)),
            sink,
            role,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Places a bid against the current round.
    pub async fn place_bid(&self, user_id: &str, amount: i64) -> BidOutcome {
        self.place_bid_at(user_id, amount, now_secs()).await
    }

    pub(crate) async fn place_bid_at(&self, user_id: &str, amount: i64, now: u64) -> BidOutcome {
        let (outcome, snapshot) = {
            let mut state = self.state.lock().await;
            let outcome = state.place_bid(user_id, amount, now);
            let snapshot = if outcome.is_accepted() && self.role == Role::Active {
                Some(state.snapshot())
            } else {
                None
            };
            (outcome, snapshot)
        };

        match &outcome {
            BidOutcome::Accepted { .. } => {
                tracing::info!("Accepted bid {} from user {}", amount, user_id);
            }
            BidOutcome::Rejected { message } => {
                tracing::debug!("Rejected bid {} from user {}: {}", amount, user_id, message);
            }
        }

        if let Some(snapshot) = snapshot {
            self.sink.push(snapshot);
        }

        outcome
    }

    /// Answers a result query for the current or concluded round.
    pub async fn result(&self) -> ResultOutcome {
        self.result_at(now_secs()).await
    }

    pub(crate) async fn result_at(&self, now: u64) -> ResultOutcome {
        let (outcome, snapshot) = {
            let mut state = self.state.lock().await;
            let outcome = state.result(now);
            // Finalizing an ended round stores the winner message, which the
            // backup needs too
            let snapshot = if outcome.finalized && self.role == Role::Active {
                Some(state.snapshot())
            } else {
                None
            };
            (outcome, snapshot)
        };

        if let Some(snapshot) = snapshot {
            self.sink.push(snapshot);
        }

        outcome
    }

    /// Accepts a state snapshot pushed by the active node.
    ///
    /// Returns false when this node is active: an active node never lets its
    /// authoritative state be overwritten.
    pub async fn accept_update(&self, snapshot: StateSnapshot) -> bool {
        let mut state = self.state.lock().await;
        let accepted = state.apply_snapshot(snapshot);
        if accepted {
            tracing::debug!(
                "Applied state update: highest bid {} by {}",
                state.highest_bid,
                state.highest_bidder_id
            );
        } else {
            tracing::warn!("Refused state update: this node is not a backup");
        }
        accepted
    }

    /// Current state snapshot, for inspection.
    pub async fn snapshot(&self) -> StateSnapshot {
        self.state.lock().await.snapshot()
    }
}

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed round length. The clock starts at the first bid after an idle or
/// ended period, never earlier.
pub const ROUND_LENGTH_SECS: u64 = 100;

/// A node's role, fixed at startup. Decided by the port convention in
/// `node::context`: whoever binds the primary port is `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Active,
    Backup,
}

/// The full replicated value of the auction at one instant.
///
/// This is what travels from the active node to the backup. The role is
/// deliberately not part of the snapshot: a receiving backup stays a backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub highest_bid: i64,
    pub highest_bidder_id: String,
    /// Unix seconds. 0 means no round is running.
    pub auction_end_time: u64,
    pub last_winner_message: Option<String>,
}

/// The single mutable auction record held by a node.
///
/// Invariant: `auction_end_time == 0` implies `highest_bid == 0` and an empty
/// `highest_bidder_id`.
#[derive(Debug)]
pub struct AuctionState {
    pub highest_bid: i64,
    pub highest_bidder_id: String,
    pub auction_end_time: u64,
    pub last_winner_message: Option<String>,
    pub role: Role,
}

/// Outcome of a bid attempt. A rejection is a normal delivered answer, not an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum BidOutcome {
    Accepted { message: String },
    Rejected { message: String },
}

impl BidOutcome {
    pub fn message(&self) -> &str {
        match self {
            BidOutcome::Accepted { message } | BidOutcome::Rejected { message } => message,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, BidOutcome::Accepted { .. })
    }
}

/// Outcome of a result query. `finalized` is set when the query observed an
/// ended round and (re)computed the winner message, which the active node
/// must replicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultOutcome {
    pub message: String,
    pub finalized: bool,
}

impl AuctionState {
    pub fn new(role: Role) -> Self {
        Self {
            highest_bid: 0,
            highest_bidder_id: String::new(),
            auction_end_time: 0,
            last_winner_message: None,
            role,
        }
    }

    /// Places a bid at time `now` (unix seconds).
    ///
    /// An ended round is finalized first: the winner message is stored, the
    /// bid fields reset, and the response gets a "previous auction has ended"
    /// notice. An idle state starts a new round ending at `now + 100`.
    /// The bid itself is accepted only if strictly higher than the current
    /// highest bid.
    pub fn place_bid(&mut self, user_id: &str, amount: i64, now: u64) -> BidOutcome {
        let mut notice = "";

        if self.auction_end_time > 0 && self.auction_end_time <= now {
            // A bid has come in for an ended auction: conclude it, start fresh
            self.record_winner();
            self.highest_bid = 0;
            self.highest_bidder_id.clear();
            self.auction_end_time = 0;
            notice = "The previous auction has ended, your bid request has unfortunately started a new auction...\n";
        }

        if self.auction_end_time == 0 {
            self.auction_end_time = now + ROUND_LENGTH_SECS;
        }

        if amount > self.highest_bid {
            self.highest_bid = amount;
            self.highest_bidder_id = user_id.to_string();
            BidOutcome::Accepted {
                message: format!("{}You are the current highest bidder with {}", notice, amount),
            }
        } else {
            BidOutcome::Rejected {
                message: format!("Higher bid exists ({})", self.highest_bid),
            }
        }
    }

    /// Answers a result query at time `now`.
    ///
    /// On an ended round this stores the winner message but does not reset
    /// the bid fields, so repeated queries report the same winner and never
    /// start a new round by themselves. The transition back to idle happens
    /// only on the next bid.
    pub fn result(&mut self, now: u64) -> ResultOutcome {
        if self.auction_end_time > 0 && self.auction_end_time <= now {
            let winner_message = self.record_winner();
            ResultOutcome {
                message: format!("The auction is over!\n{}", winner_message),
                finalized: true,
            }
        } else if self.auction_end_time > now {
            ResultOutcome {
                message: format!(
                    "The highest bid is {} by user {}\nTime remaining: {} seconds",
                    self.highest_bid,
                    self.highest_bidder_id,
                    self.auction_end_time - now
                ),
                finalized: false,
            }
        } else {
            ResultOutcome {
                message: "No auctions have yet to be run, submit a bid to start a new auction"
                    .to_string(),
                finalized: false,
            }
        }
    }

    /// Overwrites the four mutable fields from an incoming snapshot.
    ///
    /// Unconditional last-writer-wins: there is no version or timestamp
    /// check, so an out-of-order snapshot replaces a newer one. The role is
    /// untouched. Returns false without touching anything when this node is
    /// not a backup.
    pub fn apply_snapshot(&mut self, snapshot: StateSnapshot) -> bool {
        if self.role != Role::Backup {
            return false;
        }

        self.highest_bid = snapshot.highest_bid;
        self.highest_bidder_id = snapshot.highest_bidder_id;
        self.auction_end_time = snapshot.auction_end_time;
        self.last_winner_message = snapshot.last_winner_message;
        true
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            highest_bid: self.highest_bid,
            highest_bidder_id: self.highest_bidder_id.clone(),
            auction_end_time: self.auction_end_time,
            last_winner_message: self.last_winner_message.clone(),
        }
    }

    fn record_winner(&mut self) -> String {
        let message = format!(
            "Last auction was won with a bid of {} by user with ID {}",
            self.highest_bid, self.highest_bidder_id
        );
        self.last_winner_message = Some(message.clone());
        message
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

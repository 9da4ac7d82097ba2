//! Auction Core Module
//!
//! Implements the single replicated auction resource.
//!
//! ## Core Concepts
//! - **State**: One `AuctionState` per node process, guarded by a single lock.
//! - **Lifecycle**: A round runs for a fixed 100 seconds starting at the first
//!   bid after an idle or ended period; an ended round is finalized lazily by
//!   the next access, never by a timer.
//! - **Roles**: The active node answers bids authoritatively and replicates;
//!   the backup accepts wholesale state overwrites.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod state;

#[cfg(test)]
mod tests;

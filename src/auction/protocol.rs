//! Auction Network Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) of a node's
//! HTTP surface: client-facing bid/result calls and the node-to-node state
//! update used by replication.
//!
//! These structures are serialized as JSON. Every response carries a
//! human-readable message alongside its status.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Public endpoint for placing a bid.
pub const ENDPOINT_BID: &str = "/bid";
/// Public endpoint for querying the current or concluded round.
pub const ENDPOINT_RESULT: &str = "/result";
/// Internal endpoint for state snapshots pushed by the active node.
pub const ENDPOINT_UPDATE: &str = "/internal/update";

// --- Data Transfer Objects ---

/// Delivery-level status of an RPC answer.
///
/// `Rejected` is a business outcome (bid too low, update refused by an
/// active node) and never triggers client failover; only `Fault` and
/// transport errors do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Accepted,
    Rejected,
    Fault,
}

/// Client request for placing a bid.
#[derive(Debug, Serialize, Deserialize)]
pub struct BidRequest {
    /// Unique request id (UUID) attached by the client, logged by the node.
    pub request_id: String,
    /// Identity of the bidder.
    pub user_id: String,
    /// The offered amount. Must strictly exceed the current highest bid.
    pub amount: i64,
}

/// Answer to a bid request.
#[derive(Debug, Serialize, Deserialize)]
pub struct BidResponse {
    pub status: ResponseStatus,
    pub message: String,
}

/// Answer to a result query.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultResponse {
    pub status: ResponseStatus,
    pub message: String,
}

/// Acknowledgment of a pushed state snapshot.
///
/// `Rejected` means the receiver is not a backup; the sender treats that the
/// same as a transport failure and marks its connection lost.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub status: ResponseStatus,
}

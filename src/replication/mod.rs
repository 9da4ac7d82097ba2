//! Replication Module
//!
//! Pushes state snapshots from the active node to the backup node.
//!
//! ## Core Concepts
//! - **Best-effort**: one HTTP POST per snapshot, no retry, no backoff, no
//!   delivery guarantee. An unreachable backup simply serves stale state
//!   until the next successful push.
//! - **Off the request path**: the service enqueues into a bounded channel
//!   and returns immediately; one dedicated worker task drains the queue.
//!   A push failure never fails the request that triggered it.

pub mod replicator;

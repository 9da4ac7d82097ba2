//! Replicated Auction House Library
//!
//! This library crate defines the core modules of a two-node auction system:
//! an active (primary) node answers client requests authoritatively and pushes
//! state snapshots to a passive backup node, while clients fail over between
//! the two endpoints transparently.
//!
//! ## Architecture Modules
//!
//! - **`auction`**: The auction core. Holds the single replicated state record,
//!   the time-windowed round lifecycle (idle -> running -> ended), and the
//!   HTTP-facing bid/result/update handlers.
//! - **`replication`**: Asynchronous best-effort state push from the active
//!   node to the backup. A bounded queue drained by one worker task, so a
//!   push never blocks or fails the request that triggered it.
//! - **`client`**: The failover client. Targets the primary endpoint first and
//!   switches to the backup exactly once on a transport or fault response.
//! - **`node`**: Startup context. Port-convention role election (primary port
//!   taken means this process is the backup) and router assembly.

pub mod auction;
pub mod client;
pub mod node;
pub mod replication;

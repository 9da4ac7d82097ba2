//! Failover Client Module
//!
//! Issues bid/result requests against a configured endpoint and switches to
//! the alternate (backup) endpoint exactly once when the current one fails.
//!
//! ## Failover Policy
//! - Transport failure or a response flagged `fault`: switch endpoints and
//!   retry the same call once; fatal if the switch was already used.
//! - A delivered business rejection ("bid too low") is a normal answer and
//!   never triggers failover.
//! - Failover is purely client-side endpoint substitution; it never promotes
//!   the backup node.

pub mod failover;

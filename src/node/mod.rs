//! Node Startup Module
//!
//! Builds the per-process context: which role this node plays, where it
//! listens, and where its peer lives. No ambient globals; the context is
//! constructed once at startup and everything downstream receives it
//! explicitly.

pub mod context;

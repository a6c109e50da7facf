//! Shared domain types for chatrelay.
//!
//! Turn records, history entries, the generation request shape, layered
//! configuration, and the error types shared by the core and infra crates.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod generation;
pub mod turn;

//! Infrastructure layer for chatrelay.
//!
//! Contains implementations of the traits defined in `chatrelay-core`:
//! SQLite turn storage, the HTTP generation client, and the layered
//! configuration loader.

pub mod config;
pub mod generation;
pub mod sqlite;

//! Turn orchestration and repository trait definitions for chatrelay.
//!
//! This crate defines the "ports" (repository and generation client traits)
//! that the infrastructure layer implements, plus the orchestrator that
//! drives one prompt through them. It depends only on `chatrelay-types` --
//! never on `chatrelay-infra` or any database/IO crate.

pub mod generation;
pub mod repository;
pub mod turn;

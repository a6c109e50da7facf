//! Request extractors.

pub mod prompt;

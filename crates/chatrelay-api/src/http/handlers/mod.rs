//! HTTP request handlers.

pub mod list;
pub mod page;
pub mod query;

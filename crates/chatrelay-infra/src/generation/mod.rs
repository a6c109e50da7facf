//! Clients for the remote text-generation service.

pub mod http;

pub use http::HttpGenerationClient;

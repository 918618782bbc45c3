//! Gateway domain: configuration, errors, wire types and the relay flow.

pub mod config;
pub mod error;
pub mod relay;
pub mod types;

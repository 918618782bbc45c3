//! Adapters: implementations of the outbound ports.

pub mod downstream;

pub use downstream::HttpProcessingClient;

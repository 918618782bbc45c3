//! # Ports Layer
//!
//! Driven ports required by the store's callers and by the eviction sweeper.
//! The gateway drives the store directly through these traits; there is no
//! separate inbound API.

pub mod outbound;

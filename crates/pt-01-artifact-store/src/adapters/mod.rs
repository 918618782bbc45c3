//! # Adapters Module
//!
//! Implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `storage`: directory-backed store (production) and in-memory store (tests)
//! - `infra`: clocks and the UUID id generator

pub mod infra;
pub mod storage;

//! # Domain Layer
//!
//! Pure domain types for the Artifact Store. Nothing here touches the
//! filesystem or the clock.
//!
//! ## Modules
//!
//! - `ids` - Artifact identifiers
//! - `entities` - Listing entries and sweep reports
//! - `retention` - Retention window and eviction rule
//! - `errors` - Domain error types

pub mod entities;
pub mod errors;
pub mod ids;
pub mod retention;

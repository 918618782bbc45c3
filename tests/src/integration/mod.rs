//! Cross-crate integration tests.

#[cfg(test)]
mod eviction;
#[cfg(test)]
mod flows;
#[cfg(test)]
mod harness;

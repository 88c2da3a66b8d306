//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`solver`] - Scripted [`Solver`](crate::port::Solver) that replays
//!   canned outcomes and counts calls.
//! - [`domain`] - Builders for instruments, catalogs and parameter sets.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod solver;

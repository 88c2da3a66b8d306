//! Implementations of ports (hexagonal adapters).

pub mod catalog;
pub mod inbound;
pub mod solver;

//! CLI module graph.

pub mod allocate;
pub mod check;
pub mod command;
pub mod model;
pub mod output;
pub mod prompt;

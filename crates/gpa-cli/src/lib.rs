//! CLI library components for the GP appointments pipeline.

pub mod cli;
pub mod commands;
pub mod logging;

//! Subcommand implementations

pub mod config;
pub mod doctor;
pub mod generate;
pub mod plan;

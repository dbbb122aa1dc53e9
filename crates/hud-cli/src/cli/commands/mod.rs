//! CLI command handlers.

pub mod config;
pub mod panels;
pub mod run;

//! Core building blocks for the HUD front end.
//!
//! - `bridge`: subscription table, correlated request queue and wire codec
//!   for the host message bridge
//! - `focus`: the input focus claim table
//! - `config`: `config.toml` loading and path resolution
//! - `logging`: tracing subscriber bootstrap

pub mod bridge;
pub mod config;
pub mod focus;
pub mod logging;

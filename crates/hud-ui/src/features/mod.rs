//! Feature slices (state + update per panel).

pub mod admin;
pub mod app;
pub mod garage;
pub mod inventory;

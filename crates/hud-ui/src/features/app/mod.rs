mod state;

pub use state::{AppStore, PlayerPatch, PlayerStats, Settings};

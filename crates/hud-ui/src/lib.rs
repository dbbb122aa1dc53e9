//! HUD front end core: panel coordinator, feature stores, reducer, runtime.
//!
//! ## Architecture
//!
//! - `state.rs`: `AppState` (coordinator, stores, routes, config)
//! - `events.rs`: `UiEvent` inputs to the reducer
//! - `effects.rs`: `UiEffect` outputs for the runtime
//! - `update.rs`: the reducer
//! - `panels/`: panel registry and lifecycle coordinator
//! - `features/`: inventory, admin, garage and app stores
//! - `runtime/`: async loop over the host bridge

pub mod effects;
pub mod events;
pub mod features;
pub mod panels;
pub mod routes;
pub mod runtime;
pub mod state;
pub mod update;

pub use effects::{HostRequest, UiEffect};
pub use events::{UiEvent, UserIntent};
pub use panels::{PanelConfig, PanelCoordinator, PanelError, PanelEvent, PanelInfo};
pub use runtime::{HudHandle, HudRuntime};
pub use state::{AppState, Stores};

//! HUD state container.
//!
//! The coordinator and the feature stores are separate fields so lifecycle
//! hooks can take `&mut Stores` while the coordinator is mutably borrowed.

use hud_core::bridge::Subscriptions;
use hud_core::config::Config;

use crate::features::admin::AdminState;
use crate::features::app::AppStore;
use crate::features::garage::GarageState;
use crate::features::inventory::InventoryState;
use crate::panels::{PanelCoordinator, builtin};
use crate::routes::{self, HostRoute};

/// Per-panel state models plus the process-wide tracker.
#[derive(Debug, Clone)]
pub struct Stores {
    pub inventory: InventoryState,
    pub admin: AdminState,
    pub garage: GarageState,
    pub app: AppStore,
}

impl Stores {
    pub fn new(config: &Config) -> Self {
        Self {
            inventory: InventoryState::new(&config.inventory),
            admin: AdminState::default(),
            garage: GarageState::default(),
            app: AppStore::default(),
        }
    }
}

pub struct AppState {
    pub panels: PanelCoordinator<Stores>,
    pub stores: Stores,
    pub routes: Subscriptions<HostRoute>,
    pub config: Config,
}

impl AppState {
    /// Builds the stores, subscribes the default host pushes and registers
    /// the built-in panels.
    pub fn new(config: Config) -> Self {
        let mut routes = Subscriptions::new();
        routes::subscribe_defaults(&mut routes);

        let mut panels = PanelCoordinator::new();
        for panel in builtin::panels(&config) {
            // Conflicts are logged by `register`; the first entry stays.
            let _ = panels.register(panel, &mut routes);
        }

        Self {
            panels,
            stores: Stores::new(&config),
            routes,
            config,
        }
    }
}

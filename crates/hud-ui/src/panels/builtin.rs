//! Built-in panel registrations.

use hud_core::config::Config;

use super::PanelConfig;
use crate::features::app::PlayerPatch;
use crate::features::inventory::apply_wrapped_snapshot;
use crate::state::Stores;

pub const INVENTORY: &str = "inventory";
pub const ADMIN: &str = "admin";
pub const GARAGE: &str = "garage";

/// Inventory, admin and garage, in registry order, with config overrides
/// applied.
pub fn panels(config: &Config) -> Vec<PanelConfig<Stores>> {
    [inventory(), admin(), garage()]
        .into_iter()
        .map(|panel| with_overrides(panel, config))
        .collect()
}

fn with_overrides(mut panel: PanelConfig<Stores>, config: &Config) -> PanelConfig<Stores> {
    let Some(overrides) = config.panel(&panel.name) else {
        return panel;
    };
    if let Some(exclusive) = overrides.exclusive {
        panel = panel.exclusive(exclusive);
    }
    if let Some(actions) = &overrides.actions {
        panel = panel.triggers(actions.iter().cloned());
    }
    panel
}

/// Non-exclusive. The open payload may carry `inventory` and player stats.
fn inventory() -> PanelConfig<Stores> {
    PanelConfig::new(INVENTORY)
        .exclusive(false)
        .trigger("openInventory")
        .on_open(|stores: &mut Stores, data| {
            stores.inventory.open();
            apply_wrapped_snapshot(&mut stores.inventory, data);
            if data.is_object() {
                match PlayerPatch::from_value(data) {
                    Ok(patch) => stores.app.update_player(patch),
                    Err(e) => tracing::warn!(error = %e, "ignoring malformed player stats"),
                }
            }
            Vec::new()
        })
        .on_close(|stores: &mut Stores| {
            stores.inventory.close();
            Vec::new()
        })
}

fn admin() -> PanelConfig<Stores> {
    PanelConfig::new(ADMIN)
        .trigger("openAdmin")
        .on_open(|stores: &mut Stores, _| stores.admin.open())
        .on_close(|stores: &mut Stores| {
            stores.admin.close();
            Vec::new()
        })
}

fn garage() -> PanelConfig<Stores> {
    PanelConfig::new(GARAGE)
        .trigger("openGarage")
        .on_open(|stores: &mut Stores, _| stores.garage.open())
        .on_close(|stores: &mut Stores| {
            stores.garage.close();
            Vec::new()
        })
}

//! Inbound routing targets for host actions.

use hud_core::bridge::Subscriptions;

/// What the reducer does when a subscribed host action arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRoute {
    OpenPanel(String),
    ClosePanel(String),
    CloseAll,
    /// `{inventory: Snapshot}` wrapper.
    InventorySnapshot,
    /// Bare snapshot.
    InventoryRefresh,
    InventorySlot,
    PlayerStats,
}

pub const UPDATE_INVENTORY: &str = "updateInventory";
pub const INVENTORY_REFRESH: &str = "fw:inventory:refresh";
pub const UPDATE_INVENTORY_SLOT: &str = "updateInventorySlot";
pub const UPDATE_PLAYER_STATS: &str = "updatePlayerStats";
pub const CLOSE_ALL: &str = "closeAll";

/// Subscribes the host pushes that are not tied to a panel registration.
pub fn subscribe_defaults(routes: &mut Subscriptions<HostRoute>) {
    routes.on(UPDATE_INVENTORY, HostRoute::InventorySnapshot);
    routes.on(INVENTORY_REFRESH, HostRoute::InventoryRefresh);
    routes.on(UPDATE_INVENTORY_SLOT, HostRoute::InventorySlot);
    routes.on(UPDATE_PLAYER_STATS, HostRoute::PlayerStats);
    routes.on(CLOSE_ALL, HostRoute::CloseAll);
}

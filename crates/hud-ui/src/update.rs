//! HUD reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! Host actions are looked up in the subscription table and each matching
//! route is applied in subscription order. Request failures are logged and
//! never rolled back: nothing was changed optimistically.

use hud_core::bridge::BridgeError;
use serde_json::Value;

use crate::effects::{HostRequest, UiEffect};
use crate::events::{UiEvent, UserIntent};
use crate::features::app::{AppStore, PlayerPatch};
use crate::features::{admin, garage, inventory};
use crate::routes::HostRoute;
use crate::state::AppState;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    let effects = match event {
        UiEvent::Host { action, data } => handle_host_event(app, &action, &data),
        UiEvent::Intent(intent) => handle_intent(app, intent),
        UiEvent::RequestCompleted { request, result } => {
            match result {
                Ok(data) => handle_reply(app, &request, &data),
                Err(e) => handle_request_failed(app, &request, &e),
            }
            vec![]
        }
    };
    track_lifecycle(&mut app.stores.app, &effects);
    effects
}

fn handle_host_event(app: &mut AppState, action: &str, data: &Value) -> Vec<UiEffect> {
    let routes: Vec<HostRoute> = app.routes.handlers(action).cloned().collect();
    if routes.is_empty() {
        tracing::debug!(action, "no subscriber for host action");
        return vec![];
    }

    let mut effects = Vec::new();
    for route in routes {
        effects.extend(apply_route(app, route, data));
    }
    effects
}

fn apply_route(app: &mut AppState, route: HostRoute, data: &Value) -> Vec<UiEffect> {
    let stores = &mut app.stores;
    match route {
        HostRoute::OpenPanel(name) => app.panels.open(&name, data.clone(), stores),
        HostRoute::ClosePanel(name) => app.panels.close(&name, stores),
        HostRoute::CloseAll => app.panels.close_all(stores),
        HostRoute::InventorySnapshot => {
            inventory::apply_wrapped_snapshot(&mut stores.inventory, data);
            vec![]
        }
        HostRoute::InventoryRefresh => {
            inventory::apply_snapshot(&mut stores.inventory, data);
            vec![]
        }
        HostRoute::InventorySlot => {
            inventory::apply_slot_update(&mut stores.inventory, data);
            vec![]
        }
        HostRoute::PlayerStats => {
            match PlayerPatch::from_value(data) {
                Ok(patch) => stores.app.update_player(patch),
                Err(e) => tracing::warn!(error = %e, "ignoring malformed player stats"),
            }
            vec![]
        }
    }
}

fn handle_intent(app: &mut AppState, intent: UserIntent) -> Vec<UiEffect> {
    let stores = &mut app.stores;
    match intent {
        UserIntent::OpenPanel { name, data } => app.panels.open(&name, data, stores),
        UserIntent::ClosePanel { name } => {
            if !app.panels.is_open(&name) {
                return app.panels.close(&name, stores);
            }
            let mut effects = app.panels.close(&name, stores);
            effects.push(UiEffect::Request(HostRequest::ClosePanel { name }));
            effects
        }
        UserIntent::CloseAll => app.panels.close_all(stores),
        UserIntent::Inventory(intent) => inventory::handle_intent(&mut stores.inventory, intent),
        UserIntent::Admin(intent) => admin::handle_intent(&mut stores.admin, intent),
        UserIntent::Garage(intent) => {
            garage::handle_intent(&mut stores.garage, intent);
            vec![]
        }
    }
}

fn handle_reply(app: &mut AppState, request: &HostRequest, data: &Value) {
    match request {
        HostRequest::AdminPlayers | HostRequest::AdminVehicles | HostRequest::AdminItems => {
            app.stores.admin.apply_reply(request, data);
        }
        HostRequest::GarageVehicles => app.stores.garage.apply_vehicles(data),
        // Inventory changes arrive as host pushes, not in replies.
        _ => tracing::debug!(action = %request.action(), "host acknowledged request"),
    }
}

fn handle_request_failed(app: &mut AppState, request: &HostRequest, error: &BridgeError) {
    tracing::error!(action = %request.action(), error = %error, "host request failed");
    if matches!(request, HostRequest::GarageVehicles) {
        app.stores.garage.loading_failed();
    }
}

/// Feeds lifecycle events to the process-wide tracker.
fn track_lifecycle(tracker: &mut AppStore, effects: &[UiEffect]) {
    for effect in effects {
        if let UiEffect::Lifecycle(event) = effect {
            tracker.on_panel_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use hud_core::config::Config;
    use serde_json::json;

    use super::*;
    use crate::features::admin::{AdminCategory, AdminIntent};
    use crate::features::inventory::InventoryIntent;
    use crate::panels::PanelEvent;

    fn app() -> AppState {
        AppState::new(Config::default())
    }

    fn host(action: &str, data: Value) -> UiEvent {
        UiEvent::Host {
            action: action.to_string(),
            data,
        }
    }

    fn requests(effects: &[UiEffect]) -> Vec<HostRequest> {
        effects
            .iter()
            .filter_map(|e| match e {
                UiEffect::Request(r) => Some(r.clone()),
                UiEffect::Lifecycle(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_open_inventory_loads_snapshot_and_stats() {
        let mut app = app();
        let effects = update(
            &mut app,
            host(
                "openInventory",
                json!({
                    "inventory": {
                        "main": [{"slot": 0, "name": "water", "amount": 5, "weight": 0.5}],
                        "maxWeight": 50
                    },
                    "health": 80,
                    "cash": 120
                }),
            ),
        );

        assert!(app.panels.is_open("inventory"));
        assert!(app.stores.inventory.is_open());
        assert!((app.stores.inventory.current_weight() - 2.5).abs() < 1e-9);
        assert!((app.stores.app.player.health - 80.0).abs() < f64::EPSILON);
        assert_eq!(app.stores.app.player.cash, 120);
        assert_eq!(app.stores.app.current_panel(), Some("inventory"));
        assert!(matches!(
            effects.last(),
            Some(UiEffect::Lifecycle(PanelEvent::Opened { name, .. })) if name == "inventory"
        ));
    }

    #[test]
    fn test_exclusive_admin_closes_inventory() {
        let mut app = app();
        update(&mut app, host("openInventory", Value::Null));
        let effects = update(&mut app, host("openAdmin", Value::Null));

        assert!(!app.panels.is_open("inventory"));
        assert!(!app.stores.inventory.is_open());
        assert!(app.panels.is_open("admin"));
        assert_eq!(requests(&effects), vec![HostRequest::AdminPlayers]);
        assert_eq!(app.stores.app.current_panel(), Some("admin"));
        assert_eq!(app.panels.focus().claims(), ["admin".to_string()]);
    }

    #[test]
    fn test_host_close_action() {
        let mut app = app();
        update(&mut app, host("openGarage", Value::Null));
        update(&mut app, host("closeGarage", Value::Null));
        assert!(!app.panels.is_open("garage"));
        assert_eq!(app.panels.active_panel(), None);
        assert!(!app.stores.app.is_any_panel_open());
    }

    #[test]
    fn test_user_close_notifies_host_once() {
        let mut app = app();
        update(&mut app, UserIntent::open("inventory").into());
        let effects = update(&mut app, UserIntent::close("inventory").into());
        assert_eq!(
            requests(&effects),
            vec![HostRequest::ClosePanel {
                name: "inventory".to_string()
            }]
        );

        // The host's echo is a redundant close.
        assert!(update(&mut app, host("closeInventory", Value::Null)).is_empty());
        assert!(update(&mut app, UserIntent::close("inventory").into()).is_empty());
    }

    #[test]
    fn test_close_all_push() {
        let mut app = app();
        update(&mut app, host("openInventory", Value::Null));
        update(&mut app, host("closeAll", Value::Null));
        assert_eq!(app.panels.open_panels().count(), 0);
        assert!(!app.panels.focus().has_focus());
    }

    #[test]
    fn test_slot_push_and_unknown_action() {
        let mut app = app();
        update(
            &mut app,
            host(
                "updateInventorySlot",
                json!({"slot": 2, "item": {"name": "bread", "weight": 0.25, "amount": 4}}),
            ),
        );
        assert!((app.stores.inventory.current_weight() - 1.0).abs() < 1e-9);
        assert!(update(&mut app, host("fw:unknown", json!({}))).is_empty());
    }

    #[test]
    fn test_relocation_request_and_failed_reply() {
        let mut app = app();
        update(
            &mut app,
            host("fw:inventory:refresh", json!({"main": [{"slot": 0, "name": "water"}]})),
        );
        update(
            &mut app,
            UserIntent::Inventory(InventoryIntent::BeginRelocation { slot: 0 }).into(),
        );
        let effects = update(
            &mut app,
            UserIntent::Inventory(InventoryIntent::CompleteRelocation { target_slot: 3 }).into(),
        );
        let request = HostRequest::MoveItem {
            from_slot: 0,
            to_slot: 3,
        };
        assert_eq!(requests(&effects), vec![request.clone()]);

        update(
            &mut app,
            UiEvent::RequestCompleted {
                request,
                result: Err(BridgeError::Rejected("slot locked".to_string())),
            },
        );
        assert!(app.stores.inventory.item_at(0).is_some());
        assert!(app.stores.inventory.drag().is_none());
    }

    #[test]
    fn test_admin_reply_populates_list() {
        let mut app = app();
        let effects = update(
            &mut app,
            UserIntent::Admin(AdminIntent::SelectCategory(AdminCategory::Vehicles)).into(),
        );
        assert_eq!(requests(&effects), vec![HostRequest::AdminVehicles]);

        update(
            &mut app,
            UiEvent::RequestCompleted {
                request: HostRequest::AdminVehicles,
                result: Ok(json!({"vehicles": [{"model": "t20"}]})),
            },
        );
        assert_eq!(app.stores.admin.vehicles().len(), 1);
    }

    #[test]
    fn test_garage_failure_stops_loading() {
        let mut app = app();
        update(&mut app, host("openGarage", Value::Null));
        assert!(app.stores.garage.is_loading());
        update(
            &mut app,
            UiEvent::RequestCompleted {
                request: HostRequest::GarageVehicles,
                result: Err(BridgeError::Disconnected),
            },
        );
        assert!(!app.stores.garage.is_loading());
    }
}

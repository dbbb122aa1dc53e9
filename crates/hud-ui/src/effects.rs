//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent bridge I/O and lifecycle notifications only (no direct
//! state mutations).
//!
//! This keeps the reducer pure: it only mutates state and returns effects,
//! never talks to the host directly.

use std::borrow::Cow;

use serde_json::{Value, json};

use crate::panels::{PanelEvent, close_action};

/// Inventory zone sent with `useItem`.
pub const MAIN_ZONE: &str = "main";

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    /// Send a request to the host. The reply comes back as
    /// `UiEvent::RequestCompleted` carrying the same request.
    Request(HostRequest),

    /// Publish a panel lifecycle event to external listeners.
    Lifecycle(PanelEvent),
}

/// Typed requests the HUD sends to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// Ask the host to relocate an item between slots.
    MoveItem { from_slot: usize, to_slot: usize },
    UseItem {
        item_name: String,
        slot: usize,
        zone: String,
        amount: u32,
    },
    DropItem { slot: usize, amount: u32 },
    GiveItem { slot: usize, amount: u32 },
    /// The UI closed a panel on its own (Esc, close button).
    ClosePanel { name: String },
    AdminPlayers,
    AdminVehicles,
    AdminItems,
    GarageVehicles,
}

impl HostRequest {
    /// Bridge action name.
    pub fn action(&self) -> Cow<'static, str> {
        match self {
            HostRequest::MoveItem { .. } => Cow::Borrowed("moveItem"),
            HostRequest::UseItem { .. } => Cow::Borrowed("useItem"),
            HostRequest::DropItem { .. } => Cow::Borrowed("dropItem"),
            HostRequest::GiveItem { .. } => Cow::Borrowed("giveItem"),
            HostRequest::ClosePanel { name } => Cow::Owned(close_action(name)),
            HostRequest::AdminPlayers => Cow::Borrowed("admin:getPlayers"),
            HostRequest::AdminVehicles => Cow::Borrowed("admin:getVehicles"),
            HostRequest::AdminItems => Cow::Borrowed("admin:getItems"),
            HostRequest::GarageVehicles => Cow::Borrowed("garage:getVehicles"),
        }
    }

    /// Bridge payload.
    pub fn payload(&self) -> Value {
        match self {
            HostRequest::MoveItem { from_slot, to_slot } => {
                json!({ "fromSlot": from_slot, "toSlot": to_slot })
            }
            HostRequest::UseItem {
                item_name,
                slot,
                zone,
                amount,
            } => json!({
                "itemName": item_name,
                "slot": slot,
                "zone": zone,
                "amount": amount,
            }),
            HostRequest::DropItem { slot, amount } | HostRequest::GiveItem { slot, amount } => {
                json!({ "slot": slot, "amount": amount })
            }
            HostRequest::ClosePanel { .. }
            | HostRequest::AdminPlayers
            | HostRequest::AdminVehicles
            | HostRequest::AdminItems
            | HostRequest::GarageVehicles => json!({}),
        }
    }
}

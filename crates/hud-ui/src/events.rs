//! UI event types.
//!
//! Every input to the reducer is a `UiEvent`: a host push, a user intent from
//! the rendering layer, or the outcome of a request the HUD sent earlier.

use hud_core::bridge::BridgeError;
use serde_json::Value;

use crate::effects::HostRequest;
use crate::features::admin::AdminIntent;
use crate::features::garage::GarageIntent;
use crate::features::inventory::InventoryIntent;

#[derive(Debug)]
pub enum UiEvent {
    /// Host-pushed action, routed through the subscription table.
    Host { action: String, data: Value },

    Intent(UserIntent),

    /// A `UiEffect::Request` got its reply (or failed).
    RequestCompleted {
        request: HostRequest,
        result: Result<Value, BridgeError>,
    },
}

/// Calls the rendering layer makes into the core.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    OpenPanel { name: String, data: Value },
    /// Closes locally and tells the host.
    ClosePanel { name: String },
    CloseAll,
    Inventory(InventoryIntent),
    Admin(AdminIntent),
    Garage(GarageIntent),
}

impl UserIntent {
    pub fn open(name: impl Into<String>) -> Self {
        UserIntent::OpenPanel {
            name: name.into(),
            data: Value::Null,
        }
    }

    pub fn close(name: impl Into<String>) -> Self {
        UserIntent::ClosePanel { name: name.into() }
    }
}

impl From<UserIntent> for UiEvent {
    fn from(intent: UserIntent) -> Self {
        UiEvent::Intent(intent)
    }
}

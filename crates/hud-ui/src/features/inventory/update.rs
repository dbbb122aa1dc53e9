//! Inventory reducer.
//!
//! Translates user intents and host pushes into `InventoryState` calls.

use serde::Deserialize;
use serde_json::Value;

use super::state::{ContextAction, InventorySnapshot, InventoryState, Item, SlotUpdate};
use crate::effects::UiEffect;

/// User intents targeting the inventory panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryIntent {
    SelectSlot(usize),
    ShowContextMenu { x: i32, y: i32, slot: usize },
    HideContextMenu,
    BeginRelocation { slot: usize },
    CompleteRelocation { target_slot: usize },
    CancelRelocation,
    Use { slot: usize },
    Drop { slot: usize, amount: u32 },
    Give { slot: usize, amount: u32 },
    ContextAction(ContextAction),
}

pub fn handle_intent(state: &mut InventoryState, intent: InventoryIntent) -> Vec<UiEffect> {
    match intent {
        InventoryIntent::SelectSlot(slot) => {
            state.select_slot(slot);
            vec![]
        }
        InventoryIntent::ShowContextMenu { x, y, slot } => {
            // Right-click on an empty slot does nothing.
            if let Some(item) = state.item_at(slot).cloned() {
                state.show_context_menu(x, y, item);
            }
            vec![]
        }
        InventoryIntent::HideContextMenu => {
            state.hide_context_menu();
            vec![]
        }
        InventoryIntent::BeginRelocation { slot } => {
            state.begin_relocation(slot);
            vec![]
        }
        InventoryIntent::CompleteRelocation { target_slot } => {
            state.complete_relocation(target_slot).into_iter().collect()
        }
        InventoryIntent::CancelRelocation => {
            state.cancel_relocation();
            vec![]
        }
        InventoryIntent::Use { slot } => with_item(state, slot, |s, item| s.use_item(item, slot)),
        InventoryIntent::Drop { slot, amount } => {
            with_item(state, slot, |s, item| s.drop_item(item, slot, amount))
        }
        InventoryIntent::Give { slot, amount } => {
            with_item(state, slot, |s, item| s.give_item(item, slot, amount))
        }
        InventoryIntent::ContextAction(action) => {
            state.context_action(action).into_iter().collect()
        }
    }
}

fn with_item(
    state: &InventoryState,
    slot: usize,
    f: impl FnOnce(&InventoryState, &Item) -> UiEffect,
) -> Vec<UiEffect> {
    match state.item_at(slot) {
        Some(item) => vec![f(state, item)],
        None => {
            tracing::warn!(slot, "no item in slot");
            vec![]
        }
    }
}

/// Loads a bare snapshot payload.
pub fn apply_snapshot(state: &mut InventoryState, data: &Value) {
    match InventorySnapshot::from_value(data) {
        Ok(snapshot) => state.load_snapshot(snapshot),
        Err(e) => tracing::warn!(error = %e, "ignoring malformed inventory snapshot"),
    }
}

/// Loads the snapshot nested under `inventory`, if any.
pub fn apply_wrapped_snapshot(state: &mut InventoryState, data: &Value) {
    match data.get("inventory") {
        Some(inner) if !inner.is_null() => apply_snapshot(state, inner),
        _ => tracing::debug!("payload carries no inventory snapshot"),
    }
}

pub fn apply_slot_update(state: &mut InventoryState, data: &Value) {
    match SlotUpdate::deserialize(data) {
        Ok(update) => {
            state.upsert_slot(update.slot, update.item);
        }
        Err(e) => tracing::warn!(error = %e, "ignoring malformed slot update"),
    }
}

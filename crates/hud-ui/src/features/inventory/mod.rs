//! Inventory feature slice.
//!
//! - `state.rs`: slot grid, weight accounting, selection, context menu, drag
//! - `update.rs`: intent and host-push handlers

mod state;
mod update;

pub use state::{
    ContextAction, ContextMenu, DragState, InventorySnapshot, InventoryState, Item, ItemPatch,
    SlotUpdate, SlotView,
};
pub use update::{
    InventoryIntent, apply_slot_update, apply_snapshot, apply_wrapped_snapshot, handle_intent,
};

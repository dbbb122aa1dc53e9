//! Inventory slot/weight model.
//!
//! Items live in a fixed grid of `max_slots` positions. Every mutation goes
//! through `load_snapshot` or `upsert_slot`, and both recompute
//! `current_weight` from the full item set afterwards. Relocation, use, drop
//! and give never touch the grid locally; they produce a host request and wait
//! for the host to push the authoritative result.

use hud_core::config::InventoryConfig;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::effects::{HostRequest, MAIN_ZONE, UiEffect};

fn default_amount() -> u32 {
    1
}

/// Missing and `null` both mean the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(default_amount))
}

/// Decodes a snapshot item list entry by entry, skipping the ones that don't
/// parse instead of rejecting the whole list.
fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .iter()
        .filter_map(|entry| match Item::deserialize(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(error = %e, %entry, "skipping malformed snapshot item");
                None
            }
        })
        .collect())
}

/// One inventory entry. `weight` is per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub slot: usize,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default = "default_amount", deserialize_with = "null_as_one")]
    pub amount: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Item {
    pub fn total_weight(&self) -> f64 {
        self.weight * f64::from(self.amount)
    }

    /// Fills a missing label and clamps unusable weights to zero.
    fn normalized(mut self) -> Self {
        if self.label.is_empty() {
            self.label.clone_from(&self.name);
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            self.weight = 0.0;
        }
        self
    }
}

/// Partial item update pushed by the host. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub amount: Option<u32>,
    pub weight: Option<f64>,
    pub image: Option<String>,
}

impl ItemPatch {
    fn apply(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(label) = self.label {
            item.label = label;
        }
        if let Some(amount) = self.amount {
            item.amount = amount;
        }
        if let Some(weight) = self.weight {
            item.weight = weight;
        }
        if self.image.is_some() {
            item.image = self.image;
        }
    }

    /// A new item needs at least a name.
    fn into_item(self, slot: usize) -> Option<Item> {
        let name = self.name?;
        Some(
            Item {
                slot,
                label: self.label.unwrap_or_default(),
                name,
                amount: self.amount.unwrap_or(1),
                weight: self.weight.unwrap_or(0.0),
                image: self.image,
            }
            .normalized(),
        )
    }
}

/// Full inventory state pushed by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventorySnapshot {
    #[serde(deserialize_with = "lenient_items")]
    pub main: Vec<Item>,
    pub max_weight: Option<f64>,
    #[serde(deserialize_with = "lenient_items")]
    pub ground_items: Vec<Item>,
}

impl InventorySnapshot {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// Targeted update for one slot; `item: null` empties it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SlotUpdate {
    pub slot: usize,
    #[serde(default)]
    pub item: Option<ItemPatch>,
}

/// Right-click menu. `Default` is the canonical hidden menu.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextMenu {
    pub visible: bool,
    pub x: i32,
    pub y: i32,
    pub item: Option<Item>,
}

/// Actions offered by the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    Use,
    Drop,
    Give,
}

/// In-progress relocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub source_slot: usize,
    pub item: Item,
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotView<'a> {
    pub slot: usize,
    pub item: Option<&'a Item>,
}

#[derive(Debug, Clone)]
pub struct InventoryState {
    slots: Vec<Option<Item>>,
    max_weight: f64,
    default_max_weight: f64,
    current_weight: f64,
    ground_items: Vec<Item>,
    is_open: bool,
    selected_slot: Option<usize>,
    context_menu: ContextMenu,
    drag: Option<DragState>,
}

impl Default for InventoryState {
    fn default() -> Self {
        Self::new(&InventoryConfig::default())
    }
}

impl InventoryState {
    pub fn new(config: &InventoryConfig) -> Self {
        Self {
            slots: vec![None; config.max_slots],
            max_weight: config.max_weight,
            default_max_weight: config.max_weight,
            current_weight: 0.0,
            ground_items: Vec::new(),
            is_open: false,
            selected_slot: None,
            context_menu: ContextMenu::default(),
            drag: None,
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
        tracing::debug!("inventory opened");
    }

    /// Resets interaction state. Items stay until the next snapshot.
    pub fn close(&mut self) {
        self.is_open = false;
        self.selected_slot = None;
        self.hide_context_menu();
        self.drag = None;
        tracing::debug!("inventory closed");
    }

    // ------------------------------------------------------------------
    // Mutation primitives
    // ------------------------------------------------------------------

    /// Replaces items, carry limit and ground items wholesale.
    pub fn load_snapshot(&mut self, snapshot: InventorySnapshot) {
        let mut slots = vec![None; self.slots.len()];
        for item in snapshot.main {
            let item = item.normalized();
            let slot = item.slot;
            if slot >= slots.len() {
                tracing::warn!(slot, item = %item.name, "snapshot item outside the grid");
                continue;
            }
            if item.amount == 0 {
                tracing::debug!(slot, item = %item.name, "skipping empty stack");
                continue;
            }
            if slots[slot].is_some() {
                tracing::warn!(slot, "duplicate snapshot slot, keeping the last entry");
            }
            slots[slot] = Some(item);
        }

        self.slots = slots;
        self.max_weight = snapshot
            .max_weight
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(self.default_max_weight);
        self.ground_items = snapshot
            .ground_items
            .into_iter()
            .map(Item::normalized)
            .collect();
        self.recompute_weight();
        tracing::debug!(
            items = self.item_count(),
            weight = self.current_weight,
            max_weight = self.max_weight,
            "inventory snapshot loaded"
        );
    }

    /// Removes (`None`), merges into, or inserts the item at `slot`.
    ///
    /// A stack merged down to amount 0 is removed. Returns whether the grid
    /// changed.
    pub fn upsert_slot(&mut self, slot: usize, patch: Option<ItemPatch>) -> bool {
        let Some(entry) = self.slots.get_mut(slot) else {
            tracing::warn!(slot, "slot update outside the grid");
            return false;
        };

        let changed = match (patch, entry.take()) {
            (None, existing) => existing.is_some(),
            (Some(patch), Some(mut existing)) => {
                patch.apply(&mut existing);
                let merged = existing.normalized();
                *entry = (merged.amount > 0).then_some(merged);
                true
            }
            (Some(patch), None) => match patch.into_item(slot) {
                Some(item) if item.amount > 0 => {
                    *entry = Some(item);
                    true
                }
                Some(_) => false,
                None => {
                    tracing::warn!(slot, "cannot insert an item without a name");
                    false
                }
            },
        };

        self.recompute_weight();
        changed
    }

    fn recompute_weight(&mut self) {
        self.current_weight = self.items().map(Item::total_weight).sum();
    }

    // ------------------------------------------------------------------
    // Interaction state
    // ------------------------------------------------------------------

    pub fn select_slot(&mut self, slot: usize) {
        self.selected_slot = Some(slot);
    }

    pub fn show_context_menu(&mut self, x: i32, y: i32, item: Item) {
        self.context_menu = ContextMenu {
            visible: true,
            x,
            y,
            item: Some(item),
        };
    }

    pub fn hide_context_menu(&mut self) {
        self.context_menu = ContextMenu::default();
    }

    /// Starts dragging the item at `slot`. No-op on an empty slot.
    pub fn begin_relocation(&mut self, slot: usize) -> bool {
        let Some(item) = self.item_at(slot).cloned() else {
            tracing::debug!(slot, "nothing to relocate");
            return false;
        };
        tracing::debug!(slot, item = %item.name, "relocation started");
        self.drag = Some(DragState {
            source_slot: slot,
            item,
        });
        true
    }

    /// Ends the drag and asks the host to move the item.
    ///
    /// The drag state is cleared immediately; the grid only changes when the
    /// host pushes the result.
    pub fn complete_relocation(&mut self, target_slot: usize) -> Option<UiEffect> {
        let drag = self.drag.take()?;
        tracing::debug!(from = drag.source_slot, to = target_slot, "relocation requested");
        Some(UiEffect::Request(HostRequest::MoveItem {
            from_slot: drag.source_slot,
            to_slot: target_slot,
        }))
    }

    pub fn cancel_relocation(&mut self) {
        self.drag = None;
    }

    pub fn use_item(&self, item: &Item, slot: usize) -> UiEffect {
        tracing::debug!(slot, item = %item.name, "using item");
        UiEffect::Request(HostRequest::UseItem {
            item_name: item.name.clone(),
            slot,
            zone: MAIN_ZONE.to_string(),
            amount: 1,
        })
    }

    pub fn drop_item(&self, item: &Item, slot: usize, amount: u32) -> UiEffect {
        let amount = amount.max(1);
        tracing::debug!(slot, amount, item = %item.name, "dropping item");
        UiEffect::Request(HostRequest::DropItem { slot, amount })
    }

    pub fn give_item(&self, item: &Item, slot: usize, amount: u32) -> UiEffect {
        let amount = amount.max(1);
        tracing::debug!(slot, amount, item = %item.name, "giving item");
        UiEffect::Request(HostRequest::GiveItem { slot, amount })
    }

    /// Applies `action` to the context-menu target, then hides the menu.
    pub fn context_action(&mut self, action: ContextAction) -> Option<UiEffect> {
        let item = self.context_menu.item.take()?;
        self.hide_context_menu();
        let effect = match action {
            ContextAction::Use => self.use_item(&item, item.slot),
            ContextAction::Drop => self.drop_item(&item, item.slot, 1),
            ContextAction::Give => self.give_item(&item, item.slot, 1),
        };
        Some(effect)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Present items in slot order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().flatten()
    }

    pub fn item_at(&self, slot: usize) -> Option<&Item> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    pub fn max_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn current_weight(&self) -> f64 {
        self.current_weight
    }

    pub fn ground_items(&self) -> &[Item] {
        &self.ground_items
    }

    pub fn selected_slot(&self) -> Option<usize> {
        self.selected_slot
    }

    pub fn context_menu(&self) -> &ContextMenu {
        &self.context_menu
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn free_slots(&self) -> usize {
        self.max_slots() - self.item_count()
    }

    /// Load as a percentage of the carry limit, capped at 100.
    pub fn weight_percent(&self) -> f64 {
        if self.max_weight <= 0.0 {
            return if self.current_weight > 0.0 { 100.0 } else { 0.0 };
        }
        (self.current_weight / self.max_weight * 100.0).min(100.0)
    }

    pub fn is_full(&self) -> bool {
        self.current_weight >= self.max_weight
    }

    /// Dense view of every slot, empty or not.
    pub fn slots_grid(&self) -> Vec<SlotView<'_>> {
        self.slots
            .iter()
            .enumerate()
            .map(|(slot, item)| SlotView {
                slot,
                item: item.as_ref(),
            })
            .collect()
    }
}

//! Inbox channel types.
//!
//! Spawned effects and `HudHandle` send `UiEvent`s here; the runtime loop
//! drains them between host lines.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

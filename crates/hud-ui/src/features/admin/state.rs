//! Admin console data.
//!
//! Only the lists the console displays live here. Commands that act on the
//! game world are sent by the host-side console and never pass through this
//! store.

use serde::Deserialize;
use serde_json::Value;

use crate::effects::{HostRequest, UiEffect};

/// Sidebar categories, in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminCategory {
    #[default]
    Players,
    Teleport,
    Vehicles,
    Items,
    Weather,
    Time,
    Noclip,
    Settings,
}

impl AdminCategory {
    pub const ALL: [AdminCategory; 8] = [
        AdminCategory::Players,
        AdminCategory::Teleport,
        AdminCategory::Vehicles,
        AdminCategory::Items,
        AdminCategory::Weather,
        AdminCategory::Time,
        AdminCategory::Noclip,
        AdminCategory::Settings,
    ];

    pub fn id(self) -> &'static str {
        match self {
            AdminCategory::Players => "players",
            AdminCategory::Teleport => "teleport",
            AdminCategory::Vehicles => "vehicles",
            AdminCategory::Items => "items",
            AdminCategory::Weather => "weather",
            AdminCategory::Time => "time",
            AdminCategory::Noclip => "noclip",
            AdminCategory::Settings => "settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdminCategory::Players => "Spieler",
            AdminCategory::Teleport => "Teleport",
            AdminCategory::Vehicles => "Fahrzeuge",
            AdminCategory::Items => "Items",
            AdminCategory::Weather => "Wetter",
            AdminCategory::Time => "Zeit",
            AdminCategory::Noclip => "Noclip",
            AdminCategory::Settings => "Einstellungen",
        }
    }

    /// Request that loads this category's list, if it has one.
    fn load_request(self) -> Option<HostRequest> {
        match self {
            AdminCategory::Players => Some(HostRequest::AdminPlayers),
            AdminCategory::Vehicles => Some(HostRequest::AdminVehicles),
            AdminCategory::Items => Some(HostRequest::AdminItems),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminPlayer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub steamid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminVehicle {
    pub model: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminItem {
    pub name: String,
    #[serde(default)]
    pub label: String,
}

/// Reply shape shared by the list requests: `{players|vehicles|items: [...]}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListReply {
    players: Option<Vec<AdminPlayer>>,
    vehicles: Option<Vec<AdminVehicle>>,
    items: Option<Vec<AdminItem>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    is_open: bool,
    selected_category: AdminCategory,
    selected_player: Option<u64>,
    players: Vec<AdminPlayer>,
    vehicles: Vec<AdminVehicle>,
    items: Vec<AdminItem>,
}

impl AdminState {
    /// Marks the console open and requests the player list.
    pub fn open(&mut self) -> Vec<UiEffect> {
        self.is_open = true;
        tracing::debug!("admin console opened");
        vec![UiEffect::Request(HostRequest::AdminPlayers)]
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.selected_player = None;
        tracing::debug!("admin console closed");
    }

    pub fn select_category(&mut self, category: AdminCategory) -> Vec<UiEffect> {
        self.selected_category = category;
        tracing::debug!(category = category.id(), "admin category selected");
        category
            .load_request()
            .map(UiEffect::Request)
            .into_iter()
            .collect()
    }

    /// Selects an online player by id. Unknown ids are ignored.
    pub fn select_player(&mut self, id: u64) -> bool {
        if self.players.iter().any(|p| p.id == id) {
            self.selected_player = Some(id);
            true
        } else {
            tracing::warn!(player = id, "selected player is not online");
            false
        }
    }

    /// Stores a list reply. A reply without the expected key is ignored.
    pub fn apply_reply(&mut self, request: &HostRequest, data: &Value) {
        let reply = match ListReply::deserialize(data) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, action = %request.action(), "malformed admin reply");
                return;
            }
        };
        match request {
            HostRequest::AdminPlayers => {
                if let Some(players) = reply.players {
                    self.players = players;
                    if let Some(id) = self.selected_player
                        && !self.players.iter().any(|p| p.id == id)
                    {
                        self.selected_player = None;
                    }
                }
            }
            HostRequest::AdminVehicles => {
                if let Some(vehicles) = reply.vehicles {
                    self.vehicles = vehicles;
                }
            }
            HostRequest::AdminItems => {
                if let Some(items) = reply.items {
                    self.items = items;
                }
            }
            _ => {}
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_category(&self) -> AdminCategory {
        self.selected_category
    }

    pub fn selected_player(&self) -> Option<&AdminPlayer> {
        let id = self.selected_player?;
        self.players.iter().find(|p| p.id == id)
    }

    pub fn players(&self) -> &[AdminPlayer] {
        &self.players
    }

    pub fn vehicles(&self) -> &[AdminVehicle] {
        &self.vehicles
    }

    pub fn items(&self) -> &[AdminItem] {
        &self.items
    }

    pub fn online_players_count(&self) -> usize {
        self.players.len()
    }
}

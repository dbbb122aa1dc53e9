//! Process-wide UI state tracker.
//!
//! Follows panel lifecycle events to know which panel is current, and keeps
//! the player stats the host pushes.

use serde::Deserialize;
use serde_json::Value;

use crate::panels::PanelEvent;

fn clamp_stat(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub id: u64,
    pub name: String,
    pub health: f64,
    pub armor: f64,
    pub hunger: f64,
    pub thirst: f64,
    pub cash: i64,
    pub bank: i64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            health: 100.0,
            armor: 0.0,
            hunger: 100.0,
            thirst: 100.0,
            cash: 0,
            bank: 0,
        }
    }
}

/// Partial player update. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerPatch {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub health: Option<f64>,
    pub armor: Option<f64>,
    pub hunger: Option<f64>,
    pub thirst: Option<f64>,
    pub cash: Option<i64>,
    pub bank: Option<i64>,
}

impl PlayerPatch {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub language: String,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "de".to_string(),
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppStore {
    current_panel: Option<String>,
    pub player: PlayerStats,
    pub settings: Settings,
}

impl AppStore {
    pub fn on_panel_event(&mut self, event: &PanelEvent) {
        match event {
            PanelEvent::Opened { name, .. } => self.current_panel = Some(name.clone()),
            PanelEvent::Closed { name } => {
                if self.current_panel.as_deref() == Some(name.as_str()) {
                    self.current_panel = None;
                }
            }
        }
        tracing::debug!(current = ?self.current_panel, "current panel");
    }

    pub fn current_panel(&self) -> Option<&str> {
        self.current_panel.as_deref()
    }

    pub fn is_any_panel_open(&self) -> bool {
        self.current_panel.is_some()
    }

    pub fn update_player(&mut self, patch: PlayerPatch) {
        if let Some(id) = patch.id {
            self.player.id = id;
        }
        if let Some(name) = patch.name {
            self.player.name = name;
        }
        if let Some(health) = patch.health {
            self.set_health(health);
        }
        if let Some(armor) = patch.armor {
            self.set_armor(armor);
        }
        if let Some(hunger) = patch.hunger {
            self.set_hunger(hunger);
        }
        if let Some(thirst) = patch.thirst {
            self.set_thirst(thirst);
        }
        if patch.cash.is_some() || patch.bank.is_some() {
            self.set_money(
                patch.cash.unwrap_or(self.player.cash),
                patch.bank.unwrap_or(self.player.bank),
            );
        }
    }

    pub fn set_health(&mut self, value: f64) {
        self.player.health = clamp_stat(value);
    }

    pub fn set_armor(&mut self, value: f64) {
        self.player.armor = clamp_stat(value);
    }

    pub fn set_hunger(&mut self, value: f64) {
        self.player.hunger = clamp_stat(value);
    }

    pub fn set_thirst(&mut self, value: f64) {
        self.player.thirst = clamp_stat(value);
    }

    pub fn set_money(&mut self, cash: i64, bank: i64) {
        self.player.cash = cash;
        self.player.bank = bank;
    }

    pub fn health_percent(&self) -> f64 {
        self.player.health
    }

    pub fn armor_percent(&self) -> f64 {
        self.player.armor
    }

    /// Forgets the current panel and the player. Settings stay.
    pub fn reset(&mut self) {
        self.current_panel = None;
        self.player = PlayerStats::default();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn opened(name: &str) -> PanelEvent {
        PanelEvent::Opened {
            name: name.to_string(),
            data: Value::Null,
        }
    }

    fn closed(name: &str) -> PanelEvent {
        PanelEvent::Closed {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_tracks_current_panel() {
        let mut app = AppStore::default();
        app.on_panel_event(&opened("inventory"));
        app.on_panel_event(&opened("garage"));
        app.on_panel_event(&closed("inventory"));
        assert_eq!(app.current_panel(), Some("garage"));

        app.on_panel_event(&closed("garage"));
        assert!(!app.is_any_panel_open());
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut app = AppStore::default();
        app.set_money(10, 500);
        let patch = PlayerPatch::from_value(&json!({"health": 140, "cash": 25})).unwrap();
        app.update_player(patch);

        assert!((app.player.health - 100.0).abs() < f64::EPSILON);
        assert!((app.player.hunger - 100.0).abs() < f64::EPSILON);
        assert_eq!((app.player.cash, app.player.bank), (25, 500));
    }

    #[test]
    fn test_stats_are_clamped() {
        let mut app = AppStore::default();
        app.set_armor(-5.0);
        app.set_thirst(f64::NAN);
        assert!(app.armor_percent().abs() < f64::EPSILON);
        assert!(app.player.thirst.abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_keeps_settings() {
        let mut app = AppStore::default();
        app.settings.language = "en".to_string();
        app.on_panel_event(&opened("admin"));
        app.set_health(12.0);
        app.reset();

        assert_eq!(app.current_panel(), None);
        assert_eq!(app.player, PlayerStats::default());
        assert_eq!(app.settings.language, "en");
    }
}

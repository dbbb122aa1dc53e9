//! Panel registry and lifecycle coordinator.
//!
//! Panels are independently openable UI surfaces (inventory, admin console,
//! garage). The coordinator owns every registration for the life of the
//! process and arbitrates which panels may be open together:
//!
//! - Opening an exclusive panel closes every other open panel first.
//! - Opening a non-exclusive panel closes any open exclusive panel first.
//! - An open exclusive panel is therefore always the only open panel.
//!
//! Closes triggered by an open run one at a time in registry order, each
//! running its close hook before the next starts.
//!
//! The coordinator is generic over the store type `S` handed to hooks, and
//! over the focus arbiter `F`. Hooks never see the coordinator itself, so a
//! hook cannot re-enter open/close mid-transition.

pub mod builtin;

use hud_core::bridge::Subscriptions;
use hud_core::focus::{FocusArbiter, FocusTable};
use indexmap::IndexMap;
use serde_json::Value;

use crate::effects::UiEffect;
use crate::routes::HostRoute;

/// Hook run after a panel is marked open, with the open payload.
pub type OpenHook<S> = Box<dyn FnMut(&mut S, &Value) -> Vec<UiEffect>>;

/// Hook run after a panel is marked closed.
pub type CloseHook<S> = Box<dyn FnMut(&mut S) -> Vec<UiEffect>>;

/// Host action that closes the panel `name`: `close` + capitalized name.
pub fn close_action(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("close{}{}", first.to_uppercase(), chars.as_str()),
        None => "close".to_string(),
    }
}

// ============================================================================
// Configuration / events / errors
// ============================================================================

/// Registration options for a panel.
pub struct PanelConfig<S> {
    pub name: String,
    /// Opening this panel force-closes every other open panel.
    pub exclusive: bool,
    /// Host actions that open this panel.
    pub trigger_actions: Vec<String>,
    pub on_open: Option<OpenHook<S>>,
    pub on_close: Option<CloseHook<S>>,
}

impl<S> PanelConfig<S> {
    /// New exclusive panel with no triggers and no hooks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exclusive: true,
            trigger_actions: Vec::new(),
            on_open: None,
            on_close: None,
        }
    }

    #[must_use]
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    #[must_use]
    pub fn trigger(mut self, action: impl Into<String>) -> Self {
        self.trigger_actions.push(action.into());
        self
    }

    #[must_use]
    pub fn triggers<I, A>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.trigger_actions = actions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn on_open(mut self, hook: impl FnMut(&mut S, &Value) -> Vec<UiEffect> + 'static) -> Self {
        self.on_open = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_close(mut self, hook: impl FnMut(&mut S) -> Vec<UiEffect> + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }
}

impl<S> std::fmt::Debug for PanelConfig<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelConfig")
            .field("name", &self.name)
            .field("exclusive", &self.exclusive)
            .field("trigger_actions", &self.trigger_actions)
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// Lifecycle notifications for external listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    Opened { name: String, data: Value },
    Closed { name: String },
}

impl PanelEvent {
    pub fn name(&self) -> &str {
        match self {
            PanelEvent::Opened { name, .. } | PanelEvent::Closed { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("panel {0} is already registered")]
    AlreadyRegistered(String),
    #[error("panel name must not be empty")]
    EmptyName,
}

/// Read-only view of one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelInfo {
    pub name: String,
    pub exclusive: bool,
    pub trigger_actions: Vec<String>,
    pub close_action: String,
    pub is_open: bool,
}

struct Panel<S> {
    exclusive: bool,
    trigger_actions: Vec<String>,
    is_open: bool,
    on_open: Option<OpenHook<S>>,
    on_close: Option<CloseHook<S>>,
}

// ============================================================================
// PanelCoordinator
// ============================================================================

/// Owns panel registrations, open state, the active panel and focus claims.
pub struct PanelCoordinator<S, F = FocusTable> {
    panels: IndexMap<String, Panel<S>>,
    active: Option<String>,
    focus: F,
}

impl<S> PanelCoordinator<S> {
    pub fn new() -> Self {
        Self::with_focus(FocusTable::new())
    }
}

impl<S> Default for PanelCoordinator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, F: FocusArbiter> PanelCoordinator<S, F> {
    pub fn with_focus(focus: F) -> Self {
        Self {
            panels: IndexMap::new(),
            active: None,
            focus,
        }
    }

    /// Registers a panel and subscribes its open/close routes.
    ///
    /// A duplicate name is rejected; the first registration stays untouched.
    pub fn register(
        &mut self,
        config: PanelConfig<S>,
        routes: &mut Subscriptions<HostRoute>,
    ) -> Result<(), PanelError> {
        let PanelConfig {
            name,
            exclusive,
            trigger_actions,
            on_open,
            on_close,
        } = config;

        if name.is_empty() {
            tracing::warn!("rejected panel registration without a name");
            return Err(PanelError::EmptyName);
        }
        if self.panels.contains_key(&name) {
            tracing::warn!(panel = %name, "panel is already registered");
            return Err(PanelError::AlreadyRegistered(name));
        }

        for action in &trigger_actions {
            routes.on(action.clone(), HostRoute::OpenPanel(name.clone()));
        }
        routes.on(close_action(&name), HostRoute::ClosePanel(name.clone()));

        tracing::debug!(panel = %name, exclusive, actions = ?trigger_actions, "panel registered");
        self.panels.insert(
            name,
            Panel {
                exclusive,
                trigger_actions,
                is_open: false,
                on_open,
                on_close,
            },
        );
        Ok(())
    }

    /// Opens `name`, closing whatever conflicts with it first.
    pub fn open(&mut self, name: &str, data: Value, store: &mut S) -> Vec<UiEffect> {
        let mut effects = Vec::new();

        let Some(index) = self.panels.get_index_of(name) else {
            tracing::error!(panel = name, "cannot open unknown panel");
            return effects;
        };
        let panel = &self.panels[index];
        if panel.is_open {
            tracing::debug!(panel = name, "panel is already open");
            return effects;
        }

        if panel.exclusive {
            self.close_others_into(name, store, &mut effects);
        } else {
            let exclusive_open: Vec<String> = self
                .panels
                .iter()
                .filter(|(_, p)| p.is_open && p.exclusive)
                .map(|(n, _)| n.clone())
                .collect();
            for other in exclusive_open {
                self.close_into(&other, store, &mut effects);
            }
        }

        tracing::debug!(panel = name, ?data, "opening panel");
        let panel = &mut self.panels[index];
        panel.is_open = true;
        self.focus.request(name);
        if let Some(hook) = panel.on_open.as_mut() {
            effects.extend(hook(store, &data));
        }
        self.active = Some(name.to_string());
        effects.push(UiEffect::Lifecycle(PanelEvent::Opened {
            name: name.to_string(),
            data,
        }));
        effects
    }

    /// Closes `name` if it is open.
    pub fn close(&mut self, name: &str, store: &mut S) -> Vec<UiEffect> {
        let mut effects = Vec::new();
        self.close_into(name, store, &mut effects);
        effects
    }

    /// Closes every open panel except `except`.
    pub fn close_others(&mut self, except: &str, store: &mut S) -> Vec<UiEffect> {
        let mut effects = Vec::new();
        self.close_others_into(except, store, &mut effects);
        effects
    }

    /// Closes every open panel, then drops all focus claims.
    pub fn close_all(&mut self, store: &mut S) -> Vec<UiEffect> {
        tracing::debug!("closing all panels");
        let mut effects = Vec::new();
        for name in self.open_names(None) {
            self.close_into(&name, store, &mut effects);
        }
        // Also clears claims a close path may have left behind.
        self.focus.release_all();
        effects
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.panels.get(name).is_some_and(|p| p.is_open)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.panels.contains_key(name)
    }

    /// Most recently opened panel that is still open.
    pub fn active_panel(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Registrations in registry order.
    pub fn list_panels(&self) -> Vec<PanelInfo> {
        self.panels
            .iter()
            .map(|(name, p)| PanelInfo {
                name: name.clone(),
                exclusive: p.exclusive,
                trigger_actions: p.trigger_actions.clone(),
                close_action: close_action(name),
                is_open: p.is_open,
            })
            .collect()
    }

    /// Names of open panels in registry order.
    pub fn open_panels(&self) -> impl Iterator<Item = &str> {
        self.panels
            .iter()
            .filter(|(_, p)| p.is_open)
            .map(|(n, _)| n.as_str())
    }

    pub fn focus(&self) -> &F {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut F {
        &mut self.focus
    }

    fn open_names(&self, except: Option<&str>) -> Vec<String> {
        self.panels
            .iter()
            .filter(|(n, p)| p.is_open && Some(n.as_str()) != except)
            .map(|(n, _)| n.clone())
            .collect()
    }

    fn close_others_into(&mut self, except: &str, store: &mut S, effects: &mut Vec<UiEffect>) {
        for name in self.open_names(Some(except)) {
            self.close_into(&name, store, effects);
        }
    }

    fn close_into(&mut self, name: &str, store: &mut S, effects: &mut Vec<UiEffect>) {
        let Some(panel) = self.panels.get_mut(name) else {
            tracing::error!(panel = name, "cannot close unknown panel");
            return;
        };
        if !panel.is_open {
            return;
        }

        tracing::debug!(panel = name, "closing panel");
        panel.is_open = false;
        self.focus.release(name);
        if let Some(hook) = panel.on_close.as_mut() {
            effects.extend(hook(store));
        }
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        effects.push(UiEffect::Lifecycle(PanelEvent::Closed {
            name: name.to_string(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    type Log = Vec<String>;

    fn recorded(name: &'static str) -> PanelConfig<Log> {
        PanelConfig::new(name)
            .on_open(move |log: &mut Log, _| {
                log.push(format!("open:{name}"));
                Vec::new()
            })
            .on_close(move |log: &mut Log| {
                log.push(format!("close:{name}"));
                Vec::new()
            })
    }

    fn setup() -> (PanelCoordinator<Log>, Subscriptions<HostRoute>, Log) {
        let mut panels = PanelCoordinator::new();
        let mut routes = Subscriptions::new();
        panels
            .register(recorded("a").exclusive(true).trigger("openA"), &mut routes)
            .unwrap();
        panels
            .register(recorded("b").exclusive(false).trigger("openB"), &mut routes)
            .unwrap();
        panels
            .register(recorded("c").exclusive(false).trigger("openC"), &mut routes)
            .unwrap();
        (panels, routes, Vec::new())
    }

    fn lifecycle(effects: &[UiEffect]) -> Vec<PanelEvent> {
        effects
            .iter()
            .filter_map(|e| match e {
                UiEffect::Lifecycle(ev) => Some(ev.clone()),
                UiEffect::Request(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_close_action_naming() {
        assert_eq!(close_action("inventory"), "closeInventory");
        assert_eq!(close_action("Admin"), "closeAdmin");
        assert_eq!(close_action("ärmel"), "closeÄrmel");
    }

    #[test]
    fn test_register_subscribes_routes() {
        let (_, routes, _) = setup();
        assert_eq!(
            routes.handlers("openA").cloned().collect::<Vec<_>>(),
            vec![HostRoute::OpenPanel("a".to_string())]
        );
        assert_eq!(
            routes.handlers("closeB").cloned().collect::<Vec<_>>(),
            vec![HostRoute::ClosePanel("b".to_string())]
        );
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let (mut panels, mut routes, _) = setup();
        let err = panels
            .register(recorded("a").exclusive(false).trigger("other"), &mut routes)
            .unwrap_err();
        assert_eq!(err, PanelError::AlreadyRegistered("a".to_string()));

        let info = panels.list_panels();
        let a = info.iter().find(|p| p.name == "a").unwrap();
        assert!(a.exclusive);
        assert_eq!(a.trigger_actions, vec!["openA".to_string()]);
        assert!(!routes.is_subscribed("other"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut panels: PanelCoordinator<Log> = PanelCoordinator::new();
        let mut routes = Subscriptions::new();
        assert_eq!(
            panels.register(PanelConfig::new(""), &mut routes),
            Err(PanelError::EmptyName)
        );
    }

    #[test]
    fn test_open_is_idempotent() {
        let (mut panels, _, mut log) = setup();
        let first = panels.open("b", json!({"n": 1}), &mut log);
        let second = panels.open("b", json!({"n": 2}), &mut log);

        assert_eq!(log, vec!["open:b"]);
        assert_eq!(
            lifecycle(&first),
            vec![PanelEvent::Opened {
                name: "b".to_string(),
                data: json!({"n": 1})
            }]
        );
        assert!(second.is_empty());
        assert!(panels.focus().is_claimed("b"));
    }

    #[test]
    fn test_exclusive_open_closes_others_first() {
        let (mut panels, _, mut log) = setup();
        panels.open("b", Value::Null, &mut log);
        panels.open("c", Value::Null, &mut log);
        let effects = panels.open("a", Value::Null, &mut log);

        assert_eq!(log, vec!["open:b", "open:c", "close:b", "close:c", "open:a"]);
        assert_eq!(panels.active_panel(), Some("a"));
        assert_eq!(panels.open_panels().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(
            lifecycle(&effects)
                .iter()
                .map(PanelEvent::name)
                .collect::<Vec<_>>(),
            vec!["b", "c", "a"]
        );
        assert_eq!(panels.focus().claims(), ["a".to_string()]);
    }

    #[test]
    fn test_non_exclusive_open_closes_exclusive() {
        let (mut panels, _, mut log) = setup();
        panels.open("a", Value::Null, &mut log);
        panels.open("b", Value::Null, &mut log);

        assert_eq!(log, vec!["open:a", "close:a", "open:b"]);
        assert!(!panels.is_open("a"));
        assert!(panels.is_open("b"));
    }

    #[test]
    fn test_non_exclusive_panels_coexist() {
        let (mut panels, _, mut log) = setup();
        panels.open("b", Value::Null, &mut log);
        panels.open("c", Value::Null, &mut log);
        assert!(panels.is_open("b") && panels.is_open("c"));
        assert_eq!(panels.active_panel(), Some("c"));
    }

    #[test]
    fn test_open_close_restores_active_panel() {
        let (mut panels, _, mut log) = setup();
        panels.open("a", Value::Null, &mut log);
        panels.close("a", &mut log);
        assert_eq!(panels.active_panel(), None);
        assert!(!panels.focus().has_focus());
    }

    #[test]
    fn test_closing_other_panel_keeps_active() {
        let (mut panels, _, mut log) = setup();
        panels.open("b", Value::Null, &mut log);
        panels.open("c", Value::Null, &mut log);
        panels.close("b", &mut log);
        assert_eq!(panels.active_panel(), Some("c"));
    }

    #[test]
    fn test_closing_active_panel_clears_it_even_if_others_are_open() {
        let (mut panels, _, mut log) = setup();
        panels.open("b", Value::Null, &mut log);
        panels.open("c", Value::Null, &mut log);
        panels.close("c", &mut log);
        // The previously active panel is not restored.
        assert_eq!(panels.active_panel(), None);
        assert!(panels.is_open("b"));
        assert!(panels.focus().has_focus());
    }

    #[test]
    fn test_close_when_closed_is_silent() {
        let (mut panels, _, mut log) = setup();
        assert!(panels.close("b", &mut log).is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_unknown_panel_leaves_state_unchanged() {
        let (mut panels, _, mut log) = setup();
        panels.open("b", Value::Null, &mut log);
        let before = panels.list_panels();

        assert!(panels.close("ghost", &mut log).is_empty());
        assert!(panels.open("ghost", Value::Null, &mut log).is_empty());

        assert_eq!(panels.list_panels(), before);
        assert_eq!(panels.focus().claims(), ["b".to_string()]);
        assert_eq!(panels.active_panel(), Some("b"));
        assert_eq!(log, vec!["open:b"]);
    }

    #[test]
    fn test_close_all_releases_stale_focus() {
        let (mut panels, _, mut log) = setup();
        panels.open("b", Value::Null, &mut log);
        panels.open("c", Value::Null, &mut log);
        panels.focus_mut().request("stale");

        let effects = panels.close_all(&mut log);
        assert_eq!(lifecycle(&effects).len(), 2);
        assert_eq!(panels.open_panels().count(), 0);
        assert!(!panels.focus().has_focus());
        assert_eq!(panels.active_panel(), None);
    }

    #[test]
    fn test_close_others_keeps_named_panel() {
        let (mut panels, _, mut log) = setup();
        panels.open("b", Value::Null, &mut log);
        panels.open("c", Value::Null, &mut log);
        panels.close_others("c", &mut log);
        assert_eq!(panels.open_panels().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_hook_effects_precede_lifecycle_event() {
        let mut panels: PanelCoordinator<Log> = PanelCoordinator::new();
        let mut routes = Subscriptions::new();
        panels
            .register(
                PanelConfig::new("garage").on_open(|_: &mut Log, _| {
                    vec![UiEffect::Request(crate::effects::HostRequest::GarageVehicles)]
                }),
                &mut routes,
            )
            .unwrap();
        let mut log = Vec::new();
        let effects = panels.open("garage", Value::Null, &mut log);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Request(_), UiEffect::Lifecycle(PanelEvent::Opened { .. })]
        ));
    }
}

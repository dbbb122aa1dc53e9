//! HUD runtime: owns the bridge, runs the event loop, executes effects.
//!
//! This is the boundary where side effects happen. The reducer stays pure and
//! produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Spawned effects (bridge replies) send `UiEvent`s to `inbox_tx`
//! - `HudHandle` forwards user intents through the same channel
//! - The loop handles one event at a time, so every reducer pass completes
//!   before the next input is looked at
//!
//! Structure:
//! - `mod.rs`: `HudRuntime`, event loop, effect dispatch
//! - `inbox.rs`: inbox channel types
//! - `handlers.rs`: async effect handlers

mod handlers;
mod inbox;

use std::future::Future;

use anyhow::{Context, Result};
use hud_core::bridge::wire::{self, HostMessage};
use hud_core::bridge::{HostBridge, OutboundMessage};
use hud_core::config::Config;
use inbox::{UiEventReceiver, UiEventSender};
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::effects::UiEffect;
use crate::events::{UiEvent, UserIntent};
use crate::panels::PanelEvent;
use crate::state::AppState;
use crate::update;

/// Notification telling the host whether the HUD wants input.
pub const SET_FOCUS: &str = "setNuiFocus";

const LIFECYCLE_CAPACITY: usize = 64;

/// Cloneable handle for feeding intents into a running `HudRuntime`.
#[derive(Debug, Clone)]
pub struct HudHandle {
    inbox_tx: UiEventSender,
    shutdown: CancellationToken,
}

impl HudHandle {
    /// Queues a user intent. Returns false once the runtime is gone.
    pub fn intent(&self, intent: UserIntent) -> bool {
        self.inbox_tx.send(UiEvent::Intent(intent)).is_ok()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

pub struct HudRuntime {
    state: AppState,
    bridge: HostBridge,
    outbound_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    lifecycle_tx: broadcast::Sender<PanelEvent>,
    shutdown: CancellationToken,
    /// Requests whose `RequestCompleted` has not been dispatched yet.
    in_flight: usize,
}

impl HudRuntime {
    pub fn new(config: Config) -> Self {
        let (bridge, outbound_rx) = HostBridge::new();
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (lifecycle_tx, _) = broadcast::channel(LIFECYCLE_CAPACITY);

        Self {
            state: AppState::new(config),
            bridge,
            outbound_rx,
            inbox_tx,
            inbox_rx,
            lifecycle_tx,
            shutdown: CancellationToken::new(),
            in_flight: 0,
        }
    }

    pub fn handle(&self) -> HudHandle {
        HudHandle {
            inbox_tx: self.inbox_tx.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    /// Panel opened/closed events, for listeners outside the reducer.
    pub fn subscribe_lifecycle(&self) -> broadcast::Receiver<PanelEvent> {
        self.lifecycle_tx.subscribe()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serves the bridge until the host closes `reader` or shutdown is
    /// requested.
    ///
    /// On exit, pending requests fail with `Disconnected`, those failures go
    /// through the reducer, and queued outbound messages are flushed.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        tracing::info!(panels = self.state.panels.list_panels().len(), "hud runtime started");

        loop {
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => {
                    tracing::debug!("shutdown requested");
                    break;
                }
                Some(message) = self.outbound_rx.recv() => {
                    write_message(&mut writer, &message).await?;
                }
                Some(event) = self.inbox_rx.recv() => {
                    self.dispatch_event(event);
                }
                line = lines.next_line() => {
                    match line.context("Failed to read from host")? {
                        Some(line) => self.handle_line(&line),
                        None => {
                            tracing::debug!("host closed the bridge");
                            break;
                        }
                    }
                }
            }
        }

        self.bridge.fail_all();
        self.drain_replies().await;
        while let Ok(message) = self.outbound_rx.try_recv() {
            write_message(&mut writer, &message).await?;
        }
        writer.flush().await.context("Failed to flush host output")?;
        tracing::info!("hud runtime stopped");
        Ok(())
    }

    fn handle_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        match wire::decode_host_message(line) {
            Ok(HostMessage::Event { action, data }) => {
                tracing::trace!(%action, "host event");
                self.dispatch_event(UiEvent::Host { action, data });
            }
            Ok(HostMessage::Reply { id, data, error }) => {
                self.bridge.resolve(id, wire::reply_result(data, error));
            }
            Err(e) => tracing::warn!(error = %e, "skipping malformed host line"),
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn dispatch_event(&mut self, event: UiEvent) {
        if matches!(event, UiEvent::RequestCompleted { .. }) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
        self.sync_focus();
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Request(request) => {
                let reply = self.bridge.send(request.action(), request.payload());
                self.in_flight += 1;
                tracing::debug!(id = reply.id().0, action = %request.action(), "request sent");
                self.spawn_effect(move || handlers::await_reply(request, reply));
            }
            UiEffect::Lifecycle(event) => {
                // No subscribers is fine.
                let _ = self.lifecycle_tx.send(event);
            }
        }
    }

    /// Waits for every in-flight request to report back and applies the
    /// outcome. Runs after `fail_all`, so each one resolves.
    async fn drain_replies(&mut self) {
        while self.in_flight > 0 {
            let Some(event) = self.inbox_rx.recv().await else {
                break;
            };
            match event {
                UiEvent::RequestCompleted { .. } => self.dispatch_event(event),
                other => tracing::debug!(event = ?other, "dropping event after shutdown"),
            }
        }
    }

    /// Spawns an async handler and sends its result to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    /// Tells the host when the HUD gains or loses input focus.
    fn sync_focus(&mut self) {
        let Some(has_focus) = self.state.panels.focus_mut().take_change() else {
            return;
        };
        tracing::debug!(has_focus, "focus changed");
        let payload = json!({ "hasFocus": has_focus, "hasCursor": has_focus });
        if let Err(e) = self.bridge.notify(SET_FOCUS, payload) {
            tracing::warn!(error = %e, "could not report focus change");
        }
    }
}

async fn write_message<W>(writer: &mut W, message: &OutboundMessage) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = wire::encode_message(message)?;
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .await
        .context("Failed to write to host")?;
    writer.flush().await.context("Failed to flush host output")
}

//! Message bridge to the game-engine host.
//!
//! The bridge is split in two halves:
//!
//! - `Subscriptions<H>`: inbound table keyed by action name. Handlers are plain
//!   values (usually a route enum) so the owner decides how to dispatch them.
//! - `HostBridge`: outbound request queue. Every `send` gets a `RequestId`; the
//!   host answers with a reply carrying the same id, which resolves the
//!   matching `PendingReply`.
//!
//! Transport is not handled here. The owner drains the outbound receiver and
//! feeds decoded replies back through `HostBridge::resolve`. See `wire` for the
//! line-delimited JSON encoding.

pub mod wire;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by bridge requests.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The host answered with an error.
    #[error("host rejected request: {0}")]
    Rejected(String),

    /// The transport closed before (or while) the request was sent.
    #[error("host bridge disconnected")]
    Disconnected,

    /// The bridge was dropped without ever answering.
    #[error("reply channel dropped before the host answered")]
    Dropped,

    /// A message could not be encoded or decoded.
    #[error("malformed bridge message: {0}")]
    Codec(#[from] serde_json::Error),
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Handle returned by `Subscriptions::on`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Inbound subscription table keyed by host action name.
#[derive(Debug)]
pub struct Subscriptions<H> {
    next_id: u64,
    table: HashMap<String, Vec<(SubscriptionId, H)>>,
}

impl<H> Default for Subscriptions<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Subscriptions<H> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            table: HashMap::new(),
        }
    }

    /// Subscribes `handler` to `action`.
    ///
    /// Several handlers may share an action; they are reported in
    /// subscription order.
    pub fn on(&mut self, action: impl Into<String>, handler: H) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.table
            .entry(action.into())
            .or_default()
            .push((id, handler));
        id
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let mut emptied = None;
        let mut removed = false;
        for (action, handlers) in &mut self.table {
            if let Some(pos) = handlers.iter().position(|(sid, _)| *sid == id) {
                handlers.remove(pos);
                removed = true;
                if handlers.is_empty() {
                    emptied = Some(action.clone());
                }
                break;
            }
        }
        if let Some(action) = emptied {
            self.table.remove(&action);
        }
        removed
    }

    /// Handlers subscribed to `action`, in subscription order.
    pub fn handlers(&self, action: &str) -> impl Iterator<Item = &H> {
        self.table
            .get(action)
            .into_iter()
            .flat_map(|handlers| handlers.iter().map(|(_, h)| h))
    }

    pub fn is_subscribed(&self, action: &str) -> bool {
        self.table.contains_key(action)
    }

    /// All actions with at least one subscriber (unordered).
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

// ============================================================================
// Outbound requests
// ============================================================================

/// Correlation id for a request/reply pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

/// A message queued for the host.
///
/// Requests carry an id and expect a reply; notifications don't.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub action: String,
    pub payload: Value,
}

type ReplySender = oneshot::Sender<Result<Value, BridgeError>>;

/// Outbound half of the host bridge.
#[derive(Debug)]
pub struct HostBridge {
    next_id: u64,
    pending: HashMap<RequestId, ReplySender>,
    outbound: mpsc::UnboundedSender<OutboundMessage>,
}

impl HostBridge {
    /// Creates a bridge and the receiver the transport drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let bridge = Self {
            next_id: 1,
            pending: HashMap::new(),
            outbound,
        };
        (bridge, rx)
    }

    /// Queues a request for the host and returns its pending reply.
    ///
    /// If the transport is already gone the reply resolves immediately with
    /// `BridgeError::Disconnected`.
    pub fn send(&mut self, action: impl Into<String>, payload: Value) -> PendingReply {
        let id = RequestId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let (tx, rx) = oneshot::channel();

        let message = OutboundMessage {
            id: Some(id),
            action: action.into(),
            payload,
        };
        tracing::trace!(id = id.0, action = %message.action, "bridge request queued");

        if self.outbound.send(message).is_err() {
            let _ = tx.send(Err(BridgeError::Disconnected));
        } else {
            self.pending.insert(id, tx);
        }

        PendingReply { id, rx }
    }

    /// Queues a message that expects no reply.
    pub fn notify(&mut self, action: impl Into<String>, payload: Value) -> Result<(), BridgeError> {
        self.outbound
            .send(OutboundMessage {
                id: None,
                action: action.into(),
                payload,
            })
            .map_err(|_| BridgeError::Disconnected)
    }

    /// Delivers the host's answer for `id`.
    ///
    /// Returns false for unknown ids (already answered, or never sent).
    pub fn resolve(&mut self, id: RequestId, result: Result<Value, String>) -> bool {
        let Some(tx) = self.pending.remove(&id) else {
            tracing::warn!(id = id.0, "reply for unknown request");
            return false;
        };
        // The caller may have stopped waiting; that is not an error.
        let _ = tx.send(result.map_err(BridgeError::Rejected));
        true
    }

    /// Fails every pending request with `BridgeError::Disconnected`.
    pub fn fail_all(&mut self) {
        for (_, tx) in self.pending.drain() {
            let _ = tx.send(Err(BridgeError::Disconnected));
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Future resolving to the host's reply for one request.
#[derive(Debug)]
pub struct PendingReply {
    id: RequestId,
    rx: oneshot::Receiver<Result<Value, BridgeError>>,
}

impl PendingReply {
    pub fn id(&self) -> RequestId {
        self.id
    }
}

impl Future for PendingReply {
    type Output = Result<Value, BridgeError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.rx).poll(cx).map(|received| match received {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Dropped),
        })
    }
}

//! Effect handlers.
//!
//! Pure async functions returning a `UiEvent`; the runtime spawns them and
//! sends the result to the inbox. They never touch state.

use hud_core::bridge::PendingReply;

use crate::effects::HostRequest;
use crate::events::UiEvent;

/// Waits for the host's answer to `request`.
///
/// There is no timeout: an unanswered request stays pending until the
/// bridge disconnects.
pub async fn await_reply(request: HostRequest, reply: PendingReply) -> UiEvent {
    let id = reply.id();
    let result = reply.await;
    if let Err(e) = &result {
        tracing::debug!(id = id.0, error = %e, "request finished with error");
    }
    UiEvent::RequestCompleted { request, result }
}

//! Line-delimited JSON encoding for the host bridge.
//!
//! Host to HUD:
//!
//! ```text
//! {"type":"event","action":"openInventory","data":{...}}
//! {"type":"reply","id":7,"data":{...}}
//! {"type":"reply","id":7,"error":"reason"}
//! ```
//!
//! HUD to host:
//!
//! ```text
//! {"type":"request","id":7,"action":"moveItem","payload":{...}}
//! {"type":"request","action":"setNuiFocus","payload":{...}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BridgeError, OutboundMessage, RequestId};

/// A decoded line from the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostMessage {
    /// Host-pushed action (open triggers, closes, state updates).
    Event {
        action: String,
        #[serde(default)]
        data: Value,
    },
    /// Answer to a previous request.
    Reply {
        id: RequestId,
        #[serde(default)]
        data: Value,
        #[serde(default)]
        error: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum UiMessage<'a> {
    Request(&'a OutboundMessage),
}

/// Splits a reply into the form `HostBridge::resolve` expects.
pub fn reply_result(data: Value, error: Option<String>) -> Result<Value, String> {
    match error {
        Some(reason) => Err(reason),
        None => Ok(data),
    }
}

/// Decodes one line received from the host.
pub fn decode_host_message(line: &str) -> Result<HostMessage, BridgeError> {
    Ok(serde_json::from_str(line.trim())?)
}

/// Encodes an outbound message as a single line (no trailing newline).
pub fn encode_message(message: &OutboundMessage) -> Result<String, BridgeError> {
    Ok(serde_json::to_string(&UiMessage::Request(message))?)
}

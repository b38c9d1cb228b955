//! Best-effort extraction of a human-readable message from an upstream
//! failure body. The provider nests its own `data`/`message`/`errors` at
//! varying depths depending on which internal endpoint rejected the call.

use serde_json::Value;

/// Walks the response body for the most specific failure payload: unwraps
/// `data` up to two levels, then prefers `message`, then `errors`, and
/// falls back to the remaining body.
pub fn extract_upstream_message(body: &Value) -> String {
    let mut message = body;
    for _ in 0..2 {
        if let Some(inner) = message.get("data") {
            message = inner;
        }
    }
    if let Some(inner) = message.get("message") {
        message = inner;
    } else if let Some(inner) = message.get("errors") {
        message = inner;
    }
    stringify(message)
}

/// Infallible serialization for display. `Value` graphs are trees, so this
/// cannot cycle; a serializer error still degrades to a placeholder rather
/// than panicking.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| "<unserializable>".to_string()),
    }
}

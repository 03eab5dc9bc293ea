//! Keeping n1 request payloads under the API size limit.
//!
//! Every tool response in an agent loop carries a fresh screenshot, so the
//! message history grows with each step. [`trim_images_to_fit`] drops old
//! screenshots until the serialized messages fit again.

use serde_json::{json, Value};

pub const DEFAULT_MAX_REQUEST_BYTES: usize = 9_500_000;
pub const DEFAULT_KEEP_RECENT_SCREENSHOTS: usize = 6;

const OMITTED_PLACEHOLDER: &str = "Screenshot omitted to stay under request size limit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimOutcome {
    /// Serialized size after trimming
    pub size_bytes: usize,
    pub images_removed: usize,
}

/// Size of `messages` as compact UTF-8 JSON.
pub fn estimate_messages_size_bytes(messages: &[Value]) -> usize {
    serde_json::to_vec(messages).map(|v| v.len()).unwrap_or(0)
}

fn is_part_type(part: &Value, kind: &str) -> bool {
    part.get("type").and_then(Value::as_str) == Some(kind)
}

/// Whether the message content holds at least one `image_url` part.
pub fn message_has_image(message: &Value) -> bool {
    message
        .get("content")
        .and_then(Value::as_array)
        .is_some_and(|parts| parts.iter().any(|p| is_part_type(p, "image_url")))
}

/// Remove the first `image_url` part of `message`.
///
/// A placeholder text part is added when no text part remains.
pub(crate) fn strip_one_image(message: &mut Value) -> bool {
    let Some(parts) = message.get_mut("content").and_then(Value::as_array_mut) else {
        return false;
    };
    let Some(index) = parts.iter().position(|p| is_part_type(p, "image_url")) else {
        return false;
    };

    parts.remove(index);
    if !parts.iter().any(|p| is_part_type(p, "text")) {
        parts.push(json!({"type": "text", "text": OMITTED_PLACEHOLDER}));
    }
    true
}

/// Drop old screenshots from `messages` until the payload fits in `max_bytes`.
///
/// The newest `keep_recent` screenshot messages (at least one) are spared
/// while older ones remain; if that is not enough, the protected ones go too,
/// except the very last. Messages already under the limit are untouched.
pub fn trim_images_to_fit(
    messages: &mut [Value],
    max_bytes: usize,
    keep_recent: usize,
) -> TrimOutcome {
    let mut size_bytes = estimate_messages_size_bytes(messages);
    let mut images_removed = 0;

    if size_bytes <= max_bytes {
        return TrimOutcome {
            size_bytes,
            images_removed,
        };
    }

    let image_indices: Vec<usize> = messages
        .iter()
        .enumerate()
        .filter(|(_, m)| message_has_image(m))
        .map(|(i, _)| i)
        .collect();
    let Some(&last) = image_indices.last() else {
        return TrimOutcome {
            size_bytes,
            images_removed,
        };
    };

    let keep_recent = keep_recent.max(1);
    let protected = &image_indices[image_indices.len().saturating_sub(keep_recent)..];

    let passes: [&dyn Fn(usize) -> bool; 2] = [
        &|idx: usize| !protected.contains(&idx),
        &|idx: usize| idx != last,
    ];
    for eligible in passes {
        for &idx in &image_indices {
            if size_bytes <= max_bytes {
                break;
            }
            if eligible(idx) && strip_one_image(&mut messages[idx]) {
                images_removed += 1;
                size_bytes = estimate_messages_size_bytes(messages);
            }
        }
    }

    tracing::debug!(size_bytes, images_removed, "trimmed n1 payload");
    TrimOutcome {
        size_bytes,
        images_removed,
    }
}

//! Media reference extraction
//!
//! Walks an arbitrary JSON payload returned by the orchestrator and collects
//! every string that looks like a rendered video:
//! - Suffix match on `.mp4`, `.mov`, `.webm` (case-insensitive)
//! - Each hit is tagged remote (`http://` / `https://`) or local (filesystem path)
//! - Each hit carries a positional label such as `response.assets.clips[2]`
//!
//! The walk is total: unexpected shapes simply produce fewer entries.

use serde::Serialize;
use serde_json::Value;

/// Video container extensions recognised as media references.
pub const MEDIA_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".webm"];

/// Root label used when the caller does not supply one.
pub const DEFAULT_PREFIX: &str = "response";

/// Nesting depth beyond which values are skipped.
pub const MAX_DEPTH: usize = 128;

/// A media-like string found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaEntry {
    /// Accessor trail from the root, e.g. `response.outputs[0]`
    pub label: String,
    /// The matching string, unmodified
    pub value: String,
    /// `true` for absolute HTTP(S) URLs, `false` for local paths
    pub is_remote: bool,
}

/// Extract media references using the default `response` root label.
pub fn extract_media(source: &Value) -> Vec<MediaEntry> {
    extract_media_with_prefix(source, DEFAULT_PREFIX)
}

/// Extract media references, labelling the root with `prefix`.
///
/// Returns an empty vec when `source` is neither an array nor an object.
pub fn extract_media_with_prefix(source: &Value, prefix: &str) -> Vec<MediaEntry> {
    let mut entries = Vec::new();
    if matches!(source, Value::Array(_) | Value::Object(_)) {
        collect(source, prefix.to_string(), 0, &mut entries);
    }
    entries
}

fn collect(value: &Value, label: String, depth: usize, out: &mut Vec<MediaEntry>) {
    if depth > MAX_DEPTH {
        tracing::warn!(%label, max_depth = MAX_DEPTH, "Payload nested too deep; skipping");
        return;
    }

    match value {
        Value::String(text) => {
            if is_media_reference(text) {
                out.push(MediaEntry {
                    label,
                    value: text.clone(),
                    is_remote: is_remote_url(text),
                });
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect(item, format!("{label}[{index}]"), depth + 1, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                collect(item, format!("{label}.{key}"), depth + 1, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Does `text` end with a known video extension?
pub fn is_media_reference(text: &str) -> bool {
    MEDIA_EXTENSIONS.iter().any(|ext| ends_with_ignore_case(text, ext))
}

/// Is `text` an absolute HTTP(S) URL?
pub fn is_remote_url(text: &str) -> bool {
    starts_with_ignore_case(text, "http://") || starts_with_ignore_case(text, "https://")
}

fn ends_with_ignore_case(text: &str, suffix: &str) -> bool {
    let (text, suffix) = (text.as_bytes(), suffix.as_bytes());
    text.len() >= suffix.len() && text[text.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let (text, prefix) = (text.as_bytes(), prefix.as_bytes());
    text.len() >= prefix.len() && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// First remote entry, suitable for inline preview.
pub fn first_remote(entries: &[MediaEntry]) -> Option<&MediaEntry> {
    entries.iter().find(|e| e.is_remote)
}

/// First local entry, suitable for a copyable path.
pub fn first_local(entries: &[MediaEntry]) -> Option<&MediaEntry> {
    entries.iter().find(|e| !e.is_remote)
}

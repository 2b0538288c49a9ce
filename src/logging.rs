//! Session log panel and structural rendering of device descriptors.
//!
//! Discovered GATT entities are logged as timestamped entries whose body is a
//! depth-bounded textual tree of the entity's descriptor. Descriptors can
//! nest arbitrarily (a service descriptor references its device, which
//! references its services), so rendering always applies a finite depth
//! bound.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use chrono::Local;
use serde::Serialize;
use serde_json::Value;

use crate::core::bluetooth::{FALLBACK_RENDER_DEPTH, RENDER_INDENT};

/// A single entry of the session log panel
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Wall-clock time of the entry, `HH:MM:SS` (24h)
    pub timestamp: String,
    /// Short label describing what was logged
    pub description: String,
    /// Rendered structural body
    pub body: String,
}

/// Append-only sink receiving composed log entries.
pub trait LogSink: Send + Sync {
    fn append_entry(&self, entry: LogEntry);
}

/// In-memory log panel; entries are ordered and never removed.
#[derive(Default)]
pub struct LogPanel {
    entries: Mutex<Vec<LogEntry>>,
}

impl LogPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl LogSink for LogPanel {
    fn append_entry(&self, entry: LogEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

/// Renders descriptors and appends the timestamped result to a sink.
#[derive(Clone)]
pub struct StructuralLogger {
    sink: Arc<dyn LogSink>,
}

impl StructuralLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Renders `subject` down to `max_depth` levels and appends a log entry.
    pub fn log(&self, subject: &Value, max_depth: usize, description: &str) {
        let entry = LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            description: description.to_string(),
            body: render_structure(subject, max_depth),
        };
        self.sink.append_entry(entry);
    }
}

/// Renders a descriptor tree as indented, line-oriented text.
///
/// Properties are visited in their stored order. Null values render as a
/// `null` marker, nested structures recurse inside a brace block, and
/// anything else renders as `key: value`. Substructure past the depth bound
/// renders as an ellipsis line. A `max_depth` of 0 selects a large fixed
/// bound rather than unlimited recursion.
pub fn render_structure(subject: &Value, max_depth: usize) -> String {
    let bound = if max_depth == 0 {
        FALLBACK_RENDER_DEPTH
    } else {
        max_depth
    };
    let mut out = String::new();
    render_level(subject, bound, 0, &mut out);
    out
}

fn render_level(subject: &Value, bound: usize, level: usize, out: &mut String) {
    let indent = RENDER_INDENT.repeat(level);
    if level >= bound {
        let _ = writeln!(out, "{indent}...");
        return;
    }
    match subject {
        Value::Object(map) => {
            for (key, value) in map {
                render_property(key, value, bound, level, out);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                render_property(&index.to_string(), value, bound, level, out);
            }
        }
        other => {
            let _ = writeln!(out, "{indent}{}", scalar_text(other));
        }
    }
}

fn render_property(key: &str, value: &Value, bound: usize, level: usize, out: &mut String) {
    let indent = RENDER_INDENT.repeat(level);
    match value {
        Value::Null => {
            let _ = writeln!(out, "{indent}{key}: null");
        }
        Value::Object(_) | Value::Array(_) => {
            let _ = writeln!(out, "{indent}{key}: {{");
            render_level(value, bound, level + 1, out);
            let _ = writeln!(out, "{indent}}}");
        }
        scalar => {
            let _ = writeln!(out, "{indent}{key}: {}", scalar_text(scalar));
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_scalars_and_null_markers() {
        let subject = json!({
            "uuid": "0000180d-0000-1000-8000-00805f9b34fb",
            "isPrimary": true,
            "rssi": null,
        });
        let text = render_structure(&subject, 3);
        assert!(text.contains("uuid: 0000180d-0000-1000-8000-00805f9b34fb\n"));
        assert!(text.contains("isPrimary: true\n"));
        assert!(text.contains("rssi: null\n"));
    }

    #[test]
    fn nested_structures_render_in_brace_blocks() {
        let subject = json!({"device": {"name": "P2PSRV1"}});
        let text = render_structure(&subject, 3);
        assert_eq!(text, "device: {\n    name: P2PSRV1\n}\n");
    }

    #[test]
    fn substructure_past_the_bound_becomes_ellipsis() {
        let subject = json!({"device": {"gatt": {"connected": true}}});
        let text = render_structure(&subject, 1);
        assert_eq!(text, "device: {\n    ...\n}\n");
    }

    #[test]
    fn arrays_render_with_index_keys() {
        let subject = json!({"filters": ["HRSTM", "MyCST"]});
        let text = render_structure(&subject, 3);
        assert_eq!(text, "filters: {\n    0: HRSTM\n    1: MyCST\n}\n");
    }

    fn deeply_nested(levels: usize) -> Value {
        let mut value = json!("leaf");
        for _ in 0..levels {
            value = json!({ "inner": value });
        }
        value
    }

    #[test]
    fn depth_zero_terminates_via_fallback_bound() {
        let subject = deeply_nested(200);
        let text = render_structure(&subject, 0);
        assert!(text.contains("..."));
        // One "inner" line per rendered level, never more than the bound.
        let rendered_levels = text.matches("inner").count();
        assert!(rendered_levels <= FALLBACK_RENDER_DEPTH);
    }

    #[test]
    fn never_recurses_past_an_explicit_bound() {
        let subject = deeply_nested(50);
        let text = render_structure(&subject, 4);
        assert_eq!(text.matches("inner").count(), 4);
        assert!(text.contains("..."));
    }

    #[test]
    fn rendering_is_deterministic() {
        let subject = json!({"b": 1, "a": {"x": null}, "c": [1, 2]});
        assert_eq!(render_structure(&subject, 5), render_structure(&subject, 5));
    }

    #[test]
    fn log_appends_timestamped_entries_in_order() {
        let panel = Arc::new(LogPanel::new());
        let logger = StructuralLogger::new(panel.clone());
        logger.log(&json!({"uuid": "fe40"}), 3, "SERVICE");
        logger.log(&json!({"uuid": "fe41"}), 4, "CHARACTERISTIC fe41 READ");

        let entries = panel.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "SERVICE");
        assert_eq!(entries[1].description, "CHARACTERISTIC fe41 READ");
        assert!(entries[0].body.contains("uuid: fe40"));

        // HH:MM:SS, 24h
        let stamp = entries[0].timestamp.as_bytes();
        assert_eq!(stamp.len(), 8);
        assert_eq!(stamp[2], b':');
        assert_eq!(stamp[5], b':');
    }
}

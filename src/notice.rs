//! Purpose: Define a stable, structured schema for non-fatal stderr notices.
//! Exports: `Notice`, `notice_json`, `qr_capacity_notice`.
//! Role: Shared contract helper for CLI diagnostics (non-error events).
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: JSON schema is stable once published; fields are additive-only.
use serde_json::{Map, Value, json};

use crate::core::codec::QR_BYTE_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub time: String,
    pub cmd: String,
    pub vendor: String,
    pub message: String,
    pub details: Map<String, Value>,
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("cmd".to_string(), json!(notice.cmd));
    inner.insert("vendor".to_string(), json!(notice.vendor));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}

/// Returns a notice when `length` bytes will not fit a single QR code.
pub fn qr_capacity_notice(vendor: &str, time: String, length: usize) -> Option<Notice> {
    if length <= QR_BYTE_CAPACITY {
        return None;
    }
    let mut details = Map::new();
    details.insert("length".to_string(), Value::from(length));
    details.insert("capacity".to_string(), Value::from(QR_BYTE_CAPACITY));
    Some(Notice {
        kind: "qr-capacity".to_string(),
        time,
        cmd: "encode".to_string(),
        vendor: vendor.to_string(),
        message: format!(
            "encoded menu is {length} bytes; QR codes hold at most {QR_BYTE_CAPACITY}"
        ),
        details,
    })
}

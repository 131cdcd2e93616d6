//! Stroke-order audit: normalize each item's `writing` block, verify the
//! referenced asset exists, and force `guideOnly` when it does not.
//!
//! Legacy documents carry a flat `strokeOrder` path; newer ones a `writing`
//! block with `order`, `strokes`, `guideOnly`. The auditor brings every item
//! into the combined shape and keeps the two `guideOnly` flags mirrored.

use std::path::Path;

use serde_json::{Map, Value};

use crate::data::document::for_each_item_mut;

/// One audited item, as reported in report.csv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    pub file_id: String,
    pub source_file: String,
    pub glyph: String,
    pub path: String,
    pub exists: bool,
    pub action: String,
}

/// Bring an item's stroke fields into the canonical shape: `writing.order`
/// seeded from a legacy `strokeOrder`, `writing.strokes` defaulting to an
/// empty list, and `guideOnly` present both on the item and in the block,
/// the item initializing from the block when absent.
pub fn ensure_writing_block(item: &mut Map<String, Value>) {
    let stroke_path = item
        .get("strokeOrder")
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(str::to_string);
    let top_guide = item.get("guideOnly").cloned();

    let mut writing = match item.remove("writing") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    if let Some(path) = stroke_path {
        if !writing.contains_key("order") {
            writing.insert("order".to_string(), Value::String(path));
        }
    }
    writing.entry("strokes").or_insert_with(|| Value::Array(Vec::new()));
    if !writing.contains_key("guideOnly") {
        writing.insert("guideOnly".to_string(), top_guide.unwrap_or(Value::Bool(false)));
    }

    let block_guide = writing.get("guideOnly").cloned().unwrap_or(Value::Bool(false));
    let block_order = writing.get("order").cloned();
    item.insert("writing".to_string(), Value::Object(writing));
    if !item.contains_key("guideOnly") {
        item.insert("guideOnly".to_string(), block_guide);
    }
    if !item.contains_key("strokeOrder") {
        if let Some(order) = block_order {
            item.insert("strokeOrder".to_string(), order);
        }
    }
}

/// Normalize one item, then check the stroke asset on disk (relative to
/// `root` or as a literal path). A missing asset is not an error: both
/// `guideOnly` flags are forced true and the prior value recorded as the
/// action note.
pub fn audit_item(
    item: &mut Map<String, Value>,
    file_id: &str,
    source_file: &str,
    root: &Path,
) -> AuditRow {
    let glyph = ["glyph", "label", "syllable"]
        .iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string();

    ensure_writing_block(item);

    let path = item
        .get("strokeOrder")
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(str::to_string);
    let exists = path
        .as_deref()
        .map_or(false, |path| root.join(path).exists() || Path::new(path).exists());

    let mut action = String::new();
    if !exists {
        let prev = item.get("guideOnly").and_then(Value::as_bool).unwrap_or(false);
        item.insert("guideOnly".to_string(), Value::Bool(true));
        if let Some(writing) = item.get_mut("writing").and_then(Value::as_object_mut) {
            writing.insert("guideOnly".to_string(), Value::Bool(true));
        }
        action = format!("guideOnly set True (was {})", if prev { "True" } else { "False" });
    }

    AuditRow {
        file_id: file_id.to_string(),
        source_file: source_file.to_string(),
        glyph,
        path: path.unwrap_or_default(),
        exists,
        action,
    }
}

/// Audit every recognized item in a document, patching it in place. Callers
/// write the document out whether or not anything changed.
pub fn audit_document(
    doc: &mut Value,
    file_id: &str,
    source_file: &str,
    root: &Path,
) -> Vec<AuditRow> {
    let mut rows = Vec::new();
    for_each_item_mut(doc, &mut |item| {
        rows.push(audit_item(item, file_id, source_file, root));
    });
    rows
}

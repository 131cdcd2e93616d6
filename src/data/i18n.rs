//! Translation coverage: `ko`-canonical backfill and per-language missing
//! counts for the summary report.

use serde_json::Value;

use crate::data::document::{for_each_item_mut, walk_objects, walk_objects_mut};

/// Report languages, `ko` first. Canonical source is always `ko`.
pub const LANGS: &[&str] = &["ko", "en", "zh", "ja", "vi", "fr", "es", "ru", "mn"];

/// Languages the filler backfills from `ko`.
pub const FILL_TARGETS: &[&str] = &["en", "zh", "ja", "vi", "fr", "es", "ru", "mn"];

/// Keys whose values are i18n containers, counted by the summary.
pub const I18N_KEYS: &[&str] = &["title", "description", "definition", "subtitle", "note", "notes"];

pub const CANONICAL_LANG: &str = "ko";

const I18N_CONTAINER_KEY: &str = "i18n";

/// A value that counts as missing for coverage purposes: absent, null, empty
/// string, false, zero, or an empty collection.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
    }
}

/// Copy the `ko` value into every missing target language of every `i18n`
/// container anywhere in the tree. Returns whether anything changed, so
/// callers can skip rewriting untouched files. Re-running on the output is a
/// no-op.
pub fn fill_document(doc: &mut Value) -> bool {
    let mut changed = false;
    walk_objects_mut(doc, &mut |node| {
        let Some(container) = node.get_mut(I18N_CONTAINER_KEY).and_then(Value::as_object_mut)
        else {
            return;
        };
        let ko = container
            .get(CANONICAL_LANG)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        for lang in FILL_TARGETS {
            if is_missing(container.get(*lang)) {
                container.insert((*lang).to_string(), Value::String(ko.clone()));
                changed = true;
            }
        }
    });
    changed
}

/// Count, across the whole tree, how many containers under `key` are missing
/// each language. Returned in [`LANGS`] order.
pub fn count_missing(doc: &Value, key: &str) -> Vec<usize> {
    let mut missing = vec![0usize; LANGS.len()];
    walk_objects(doc, &mut |node| {
        let Some(container) = node.get(key).and_then(Value::as_object) else { return };
        for (slot, lang) in missing.iter_mut().zip(LANGS) {
            if is_missing(container.get(*lang)) {
                *slot += 1;
            }
        }
    });
    missing
}

/// Frequency tier distribution across the recognized item positions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FreqTally {
    pub high: usize,
    pub mid: usize,
    pub low: usize,
    pub total: usize,
}

/// Tally `freq` over recognized items. Items without a recognized tier count
/// as mid rather than a separate bucket.
pub fn tally_freq(doc: &mut Value) -> FreqTally {
    let mut tally = FreqTally::default();
    for_each_item_mut(doc, &mut |item| {
        match item.get("freq").and_then(Value::as_str) {
            Some("high") => tally.high += 1,
            Some("low") => tally.low += 1,
            _ => tally.mid += 1,
        }
        tally.total += 1;
    });
    tally
}

//! Frequency tier inference for letter items.
//!
//! Seed sets are explicit configuration: built-in defaults merged with
//! additive comma-separated override lists at the call site, then passed into
//! classification. An item that already carries a tier is never reclassified
//! unless the caller forces it.

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

use crate::data::document::walk_objects_mut;

const DEFAULT_HIGH_SEEDS: &[&str] = &[
    "관", "광", "국", "글", "근", "원", "월", "웰", "윈", "윌", "윙", "흰",
];
const DEFAULT_MID_SEEDS: &[&str] = &[
    "괄", "괌", "곽", "곤", "골", "곰", "공", "군", "굴", "굼", "궁", "급",
];
const DEFAULT_LOW_SEEDS: &[&str] = &["괵", "웝"];

/// Coarse usage-frequency tier used to prioritize learning content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreqTier {
    High,
    Mid,
    Low,
}

impl FreqTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for FreqTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Seed glyph sets consulted before any per-item heuristic.
#[derive(Debug, Clone)]
pub struct SeedSets {
    pub high: HashSet<String>,
    pub mid: HashSet<String>,
    pub low: HashSet<String>,
}

impl Default for SeedSets {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_SEEDS.iter().map(|s| s.to_string()).collect(),
            mid: DEFAULT_MID_SEEDS.iter().map(|s| s.to_string()).collect(),
            low: DEFAULT_LOW_SEEDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SeedSets {
    /// Defaults plus additive comma-separated override lists (as passed on
    /// the command line). Blank entries are ignored.
    pub fn with_overrides(high: Option<&str>, mid: Option<&str>, low: Option<&str>) -> Self {
        let mut seeds = Self::default();
        merge_list(&mut seeds.high, high);
        merge_list(&mut seeds.mid, mid);
        merge_list(&mut seeds.low, low);
        seeds
    }
}

fn merge_list(set: &mut HashSet<String>, list: Option<&str>) {
    let Some(list) = list else { return };
    set.extend(
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string),
    );
}

/// Classify one glyph. Seed membership wins in high, mid, low order; then
/// `core` or non-empty `samples` means high, `guideOnly` means low, and
/// everything else is mid.
pub fn detect_freq(
    glyph: &str,
    core: bool,
    guide_only: bool,
    has_samples: bool,
    seeds: &SeedSets,
) -> FreqTier {
    if seeds.high.contains(glyph) {
        return FreqTier::High;
    }
    if seeds.mid.contains(glyph) {
        return FreqTier::Mid;
    }
    if seeds.low.contains(glyph) {
        return FreqTier::Low;
    }
    if core || has_samples {
        return FreqTier::High;
    }
    if guide_only {
        return FreqTier::Low;
    }
    FreqTier::Mid
}

/// One tier assignment made while patching a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqChange {
    pub source_file: String,
    pub glyph: String,
    pub prev: Option<String>,
    pub new: FreqTier,
}

/// Assign `freq` on every glyph-carrying node whose tier is absent or null
/// (every one when `force`). Returns one record per assignment; an empty
/// result means the document was untouched and need not be rewritten.
pub fn patch_document(
    doc: &mut Value,
    source_file: &str,
    force: bool,
    seeds: &SeedSets,
) -> Vec<FreqChange> {
    let mut changes = Vec::new();
    walk_objects_mut(doc, &mut |node| {
        if let Some(change) = patch_node(node, source_file, force, seeds) {
            changes.push(change);
        }
    });
    changes
}

fn patch_node(
    node: &mut Map<String, Value>,
    source_file: &str,
    force: bool,
    seeds: &SeedSets,
) -> Option<FreqChange> {
    let glyph = node.get("glyph").and_then(Value::as_str)?.to_string();
    let unset = node.get("freq").map_or(true, Value::is_null);
    if !unset && !force {
        return None;
    }
    let prev = node.get("freq").and_then(Value::as_str).map(str::to_string);
    let core = node.get("core").and_then(Value::as_bool).unwrap_or(false);
    let guide_only = node.get("guideOnly").and_then(Value::as_bool).unwrap_or(false);
    let has_samples = node
        .get("samples")
        .and_then(Value::as_array)
        .map_or(false, |samples| !samples.is_empty());
    let new = detect_freq(&glyph, core, guide_only, has_samples, seeds);
    node.insert("freq".to_string(), Value::String(new.as_str().to_string()));
    Some(FreqChange { source_file: source_file.to_string(), glyph, prev, new })
}

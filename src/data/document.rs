//! Letters dataset documents: file discovery, JSON load/save, and traversal.
//!
//! Two traversals cover every tool: a generic depth-first descent over the
//! whole JSON tree (freq patching, i18n backfill, missing counts), and an
//! explicit visit of the recognized item positions — flat `chars` plus the
//! `sections.cv` / `sections.cvc` sub-collections — matching the shapes the
//! consuming app reads (freq tally, stroke audit).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Letters file basename prefixes covered by the batch tools (Jamo 1.x excluded).
pub const LETTER_PREFIXES: &[&str] = &["2_1_", "2_2_", "2_3_", "2_4_"];

/// Letters JSON directory relative to the project root.
pub const LETTERS_DIR: &str = "assets/data/letters";

pub fn has_letter_prefix(name: &str) -> bool {
    LETTER_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Load a JSON document with the path in any error message.
pub fn load_json(path: &Path) -> Result<Value, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("unable to read '{}': {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("unable to parse json '{}': {err}", path.display()))
}

/// Write a document pretty-printed: 2-space indent, non-ASCII kept literal.
pub fn save_json(path: &Path, value: &Value) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| format!("unable to serialize '{}': {err}", path.display()))?;
    fs::write(path, rendered).map_err(|err| format!("unable to write '{}': {err}", path.display()))
}

pub fn basename(path: &Path) -> String {
    path.file_name().and_then(|name| name.to_str()).unwrap_or_default().to_string()
}

/// Document `id`, falling back to the basename. Used as the report file id.
pub fn file_id(doc: &Value, path: &Path) -> String {
    doc.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| basename(path))
}

/// All `*.json` directly inside `dir`, sorted. Missing dir yields an empty list.
pub fn json_files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// Letters JSON at any depth under `root` (the freq patcher walks recursively).
pub fn collect_letter_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_letter_files_into(root, &mut files);
    files.sort();
    files
}

fn collect_letter_files_into(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_letter_files_into(&path, files);
        } else if path.extension().map_or(false, |ext| ext == "json")
            && has_letter_prefix(&basename(&path))
        {
            files.push(path);
        }
    }
}

/// Files the coverage summary scans: letters with a `2_x_` prefix or any
/// `index` file, directly under the letters dir.
pub fn summary_files(letters_dir: &Path) -> Vec<PathBuf> {
    json_files_in(letters_dir)
        .into_iter()
        .filter(|path| {
            let name = basename(path);
            has_letter_prefix(&name) || name.contains("index")
        })
        .collect()
}

/// Index documents: `*.index.json` or `*_index.json` under the letters dir.
pub fn index_files(letters_dir: &Path) -> Vec<PathBuf> {
    json_files_in(letters_dir)
        .into_iter()
        .filter(|path| {
            let name = basename(path);
            name.ends_with(".index.json") || name.ends_with("_index.json")
        })
        .collect()
}

/// Files the stroke auditor scans: the letters dir plus the project root
/// itself, keeping `2_x_` prefixed basenames.
pub fn stroke_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = json_files_in(&root.join(LETTERS_DIR))
        .into_iter()
        .chain(json_files_in(root))
        .filter(|path| has_letter_prefix(&basename(path)))
        .collect();
    files.sort();
    files
}

/// Depth-first descent visiting every object in the tree, parents before
/// children. The callback may mutate the object it is handed.
pub fn walk_objects_mut<F: FnMut(&mut Map<String, Value>)>(value: &mut Value, visit: &mut F) {
    match value {
        Value::Object(map) => {
            visit(map);
            for child in map.values_mut() {
                walk_objects_mut(child, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_objects_mut(item, visit);
            }
        }
        _ => {}
    }
}

/// Read-only counterpart of [`walk_objects_mut`].
pub fn walk_objects<F: FnMut(&Map<String, Value>)>(value: &Value, visit: &mut F) {
    match value {
        Value::Object(map) => {
            visit(map);
            for child in map.values() {
                walk_objects(child, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_objects(item, visit);
            }
        }
        _ => {}
    }
}

/// Visit every recognized item position in document order:
/// top-level `chars`, `sections.cv.chars`, `sections.cv.examples[].items`,
/// `sections.cvc.examples[].items`, `sections.cvc.groups[].items`, and
/// `sections.cvc.groups[].doubleFinals`. Unknown shapes are ignored rather
/// than probed, so the accepted positions stay exhaustively listed here.
pub fn for_each_item_mut<F: FnMut(&mut Map<String, Value>)>(doc: &mut Value, visit: &mut F) {
    let Some(root) = doc.as_object_mut() else { return };
    if let Some(chars) = root.get_mut("chars").and_then(Value::as_array_mut) {
        visit_items(chars, visit);
    }
    let Some(sections) = root.get_mut("sections").and_then(Value::as_object_mut) else {
        return;
    };
    if let Some(cv) = sections.get_mut("cv").and_then(Value::as_object_mut) {
        if let Some(chars) = cv.get_mut("chars").and_then(Value::as_array_mut) {
            visit_items(chars, visit);
        }
        if let Some(examples) = cv.get_mut("examples").and_then(Value::as_array_mut) {
            for example in examples {
                visit_list_field(example, "items", visit);
            }
        }
    }
    if let Some(cvc) = sections.get_mut("cvc").and_then(Value::as_object_mut) {
        if let Some(examples) = cvc.get_mut("examples").and_then(Value::as_array_mut) {
            for example in examples {
                visit_list_field(example, "items", visit);
            }
        }
        if let Some(groups) = cvc.get_mut("groups").and_then(Value::as_array_mut) {
            for group in groups {
                visit_list_field(group, "items", visit);
                visit_list_field(group, "doubleFinals", visit);
            }
        }
    }
}

fn visit_items<F: FnMut(&mut Map<String, Value>)>(items: &mut [Value], visit: &mut F) {
    for item in items {
        if let Some(object) = item.as_object_mut() {
            visit(object);
        }
    }
}

fn visit_list_field<F: FnMut(&mut Map<String, Value>)>(
    container: &mut Value,
    key: &str,
    visit: &mut F,
) {
    if let Some(list) = container.get_mut(key).and_then(Value::as_array_mut) {
        visit_items(list, visit);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{for_each_item_mut, has_letter_prefix, walk_objects_mut};

    #[test]
    fn letter_prefix_matches_2x_only() {
        assert!(has_letter_prefix("2_1_basic.json"));
        assert!(has_letter_prefix("2_4_2_with_batchim.json"));
        assert!(!has_letter_prefix("1_1_jamo.json"));
        assert!(!has_letter_prefix("readme.json"));
    }

    #[test]
    fn for_each_item_visits_flat_and_sectioned_positions() {
        let mut doc = json!({
            "id": "2_3_mixed",
            "chars": [{"glyph": "가"}, {"glyph": "나"}],
            "sections": {
                "cv": {
                    "chars": [{"glyph": "고"}],
                    "examples": [{"items": [{"glyph": "구"}, {"glyph": "규"}]}]
                },
                "cvc": {
                    "examples": [{"items": [{"glyph": "곡"}]}],
                    "groups": [{
                        "items": [{"glyph": "곤"}],
                        "doubleFinals": [{"glyph": "값"}]
                    }]
                }
            }
        });
        let mut seen = Vec::new();
        for_each_item_mut(&mut doc, &mut |item| {
            seen.push(item["glyph"].as_str().unwrap_or_default().to_string());
        });
        assert_eq!(seen, vec!["가", "나", "고", "구", "규", "곡", "곤", "값"]);
    }

    #[test]
    fn for_each_item_ignores_unrecognized_positions() {
        let mut doc = json!({
            "id": "2_1_odd",
            "extras": [{"glyph": "가"}],
            "sections": {"cv": {"notes": [{"glyph": "나"}]}}
        });
        let mut count = 0;
        for_each_item_mut(&mut doc, &mut |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn walk_objects_reaches_objects_nested_in_arrays() {
        let mut doc = json!({
            "outer": [{"inner": {"marker": 1}}, {"marker": 2}],
            "marker": 3
        });
        let mut markers = 0;
        walk_objects_mut(&mut doc, &mut |object| {
            if object.contains_key("marker") {
                markers += 1;
            }
        });
        assert_eq!(markers, 3);
    }
}

//! Route integrity: resolve the logical routes of index documents to dataset
//! paths and check each one exists on disk, distinguishing case-only
//! mismatches from true misses.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::data::document::LETTERS_DIR;

/// Resolve a logical route to a project-relative path: strip one leading `/`
/// and one `letters/` segment, then join under the letters data directory.
/// `"/letters/2_4_2_with_batchim.json"` becomes
/// `assets/data/letters/2_4_2_with_batchim.json`.
pub fn route_to_relpath(route: &str) -> PathBuf {
    let mut route = route.trim();
    route = route.strip_prefix('/').unwrap_or(route);
    route = route.strip_prefix("letters/").unwrap_or(route);
    Path::new(LETTERS_DIR).join(route)
}

/// Outcome of checking one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteStatus {
    Exists,
    Missing,
    /// The exact name is absent but a sibling differs only by case.
    CaseMismatch { actual: String },
}

impl RouteStatus {
    pub fn exists_cell(&self) -> &'static str {
        match self {
            Self::Exists => "YES",
            _ => "NO",
        }
    }

    pub fn note(&self) -> String {
        match self {
            Self::Exists => String::new(),
            Self::Missing => "missing".to_string(),
            Self::CaseMismatch { actual } => format!("case-mismatch: actual '{actual}'"),
        }
    }
}

/// One examined route, as reported in report.csv.
#[derive(Debug, Clone)]
pub struct RouteRow {
    pub index_id: String,
    pub index_file: String,
    pub route: String,
    pub resolved: String,
    pub status: RouteStatus,
}

/// A sibling name matching `name` case-insensitively but not exactly.
pub fn find_case_variant(names: &[String], name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    names
        .iter()
        .find(|candidate| candidate.to_lowercase() == lower && candidate.as_str() != name)
        .cloned()
}

/// Check a resolved absolute path, consulting the parent directory listing
/// for case-only mismatches when the exact path is missing.
pub fn check_path(abs_path: &Path) -> RouteStatus {
    if abs_path.exists() {
        return RouteStatus::Exists;
    }
    let folder = abs_path.parent();
    let fname = abs_path.file_name().and_then(|name| name.to_str());
    let (Some(folder), Some(fname)) = (folder, fname) else {
        return RouteStatus::Missing;
    };
    let names: Vec<String> = fs::read_dir(folder)
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    match find_case_variant(&names, fname) {
        Some(actual) => RouteStatus::CaseMismatch { actual },
        None => RouteStatus::Missing,
    }
}

/// Check every `parts[].route` and `parts[].extraRoutes[].route` in one index
/// document, in document order. Empty route strings are skipped.
pub fn check_index_document(
    doc: &Value,
    index_id: &str,
    index_file: &str,
    root: &Path,
) -> Vec<RouteRow> {
    let mut rows = Vec::new();
    let Some(parts) = doc.get("parts").and_then(Value::as_array) else { return rows };
    for part in parts {
        if let Some(route) = nonempty_route(part) {
            rows.push(check_route(route, index_id, index_file, root));
        }
        let Some(extra) = part.get("extraRoutes").and_then(Value::as_array) else { continue };
        for entry in extra {
            if let Some(route) = nonempty_route(entry) {
                rows.push(check_route(route, index_id, index_file, root));
            }
        }
    }
    rows
}

fn nonempty_route(node: &Value) -> Option<&str> {
    node.get("route").and_then(Value::as_str).filter(|route| !route.is_empty())
}

fn check_route(route: &str, index_id: &str, index_file: &str, root: &Path) -> RouteRow {
    let rel = route_to_relpath(route);
    let status = check_path(&root.join(&rel));
    RouteRow {
        index_id: index_id.to_string(),
        index_file: index_file.to_string(),
        route: route.to_string(),
        resolved: rel.to_string_lossy().into_owned(),
        status,
    }
}

//! Run registry: provenance for generated reports. Each tool records what it
//! wrote and when into `registry.json` inside its output directory, so report
//! consumers can tell which run produced which artifact.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    pub tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub rows: usize,
    pub report: String,
}

pub type RunRegistry = HashMap<String, RunEntry>;

pub const REGISTRY_FILE: &str = "registry.json";

/// Read-modify-write the registry in `out_dir`, keyed by tool name. The
/// output directory must already exist.
pub fn record_run(out_dir: &Path, tool: &str, rows: usize, report: &str) -> Result<(), String> {
    let path = out_dir.join(REGISTRY_FILE);
    let mut registry: RunRegistry = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|err| format!("unable to read '{}': {err}", path.display()))?;
        serde_json::from_str(&raw)
            .map_err(|err| format!("unable to parse json '{}': {err}", path.display()))?
    } else {
        HashMap::new()
    };

    registry.insert(
        tool.to_string(),
        RunEntry {
            tool: tool.to_string(),
            last_updated: Some(chrono::Utc::now().format("%Y-%m-%d").to_string()),
            rows,
            report: report.to_string(),
        },
    );

    let rendered = serde_json::to_string_pretty(&registry)
        .map_err(|err| format!("unable to serialize '{}': {err}", path.display()))?;
    fs::write(&path, rendered).map_err(|err| format!("unable to write '{}': {err}", path.display()))
}

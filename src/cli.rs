//! Subcommand dispatch for the sejong maintenance tools.
//!
//! Flags are the hand-parsed `--flag value` kind; every handler returns a
//! process exit code. Usage errors exit 2, runtime failures 1. Malformed
//! JSON inputs are reported and skipped in every tool, so one bad file never
//! sinks a whole run.

use std::fs;
use std::path::Path;

use crate::data::document::{
    basename, collect_letter_files, file_id, index_files, json_files_in, load_json, save_json,
    stroke_files, summary_files, LETTERS_DIR,
};
use crate::data::freq::{patch_document, FreqChange, SeedSets};
use crate::data::i18n::{self, I18N_KEYS, LANGS};
use crate::data::registry::record_run;
use crate::data::routes::{check_index_document, RouteRow, RouteStatus};
use crate::data::strokes::{audit_document, AuditRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Freq,
    FillI18n,
    SummarizeI18n,
    CheckRoutes,
    AuditStrokes,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("freq") => Some(Command::Freq),
        Some("fill-i18n") => Some(Command::FillI18n),
        Some("summarize-i18n") => Some(Command::SummarizeI18n),
        Some("check-routes") => Some(Command::CheckRoutes),
        Some("audit-strokes") => Some(Command::AuditStrokes),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Freq) => handle_freq(args),
        Some(Command::FillI18n) => handle_fill_i18n(args),
        Some(Command::SummarizeI18n) => handle_summarize_i18n(args),
        Some(Command::CheckRoutes) => handle_check_routes(args),
        Some(Command::AuditStrokes) => handle_audit_strokes(args),
        None => {
            eprintln!(
                "usage: sejong <freq|fill-i18n|summarize-i18n|check-routes|audit-strokes>"
            );
            2
        }
    }
}

/// Value following `--flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> String {
    format!("unable to write '{}': {err}", path.display())
}

fn handle_freq(args: &[String]) -> i32 {
    let (Some(root), Some(out)) = (flag_value(args, "--root"), flag_value(args, "--out")) else {
        eprintln!(
            "usage: sejong freq --root <dir> --out <dir> [--force] \
             [--high g,g] [--mid g,g] [--low g,g]"
        );
        return 2;
    };
    let force = has_flag(args, "--force");
    let seeds = SeedSets::with_overrides(
        flag_value(args, "--high"),
        flag_value(args, "--mid"),
        flag_value(args, "--low"),
    );

    let root = Path::new(root);
    let out = Path::new(out);
    let files = collect_letter_files(root);
    let mut summary: Vec<FreqChange> = Vec::new();
    for path in &files {
        let mut doc = match load_json(path) {
            Ok(doc) => doc,
            Err(err) => {
                eprintln!("skipping: {err}");
                continue;
            }
        };
        let source_file = basename(path);
        let changes = patch_document(&mut doc, &source_file, force, &seeds);
        if changes.is_empty() {
            continue;
        }
        if let Err(err) = fs::create_dir_all(out) {
            eprintln!("{}", write_error(out, err));
            return 1;
        }
        if let Err(err) = save_json(&out.join(&source_file), &doc) {
            eprintln!("{err}");
            return 1;
        }
        summary.extend(changes);
    }

    if !summary.is_empty() {
        if let Err(err) = write_freq_summary(out, &summary) {
            eprintln!("{err}");
            return 1;
        }
        if let Err(err) = record_run(out, "freq", summary.len(), "summary.csv") {
            eprintln!("{err}");
            return 1;
        }
    }
    println!("Patched {} items across {} files", summary.len(), files.len());
    0
}

fn write_freq_summary(out: &Path, rows: &[FreqChange]) -> Result<(), String> {
    let path = out.join("summary.csv");
    let mut writer = csv::Writer::from_path(&path).map_err(|err| write_error(&path, err))?;
    writer
        .write_record(["source_file", "glyph", "prev_freq", "new_freq"])
        .map_err(|err| write_error(&path, err))?;
    for row in rows {
        writer
            .write_record([
                row.source_file.as_str(),
                row.glyph.as_str(),
                row.prev.as_deref().unwrap_or(""),
                row.new.as_str(),
            ])
            .map_err(|err| write_error(&path, err))?;
    }
    writer.flush().map_err(|err| write_error(&path, err))
}

fn handle_fill_i18n(args: &[String]) -> i32 {
    let dir = Path::new(flag_value(args, "--dir").unwrap_or("./freq_patch_output"));
    if !dir.is_dir() {
        eprintln!("directory not found: {}", dir.display());
        return 1;
    }

    let files = json_files_in(dir);
    let mut updated = 0usize;
    for path in &files {
        let mut doc = match load_json(path) {
            Ok(doc) => doc,
            Err(err) => {
                eprintln!("[ERROR] {err}");
                continue;
            }
        };
        if i18n::fill_document(&mut doc) {
            if let Err(err) = save_json(path, &doc) {
                eprintln!("{err}");
                return 1;
            }
            println!("[UPDATED] {}", path.display());
            updated += 1;
        } else {
            println!("[OK] {}", path.display());
        }
    }
    println!("Filled {updated} of {} files", files.len());
    0
}

fn handle_summarize_i18n(args: &[String]) -> i32 {
    let root = Path::new(flag_value(args, "--root").unwrap_or("."));
    let out = Path::new(flag_value(args, "--out").unwrap_or("./i18n_summary_output"));
    let letters_dir = root.join(LETTERS_DIR);
    if !letters_dir.is_dir() {
        eprintln!("[WARN] letters folder not found: {}", letters_dir.display());
    }
    let files = summary_files(&letters_dir);

    if let Err(err) = fs::create_dir_all(out) {
        eprintln!("{}", write_error(out, err));
        return 1;
    }
    let csv_path = out.join("summary.csv");
    let mut writer = match csv::Writer::from_path(&csv_path) {
        Ok(writer) => writer,
        Err(err) => {
            eprintln!("{}", write_error(&csv_path, err));
            return 1;
        }
    };

    let mut header: Vec<String> = vec!["file_id".to_string(), "file_name".to_string()];
    for key in I18N_KEYS {
        for lang in LANGS {
            header.push(format!("miss_{key}_{lang}"));
        }
    }
    header.extend(["freq_high", "freq_mid", "freq_low", "freq_total_items"].map(str::to_string));
    if let Err(err) = writer.write_record(&header) {
        eprintln!("{}", write_error(&csv_path, err));
        return 1;
    }

    let mut scanned = 0usize;
    for path in &files {
        let mut doc = match load_json(path) {
            Ok(doc) => doc,
            Err(err) => {
                eprintln!("skipping: {err}");
                continue;
            }
        };
        let mut row: Vec<String> = vec![file_id(&doc, path), basename(path)];
        for key in I18N_KEYS {
            for count in i18n::count_missing(&doc, key) {
                row.push(count.to_string());
            }
        }
        let tally = i18n::tally_freq(&mut doc);
        row.push(tally.high.to_string());
        row.push(tally.mid.to_string());
        row.push(tally.low.to_string());
        row.push(tally.total.to_string());
        if let Err(err) = writer.write_record(&row) {
            eprintln!("{}", write_error(&csv_path, err));
            return 1;
        }
        scanned += 1;
    }
    if let Err(err) = writer.flush() {
        eprintln!("{}", write_error(&csv_path, err));
        return 1;
    }
    if let Err(err) = record_run(out, "summarize-i18n", scanned, "summary.csv") {
        eprintln!("{err}");
        return 1;
    }

    println!("Summary CSV saved to: {}", csv_path.display());
    println!("Files scanned: {scanned}");
    0
}

fn handle_check_routes(args: &[String]) -> i32 {
    let root = Path::new(flag_value(args, "--root").unwrap_or("."));
    let out = Path::new(flag_value(args, "--out").unwrap_or("./route_check_output"));
    let letters_dir = root.join(LETTERS_DIR);
    if !letters_dir.is_dir() {
        eprintln!("Not found: {}", letters_dir.display());
        return 1;
    }

    let mut rows: Vec<RouteRow> = Vec::new();
    for path in &index_files(&letters_dir) {
        let doc = match load_json(path) {
            Ok(doc) => doc,
            Err(err) => {
                eprintln!("skipping: {err}");
                continue;
            }
        };
        rows.extend(check_index_document(&doc, &file_id(&doc, path), &basename(path), root));
    }

    let missing = rows.iter().filter(|row| row.status != RouteStatus::Exists).count();
    let case_mismatch = rows
        .iter()
        .filter(|row| matches!(row.status, RouteStatus::CaseMismatch { .. }))
        .count();

    if let Err(err) = fs::create_dir_all(out) {
        eprintln!("{}", write_error(out, err));
        return 1;
    }
    let report_path = out.join("report.csv");
    if let Err(err) = write_route_report(&report_path, &rows) {
        eprintln!("{err}");
        return 1;
    }
    if let Err(err) = record_run(out, "check-routes", rows.len(), "report.csv") {
        eprintln!("{err}");
        return 1;
    }

    println!("Checked routes: {}", rows.len());
    println!("Missing: {missing}, Case-mismatch: {case_mismatch}");
    println!("Report CSV saved to: {}", report_path.display());
    0
}

fn write_route_report(path: &Path, rows: &[RouteRow]) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|err| write_error(path, err))?;
    writer
        .write_record(["index_id", "index_file", "route", "resolved_relpath", "exists", "note"])
        .map_err(|err| write_error(path, err))?;
    for row in rows {
        writer
            .write_record([
                row.index_id.as_str(),
                row.index_file.as_str(),
                row.route.as_str(),
                row.resolved.as_str(),
                row.status.exists_cell(),
                row.status.note().as_str(),
            ])
            .map_err(|err| write_error(path, err))?;
    }
    writer.flush().map_err(|err| write_error(path, err))
}

fn handle_audit_strokes(args: &[String]) -> i32 {
    let root = Path::new(flag_value(args, "--root").unwrap_or("."));
    let out = Path::new(flag_value(args, "--out").unwrap_or("./stroke_audit_output"));
    let json_out = out.join("json");
    if let Err(err) = fs::create_dir_all(&json_out) {
        eprintln!("{}", write_error(&json_out, err));
        return 1;
    }

    let mut rows: Vec<AuditRow> = Vec::new();
    for path in &stroke_files(root) {
        let mut doc = match load_json(path) {
            Ok(doc) => doc,
            Err(err) => {
                eprintln!("skipping: {err}");
                continue;
            }
        };
        let source_file = path.display().to_string();
        let id = file_id(&doc, path);
        rows.extend(audit_document(&mut doc, &id, &source_file, root));
        // every scanned document is written out, patched or not
        if let Err(err) = save_json(&json_out.join(basename(path)), &doc) {
            eprintln!("{err}");
            return 1;
        }
    }

    let report_path = out.join("report.csv");
    if let Err(err) = write_audit_report(&report_path, &rows) {
        eprintln!("{err}");
        return 1;
    }
    if let Err(err) = record_run(out, "audit-strokes", rows.len(), "report.csv") {
        eprintln!("{err}");
        return 1;
    }

    println!("Patched JSON saved to: {}", json_out.display());
    println!("Report CSV saved to: {}", report_path.display());
    0
}

fn write_audit_report(path: &Path, rows: &[AuditRow]) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|err| write_error(path, err))?;
    writer
        .write_record(["file_id", "source_file", "glyph", "strokeOrder_path", "asset_exists", "action"])
        .map_err(|err| write_error(path, err))?;
    for row in rows {
        writer
            .write_record([
                row.file_id.as_str(),
                row.source_file.as_str(),
                row.glyph.as_str(),
                row.path.as_str(),
                if row.exists { "YES" } else { "NO" },
                row.action.as_str(),
            ])
            .map_err(|err| write_error(path, err))?;
    }
    writer.flush().map_err(|err| write_error(path, err))
}

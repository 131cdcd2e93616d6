use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_sejong")
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("sejong-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[test]
fn missing_subcommand_prints_usage_and_exits_2() {
    let output = Command::new(bin()).output().expect("binary should run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: sejong"));
}

#[test]
fn unknown_subcommand_exits_2() {
    let output = Command::new(bin())
        .arg("frobnicate")
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn freq_without_required_flags_exits_2() {
    let output = Command::new(bin())
        .args(["freq", "--root", "/tmp"])
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn freq_patches_missing_tiers_and_writes_summary() {
    let root = unique_temp_dir("freq-root");
    let out = unique_temp_dir("freq-out");
    fs::write(
        root.join("2_1_basic.json"),
        serde_json::to_string_pretty(&serde_json::json!({
            "id": "2_1_basic",
            "chars": [
                {"glyph": "국"},
                {"glyph": "하", "core": true},
                {"glyph": "호", "freq": "low"}
            ]
        }))
        .unwrap(),
    )
    .unwrap();

    let output = Command::new(bin())
        .args(["freq", "--root"])
        .arg(&root)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("freq should run");
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let patched: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("2_1_basic.json")).unwrap()).unwrap();
    assert_eq!(patched["chars"][0]["freq"], "high"); // high seed
    assert_eq!(patched["chars"][1]["freq"], "high"); // core flag
    assert_eq!(patched["chars"][2]["freq"], "low"); // pre-existing, untouched

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("source_file,glyph,prev_freq,new_freq"));
    assert!(summary.contains("2_1_basic.json,국,,high"));
    assert!(summary.contains("2_1_basic.json,하,,high"));
    assert!(!summary.contains("호"));

    let registry: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("registry.json")).unwrap()).unwrap();
    assert_eq!(registry["freq"]["rows"], 2);
    assert_eq!(registry["freq"]["report"], "summary.csv");
}

#[test]
fn freq_rerun_on_patched_output_changes_nothing() {
    let root = unique_temp_dir("freq-idem-root");
    let out = unique_temp_dir("freq-idem-out");
    fs::write(
        root.join("2_2_top.json"),
        r#"{"id":"2_2_top","chars":[{"glyph":"하"}]}"#,
    )
    .unwrap();

    let first = Command::new(bin())
        .args(["freq", "--root"])
        .arg(&root)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("freq should run");
    assert_eq!(first.status.code(), Some(0));

    let second_out = unique_temp_dir("freq-idem-out2");
    let second = Command::new(bin())
        .args(["freq", "--root"])
        .arg(&out)
        .arg("--out")
        .arg(&second_out)
        .output()
        .expect("freq should run");
    assert_eq!(second.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("Patched 0 items"));
    assert!(!second_out.join("summary.csv").exists());
}

#[test]
fn freq_seed_overrides_extend_the_defaults() {
    let root = unique_temp_dir("freq-seed-root");
    let out = unique_temp_dir("freq-seed-out");
    fs::write(root.join("2_3_seed.json"), r#"{"chars":[{"glyph":"뷁"}]}"#).unwrap();

    let output = Command::new(bin())
        .args(["freq", "--root"])
        .arg(&root)
        .arg("--out")
        .arg(&out)
        .args(["--low", "뷁"])
        .output()
        .expect("freq should run");
    assert_eq!(output.status.code(), Some(0));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("뷁,,low"));
}

#[test]
fn freq_skips_malformed_json_and_continues() {
    let root = unique_temp_dir("freq-bad-root");
    let out = unique_temp_dir("freq-bad-out");
    fs::write(root.join("2_1_broken.json"), "{ not json").unwrap();
    fs::write(root.join("2_1_good.json"), r#"{"chars":[{"glyph":"하"}]}"#).unwrap();

    let output = Command::new(bin())
        .args(["freq", "--root"])
        .arg(&root)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("freq should run");
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("skipping"));
    assert!(out.join("2_1_good.json").exists());
    assert!(!out.join("2_1_broken.json").exists());
}

#[test]
fn fill_i18n_backfills_ko_in_place_then_reports_ok() {
    let dir = unique_temp_dir("fill");
    let path = dir.join("2_1_basic.json");
    fs::write(
        &path,
        r#"{"chars":[{"glyph":"가","i18n":{"ko":"가","en":"","fr":"ga"}}]}"#,
    )
    .unwrap();

    let output = Command::new(bin())
        .args(["fill-i18n", "--dir"])
        .arg(&dir)
        .output()
        .expect("fill-i18n should run");
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("[UPDATED]"));

    let filled: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let i18n = &filled["chars"][0]["i18n"];
    assert_eq!(i18n["en"], "가");
    assert_eq!(i18n["ja"], "가");
    assert_eq!(i18n["fr"], "ga");

    // second run is a no-op
    let rerun = Command::new(bin())
        .args(["fill-i18n", "--dir"])
        .arg(&dir)
        .output()
        .expect("fill-i18n should run");
    assert_eq!(rerun.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&rerun.stdout);
    assert!(stdout.contains("[OK]"));
    assert!(!stdout.contains("[UPDATED]"));
}

#[test]
fn fill_i18n_missing_directory_exits_1() {
    let output = Command::new(bin())
        .args(["fill-i18n", "--dir", "/nonexistent-sejong-dir"])
        .output()
        .expect("fill-i18n should run");
    assert_eq!(output.status.code(), Some(1));
}

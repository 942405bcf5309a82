//! E2E tests for the manpower CLI
//!
//! ## Exit Code Contract
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success |
//! | 1 | Invalid parameters, unreadable config, or write failure |

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn manpower_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_manpower"))
}

/// Run the binary and return (exit_code, stdout, stderr)
fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(manpower_binary())
        .args(args)
        .env_remove("MANPOWER_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute manpower");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

// =============================================================================
// plan
// =============================================================================

#[test]
fn plan_defaults_prints_text_grid() {
    let (code, stdout, _) = run(&["plan"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Week | Engineering | Superintendents | Foreman | Electricians |"));
    assert!(stdout.contains("Peak total:"));
    assert!(stdout.contains("Scope coverage:"));
}

#[test]
fn plan_single_department_matches_reference_curve() {
    let (code, stdout, _) = run(&[
        "plan", "--weeks", "4", "--scope", "100", "--dept", "A=1.0", "--only",
    ]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Week |     A | Total");
    assert_eq!(lines[2], "   1 |  1.43 |  1.43");
    assert_eq!(lines[3], "   2 | 50.00 | 50.00");
    assert_eq!(lines[5], "   4 |  1.43 |  1.43");
}

#[test]
fn plan_json_output() {
    let (code, stdout, _) = run(&["plan", "--format", "json", "--weeks", "6"]);
    assert_eq!(code, 0);

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["parameters"]["total_weeks"], 6);
    assert_eq!(json["table"]["rows"].as_array().unwrap().len(), 6);
    assert_eq!(json["table"]["departments"][3], "Electricians");
    assert!(json["scope_coverage"].is_number());
}

#[test]
fn plan_svg_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preview.svg");

    let (code, stdout, _) = run(&["plan", "--format", "svg", "-o", path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Wrote:"));

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert_eq!(svg.matches("<polyline").count(), 5);
}

#[test]
fn plan_rejects_over_allocation() {
    let (code, _, stderr) = run(&["plan", "--dept", "Electricians=0.9"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("exceeds 100%"), "stderr: {}", stderr);
}

#[test]
fn plan_rejects_zero_weeks() {
    let (code, _, stderr) = run(&["plan", "--weeks", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid duration"), "stderr: {}", stderr);
}

#[test]
fn plan_rejects_malformed_dept_flag() {
    let (code, _, stderr) = run(&["plan", "--dept", "Electricians"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("NAME=RATIO"), "stderr: {}", stderr);
}

// =============================================================================
// export
// =============================================================================

#[test]
fn export_writes_xlsx() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.xlsx");

    let (code, stdout, _) = run(&["export", "-o", path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("20 weeks, 4 departments"));

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[0..2], b"PK");
}

#[test]
fn export_from_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("site.toml");
    fs::write(
        &config,
        r#"
name = "Site 7"

[schedule]
total_weeks = 12
total_scope = 600.0

[[schedule.departments]]
name = "Civil"
ratio = 0.6

[[schedule.departments]]
name = "Mechanical"
ratio = 0.3

[workbook]
sheet_name = "Site 7"
"#,
    )
    .unwrap();
    let out = dir.path().join("site.xlsx");

    let (code, stdout, stderr) = run(&[
        "export",
        "--config",
        config.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("12 weeks, 2 departments"));
    assert!(out.exists());
}

#[test]
fn export_missing_config_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    let (code, _, stderr) = run(&["export", "--config", missing.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to read config"));
}

// =============================================================================
// init
// =============================================================================

#[test]
fn init_creates_config_file() {
    let dir = tempdir().unwrap();

    let (code, stdout, _) = run(&["init", "Tower B", "-o", dir.path().to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Created:"));

    let path = dir.path().join("tower-b.toml");
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("name = \"Tower B\""));
    assert!(content.contains("[[schedule.departments]]"));

    // The generated file feeds straight back into plan
    let (code, stdout, _) = run(&["plan", "--config", path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Electricians"));
}

#[test]
fn init_refuses_overwrite() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("existing.toml"), "# existing").unwrap();

    let (code, _, stderr) = run(&["init", "existing", "-o", dir.path().to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already exists"));

    let (code, _, _) = run(&[
        "init",
        "existing",
        "-o",
        dir.path().to_str().unwrap(),
        "--force",
    ]);
    assert_eq!(code, 0);
}

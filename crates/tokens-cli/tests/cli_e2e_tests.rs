//! CLI end-to-end tests that invoke the compiled `tokens` binary against
//! temporary directories.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tokens_test_utils::{TestFiles, token};

/// Get a Command for the tokens binary running inside `files`
fn tokens_cmd(files: &TestFiles) -> Command {
    let mut cmd = Command::cargo_bin("tokens").expect("Failed to find tokens binary");
    cmd.current_dir(files.root())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("TOKENS_CONFIG");
    cmd
}

fn brand_files() -> TestFiles {
    let files = TestFiles::new();
    files.write_json(
        "tokens.json",
        &json!({ "color": { "brand": token("color", json!("#0D99FF")) } }),
    );
    files
}

fn theme_files() -> TestFiles {
    let files = TestFiles::new();
    files.write_json(
        "light.json",
        &json!({ "color": { "bg": token("color", json!("#ffffff")) } }),
    );
    files.write_json(
        "dark.json",
        &json!({ "color": { "bg": token("color", json!("#000000")) } }),
    );
    files.write_json(
        "manifest.json",
        &json!({
            "name": "Theme",
            "collections": {
                "Alias": { "modes": { "Light": ["light.json"], "Dark": ["dark.json"] } }
            }
        }),
    );
    files
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let files = TestFiles::new();
    tokens_cmd(&files)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_no_command_prints_hint() {
    let files = TestFiles::new();
    tokens_cmd(&files)
        .assert()
        .success()
        .stdout(predicate::str::contains("tokens --help"));
}

// ============================================================================
// import
// ============================================================================

#[test]
fn test_import_creates_store() {
    let files = brand_files();
    tokens_cmd(&files)
        .args(["import", "tokens.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 variables were created and 0 other updates were made.",
        ));

    let store: Value = serde_json::from_str(&files.read(".tokens-store.json")).unwrap();
    assert_eq!(store["collections"][0]["name"], "tokens.json");
    assert_eq!(store["variables"][0]["name"], "color/brand");
}

#[test]
fn test_second_import_updates() {
    let files = brand_files();
    tokens_cmd(&files).args(["import", "tokens.json"]).assert().success();
    tokens_cmd(&files)
        .args(["import", "tokens.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "0 variables were created and 1 other updates were made.",
        ));
}

#[test]
fn test_dry_run_does_not_write() {
    let files = brand_files();
    tokens_cmd(&files)
        .args(["import", "tokens.json", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Variables to add: 1"))
        .stdout(predicate::str::contains("Variables to update: 0"));

    assert!(!files.path(".tokens-store.json").exists());
}

#[test]
fn test_import_json_output() {
    let files = brand_files();
    let output = tokens_cmd(&files)
        .args(["import", "tokens.json", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: Value = serde_json::from_slice(&output.stdout).unwrap();
    let last = results.as_array().unwrap().last().unwrap();
    assert_eq!(last["result"], "info");
    assert!(last["text"].as_str().unwrap().starts_with("1 variables were created"));
}

#[test]
fn test_manifest_detected_among_inputs() {
    let files = theme_files();
    tokens_cmd(&files)
        .args(["import", "light.json", "dark.json", "manifest.json"])
        .assert()
        .success();

    tokens_cmd(&files)
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alias (Light, Dark)"))
        .stdout(predicate::str::contains("color/bg [COLOR]"))
        .stdout(predicate::str::contains("Dark: #000000"));
}

#[test]
fn test_explicit_manifest_and_store() {
    let files = theme_files();
    tokens_cmd(&files)
        .args([
            "import",
            "light.json",
            "dark.json",
            "--manifest",
            "manifest.json",
            "--store",
            "out/vars.json",
        ])
        .assert()
        .success();

    assert!(files.path("out/vars.json").exists());
    assert!(!files.path(".tokens-store.json").exists());
}

#[test]
fn test_config_mode_limit_fails_import() {
    let files = theme_files();
    files.write("tokens.toml", "[store]\nmax_modes = 1\n");

    tokens_cmd(&files)
        .args(["import", "light.json", "dark.json", "manifest.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to add a variable mode for Dark"))
        .stderr(predicate::str::contains("Import reported 1 error"));
}

#[test]
fn test_missing_input_fails() {
    let files = TestFiles::new();
    tokens_cmd(&files)
        .args(["import", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_two_manifests_rejected() {
    let files = theme_files();
    files.write_json("other.json", &json!({ "collections": {} }));

    tokens_cmd(&files)
        .args(["import", "light.json", "manifest.json", "other.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("More than one manifest"));
}

// ============================================================================
// diff
// ============================================================================

#[test]
fn test_diff_shows_names() {
    let files = brand_files();
    tokens_cmd(&files)
        .args(["diff", "tokens.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+ color.brand"))
        .stdout(predicate::str::contains("1 to add, 0 to update, 0 not in this import"));
}

#[test]
fn test_diff_json_after_import() {
    let files = brand_files();
    tokens_cmd(&files).args(["import", "tokens.json"]).assert().success();
    files.write_json(
        "next.json",
        &json!({ "color": { "accent": token("color", json!("#ff0000")) } }),
    );

    let output = tokens_cmd(&files)
        .args(["diff", "next.json", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let diff: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(diff["added"], json!(["color.accent"]));
    assert_eq!(diff["removed"], json!(["color.brand"]));
    assert_eq!(diff["has_changes"], true);
}

// ============================================================================
// inspect
// ============================================================================

#[test]
fn test_inspect_empty_store() {
    let files = TestFiles::new();
    tokens_cmd(&files)
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("No collections yet"));
}

#[test]
fn test_inspect_json() {
    let files = brand_files();
    tokens_cmd(&files).args(["import", "tokens.json"]).assert().success();

    let output = tokens_cmd(&files).args(["inspect", "--json"]).output().unwrap();
    let store: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(store["variables"][0]["resolved_type"], "COLOR");
}

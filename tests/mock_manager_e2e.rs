use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn cpak() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cpak"))
}

struct TestEnv {
    _tmp: TempDir,
    bin_dir: PathBuf,
    config_file: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let bin_dir = tmp.path().join("bin");
        fs::create_dir_all(&bin_dir).expect("mkdir bin dir");
        let config_file = tmp.path().join("cpak.kdl");
        Self {
            _tmp: tmp,
            bin_dir,
            config_file,
        }
    }

    fn write_script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.bin_dir.join(name);
        fs::write(&path, format!("#!/usr/bin/env bash\nset -euo pipefail\n{}\n", body))
            .expect("write script");
        let mut perms = fs::metadata(&path).expect("stat").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod");
        path
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_file, content).expect("write config");
    }

    fn config_arg(&self) -> String {
        self.config_file.display().to_string()
    }
}

/// Standard three-manager environment: conan broken, vcpkg and cpm healthy.
fn mixed_env() -> TestEnv {
    let env = TestEnv::new();
    let conan = env.write_script("conan", "exit 1");
    let vcpkg = env.write_script(
        "vcpkg",
        r#"
sub="${1:-}"
case "$sub" in
  version)
    echo "vcpkg package management program version 2024-09-01"
    ;;
  list)
    echo "zlib:x64-linux     1.3.1      A compression library"
    echo "curl:x64-linux     8.6.0      Transfer library"
    ;;
  search)
    echo "fmt                10.1.1     Formatting library"
    ;;
  depend-info)
    case "${2:-}" in
      curl) echo "curl: openssl, zlib" ;;
      *)    echo "${2:-}: " ;;
    esac
    ;;
  install|upgrade)
    exit 0
    ;;
  remove)
    echo "error: ${2:-} is not installed" >&2
    exit 1
    ;;
  *)
    exit 2
    ;;
esac"#,
    );
    let cpm = env.write_script(
        "cpm",
        r#"
sub="${1:-}"
case "$sub" in
  --version)
    echo "cpm 1.2.0"
    ;;
  ls)
    echo '[{"name":"fmt","version":"10.1.1"},{"name":"doctest","version":"2.4.11"}]'
    ;;
  deps)
    case "${2:-}" in
      pkg1) echo '[{"name":"lib1","version":"1.0","scope":"runtime"}]' ;;
      pkg2) echo '[{"name":"lib1","version":"2.0","scope":"runtime"},{"name":"lib2","scope":"build"}]' ;;
      *)    echo '[]' ;;
    esac
    ;;
  search)
    echo '[{"name":"fmt","version":"10.1.1","description":"Formatting library"}]'
    ;;
  info)
    echo '{"name":"fmt","version":"10.1.1","license":"MIT","dependencies":["zlib"]}'
    ;;
  add|rm|up|export|import)
    exit 0
    ;;
  *)
    exit 2
    ;;
esac"#,
    );
    env.write_config(&format!(
        r#"
manager "conan" {{
    executable "{}"
}}
manager "vcpkg" {{
    executable "{}"
}}
manager "cpm" {{
    executable "{}"
}}
"#,
        conan.display(),
        vcpkg.display(),
        cpm.display()
    ));
    env
}

#[test]
fn detect_reports_mixed_availability_and_selects_by_priority() {
    let env = mixed_env();
    cpak()
        .args(["--config", &env.config_arg(), "detect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("conan"))
        .stdout(predicate::str::contains("unavailable"))
        // conan is broken, so priority falls through to vcpkg
        .stdout(predicate::str::contains("selected: vcpkg"));
}

#[test]
fn detect_json_is_machine_readable() {
    let env = mixed_env();
    let output = cpak()
        .args(["--config", &env.config_arg(), "detect", "--json"])
        .output()
        .expect("run cpak");
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(rows.len(), 3);
    let conan = rows
        .iter()
        .find(|r| r["manager"] == "conan")
        .expect("conan row");
    assert_eq!(conan["available"], false);
    let vcpkg = rows
        .iter()
        .find(|r| r["manager"] == "vcpkg")
        .expect("vcpkg row");
    assert_eq!(vcpkg["available"], true);
}

#[test]
fn priority_override_changes_selection_without_reprobing_config() {
    let env = mixed_env();
    cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--priority",
            "cpm,vcpkg",
            "detect",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected: cpm"));
}

#[test]
fn no_available_manager_is_an_actionable_error() {
    let env = TestEnv::new();
    let broken = env.write_script("broken", "exit 1");
    env.write_config(&format!(
        r#"
manager "conan" {{ executable "{b}" }}
manager "vcpkg" {{ executable "{b}" }}
manager "cpm" {{ executable "{b}" }}
"#,
        b = broken.display()
    ));
    cpak()
        .args(["--config", &env.config_arg(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No supported package manager found"));
}

#[test]
fn resolver_end_to_end_first_wins() {
    let env = mixed_env();
    // Force cpm: its mock reports versioned, scoped dependencies.
    let output = cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "cpm",
            "deps",
            "pkg1",
            "pkg2",
            "--json",
        ])
        .output()
        .expect("run cpak");
    assert!(output.status.success());

    let deps: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("valid json");
    // lib1 appears once, with pkg1's constraint (first wins), then lib2.
    assert_eq!(deps.len(), 2);
    assert_eq!(deps[0]["name"], "lib1");
    assert_eq!(deps[0]["version"], "1.0");
    assert_eq!(deps[0]["scope"], "runtime");
    assert_eq!(deps[1]["name"], "lib2");
    assert_eq!(deps[1]["version"], serde_json::Value::Null);
    assert_eq!(deps[1]["scope"], "build");
}

#[test]
fn resolver_selects_then_resolves_through_priority() {
    let env = mixed_env();
    // No --manager: selection picks vcpkg (conan broken), whose mock
    // reports curl -> openssl, zlib.
    let output = cpak()
        .args(["--config", &env.config_arg(), "deps", "curl", "--json"])
        .output()
        .expect("run cpak");
    assert!(output.status.success());

    let deps: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("valid json");
    let names: Vec<&str> = deps.iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["openssl", "zlib"]);
}

#[test]
fn unknown_package_contributes_no_dependencies() {
    let env = mixed_env();
    cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "cpm",
            "deps",
            "ghost-package",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("no direct dependencies"));
}

#[test]
fn removing_an_absent_package_succeeds() {
    let env = mixed_env();
    // vcpkg mock exits non-zero with "is not installed" - still success.
    cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "vcpkg",
            "remove",
            "nothere",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed nothere"));
}

#[test]
fn list_renders_installed_packages() {
    let env = mixed_env();
    cpak()
        .args(["--config", &env.config_arg(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zlib"))
        .stdout(predicate::str::contains("1.3.1"))
        .stdout(predicate::str::contains("2 package(s)"));
}

#[test]
fn info_found_and_not_found() {
    let env = mixed_env();
    cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "cpm",
            "info",
            "fmt",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Version: 10.1.1"))
        .stdout(predicate::str::contains("License: MIT"));

    // vcpkg mock knows neither an installed nor a searchable "nosuch"
    cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "vcpkg",
            "info",
            "nosuch",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Target not found: nosuch"));
}

#[test]
fn search_json_round_trips_package_info() {
    let env = mixed_env();
    let output = cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "cpm",
            "search",
            "fmt",
            "--json",
        ])
        .output()
        .expect("run cpak");
    assert!(output.status.success());
    let results: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(results[0]["name"], "fmt");
    assert_eq!(results[0]["status"], "notinstalled");
}

#[test]
fn config_env_overrides_reach_the_child_process() {
    let env = TestEnv::new();
    // Probe succeeds only when the configured env var is present.
    let cpm = env.write_script(
        "cpm",
        r#"test "${CPM_REGISTRY_TOKEN:-}" = "sekrit" || exit 1
case "${1:-}" in
  --version) echo "cpm 1.2.0" ;;
  ls) echo '[]' ;;
  *) exit 0 ;;
esac"#,
    );
    env.write_config(&format!(
        r#"
priority "cpm"
manager "cpm" {{
    executable "{}"
    env {{
        CPM_REGISTRY_TOKEN "sekrit"
    }}
}}
"#,
        cpm.display()
    ));
    cpak()
        .args(["--config", &env.config_arg(), "detect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected: cpm"));
}

#[test]
fn vcpkg_export_writes_manifest_and_import_restores() {
    let env = mixed_env();
    let manifest = env._tmp.path().join("transfer.json");

    cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "vcpkg",
            "export",
            "zlib",
            "curl",
            "--output",
            &manifest.display().to_string(),
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&manifest).expect("manifest written");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let packages = parsed["packages"].as_array().expect("packages array");
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0]["name"], "zlib");
    assert_eq!(packages[0]["version"], "1.3.1");

    cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "vcpkg",
            "import",
            &manifest.display().to_string(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("imported packages"));
}

#[test]
fn install_reports_per_package_outcome() {
    let env = mixed_env();
    cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "cpm",
            "install",
            "fmt@10.1.1",
            "doctest",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("fmt 10.1.1"))
        .stdout(predicate::str::contains("doctest"));
}

#[test]
fn update_all_goes_through_the_selected_manager() {
    let env = mixed_env();
    cpak()
        .args(["--config", &env.config_arg(), "--manager", "cpm", "update"])
        .assert()
        .success()
        .stdout(predicate::str::contains("update complete"));
}

#[test]
fn doctor_reports_health_and_selection() {
    let env = mixed_env();
    cpak()
        .args(["--config", &env.config_arg(), "doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manager health"))
        .stdout(predicate::str::contains("would select: vcpkg"));
}

#[test]
fn forcing_an_unknown_manager_fails_closed() {
    let env = mixed_env();
    cpak()
        .args([
            "--config",
            &env.config_arg(),
            "--manager",
            "apt",
            "list",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported package manager kind: apt"));
}

#[test]
fn malformed_config_is_rejected_with_context() {
    let env = TestEnv::new();
    env.write_config("manager \"conan\" {");
    cpak()
        .args(["--config", &env.config_arg(), "detect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KDL parsing error"));
}

#[test]
fn missing_explicit_config_file_errors() {
    let missing = Path::new("/nonexistent/cpak.kdl");
    cpak()
        .args(["--config", &missing.display().to_string(), "detect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

use assert_cmd::Command;
use predicates::prelude::*;

fn cpak() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cpak"))
}

#[test]
fn help_lists_all_subcommands() {
    cpak()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("deps"))
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn version_flag_works() {
    cpak()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cpak"));
}

#[test]
fn install_without_packages_is_a_usage_error() {
    cpak().arg("install").assert().failure().code(2);
}

#[test]
fn unknown_subcommand_is_rejected() {
    cpak().arg("frobnicate").assert().failure();
}

#[test]
fn completions_generate_for_bash() {
    cpak()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cpak"));
}

#[test]
fn zero_timeout_is_rejected() {
    cpak()
        .args(["--timeout", "0", "detect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout must be positive"));
}

#[test]
fn garbled_extra_args_are_rejected() {
    cpak()
        .args(["--extra-args", "\"unclosed", "detect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse extra arguments"));
}

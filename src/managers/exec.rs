use crate::config::types::{ManagerConfig, PROBE_TIMEOUT_SECS};
use crate::error::{CpakError, Result};
use crate::ui;
use std::io::Read;
use std::process::{Command, ExitStatus, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of an availability probe. `Unknown` covers irrecoverable
/// errors that are neither a clean "works" nor a clean "missing/broken"
/// (e.g. permission denied); callers log it and treat it as unavailable
/// so selection never stalls on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
    Unknown,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Build a direct (no shell) invocation of the manager's executable,
/// with the config's environment overrides merged in.
pub(crate) fn build_command(config: &ManagerConfig, args: &[&str]) -> Command {
    let mut cmd = Command::new(&config.executable);
    cmd.args(args);
    cmd.envs(&config.env);
    cmd
}

/// Execute a command with timeout (non-interactive)
pub(crate) fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output> {
    let cmd_debug = format!("{:?}", cmd);

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| CpakError::SystemCommandFailed {
        command: cmd_debug.clone(),
        reason: e.to_string(),
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| CpakError::SystemCommandFailed {
            command: cmd_debug.clone(),
            reason: "Failed to capture stdout".to_string(),
        })?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| CpakError::SystemCommandFailed {
            command: cmd_debug.clone(),
            reason: "Failed to capture stderr".to_string(),
        })?;

    let stdout_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = std::io::BufReader::new(stdout).read_to_end(&mut buf);
        buf
    });
    let stderr_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = std::io::BufReader::new(stderr).read_to_end(&mut buf);
        buf
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_thread.join();
                    let _ = stderr_thread.join();
                    return Err(CpakError::SystemCommandFailed {
                        command: cmd_debug,
                        reason: format!("Command timed out after {} seconds", timeout.as_secs()),
                    });
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                return Err(CpakError::SystemCommandFailed {
                    command: cmd_debug,
                    reason: e.to_string(),
                });
            }
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// Execute an interactive command with timeout (shows real-time output).
/// Used for mutating operations where the manager's own progress output
/// should reach the terminal.
pub(crate) fn run_interactive_with_timeout(
    cmd: &mut Command,
    timeout: Duration,
) -> Result<ExitStatus> {
    let cmd_debug = format!("{:?}", cmd);

    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let mut child = cmd.spawn().map_err(|e| CpakError::SystemCommandFailed {
        command: cmd_debug.clone(),
        reason: e.to_string(),
    })?;

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    ui::warning(&format!(
                        "Command timed out after {} seconds",
                        timeout.as_secs()
                    ));
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CpakError::SystemCommandFailed {
                        command: cmd_debug,
                        reason: format!("Command timed out after {} seconds", timeout.as_secs()),
                    });
                }
                thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                return Err(CpakError::SystemCommandFailed {
                    command: cmd_debug,
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Run the manager's version command under the probe timeout and classify
/// the outcome. Exit zero is Available; a missing binary, non-zero exit or
/// timeout is Unavailable; anything irrecoverable beyond those (permission
/// denied and friends) is Unknown. A missing executable *path* in the
/// config is a configuration error, not a probe signal.
pub fn probe_executable(config: &ManagerConfig, version_args: &[&str]) -> Result<Availability> {
    if config.executable.is_empty() {
        return Err(CpakError::ConfigError(format!(
            "No executable configured for manager '{}'",
            config.kind
        )));
    }

    // Bare names that which() cannot find are cheap to rule out before
    // paying for a child process.
    if !config.executable.contains(std::path::MAIN_SEPARATOR)
        && which::which(&config.executable).is_err()
    {
        return Ok(Availability::Unavailable);
    }

    let mut cmd = build_command(config, version_args);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Availability::Unavailable);
        }
        Err(_) => return Ok(Availability::Unknown),
    };

    let timeout = Duration::from_secs(PROBE_TIMEOUT_SECS);
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return Ok(if status.success() {
                    Availability::Available
                } else {
                    Availability::Unavailable
                });
            }
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(Availability::Unavailable);
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(_) => return Ok(Availability::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ManagerKind;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    fn script_config(dir: &std::path::Path, name: &str, body: &str) -> ManagerConfig {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{}", body).unwrap();
        drop(file);
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();

        ManagerConfig::for_kind(ManagerKind::Conan).with_executable(path.display().to_string())
    }

    #[test]
    fn probe_classifies_zero_exit_as_available() {
        let tmp = tempfile::tempdir().unwrap();
        let config = script_config(tmp.path(), "ok-pm", "exit 0");
        assert_eq!(
            probe_executable(&config, &["--version"]).unwrap(),
            Availability::Available
        );
    }

    #[test]
    fn probe_classifies_nonzero_exit_as_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let config = script_config(tmp.path(), "broken-pm", "exit 3");
        assert_eq!(
            probe_executable(&config, &["--version"]).unwrap(),
            Availability::Unavailable
        );
    }

    #[test]
    fn probe_classifies_missing_binary_as_unavailable() {
        let config = ManagerConfig::for_kind(ManagerKind::Conan)
            .with_executable("/nonexistent/path/to/pm-binary");
        assert_eq!(
            probe_executable(&config, &["--version"]).unwrap(),
            Availability::Unavailable
        );
    }

    #[test]
    fn probe_rejects_empty_executable_as_config_error() {
        let config = ManagerConfig::for_kind(ManagerKind::Conan).with_executable("");
        assert!(matches!(
            probe_executable(&config, &["--version"]),
            Err(CpakError::ConfigError(_))
        ));
    }

    #[test]
    fn probe_passes_env_overrides_to_child() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = script_config(tmp.path(), "env-pm", "test \"$CPAK_PROBE\" = \"yes\"");
        config
            .env
            .insert("CPAK_PROBE".to_string(), "yes".to_string());
        assert_eq!(
            probe_executable(&config, &["--version"]).unwrap(),
            Availability::Available
        );
    }

    #[test]
    fn run_with_timeout_kills_hanging_process() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let started = Instant::now();
        let result = run_with_timeout(&mut cmd, Duration::from_millis(300));
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn run_with_timeout_captures_output() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let output = run_with_timeout(&mut cmd, Duration::from_secs(5)).unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }
}

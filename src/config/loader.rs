use crate::config::types::{ManagerConfig, MAX_TIMEOUT_SECS, Settings};
use crate::core::types::ManagerKind;
use crate::error::{CpakError, Result};
use crate::utils::paths;
use kdl::{KdlDocument, KdlNode};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Load settings from an explicit path, or from the default location.
/// An explicit path must exist; a missing default file just means
/// built-in defaults (conventional executable names, default priority).
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let (file, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (paths::settings_file()?, false),
    };

    if !file.exists() {
        if required {
            return Err(CpakError::ConfigNotFound { path: file });
        }
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(&file).map_err(|e| CpakError::IoError {
        path: file.clone(),
        source: e,
    })?;
    parse_settings(&content)
}

/// Parse a cpak.kdl document:
///
/// ```kdl
/// priority "vcpkg" "conan" "cpm"
/// timeout 120
///
/// manager "conan" {
///     executable "/usr/local/bin/conan"
///     config_dir "/home/me/.conan2"
///     env {
///         CONAN_HOME "/home/me/.conan2"
///     }
/// }
/// ```
pub fn parse_settings(content: &str) -> Result<Settings> {
    let doc: KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        // Friendlier messages for the usual KDL stumbles
        let err_msg = e.to_string();
        let hint = if err_msg.contains("unexpected token") {
            "\nHint: Check for missing quotes, unmatched brackets, or invalid characters."
        } else if err_msg.contains("unexpected end of file") {
            "\nHint: You might be missing a closing brace '}'."
        } else {
            ""
        };
        CpakError::ConfigError(format!("KDL parsing error: {}{}", err_msg, hint))
    })?;

    let mut settings = Settings::default();

    for node in doc.nodes() {
        match node.name().value() {
            "priority" => {
                settings.priority = parse_priority(node)?;
            }
            "timeout" => {
                settings.operation_timeout_secs = parse_timeout(node)?;
            }
            "manager" => {
                let config = parse_manager_node(node)?;
                settings.managers.insert(config.kind, config);
            }
            "description" => {
                // No-op, just ignore description nodes
            }
            other => {
                return Err(CpakError::ConfigError(format!(
                    "Unknown top-level node '{}'. Valid nodes: priority, timeout, manager",
                    other
                )));
            }
        }
    }

    Ok(settings)
}

fn parse_kind(value: &str) -> Result<ManagerKind> {
    let kind = ManagerKind::from_str(value).unwrap_or(ManagerKind::Unknown);
    if !kind.is_concrete() {
        return Err(CpakError::ConfigError(format!(
            "Unknown manager '{}'. Valid managers: conan, vcpkg, cpm",
            value
        )));
    }
    Ok(kind)
}

fn parse_priority(node: &KdlNode) -> Result<Vec<ManagerKind>> {
    let mut priority = Vec::new();
    for entry in node.entries() {
        let Some(value) = entry.value().as_string() else {
            return Err(CpakError::ConfigError(
                "priority entries must be strings".to_string(),
            ));
        };
        let kind = parse_kind(value)?;
        if priority.contains(&kind) {
            return Err(CpakError::ConfigError(format!(
                "Manager '{}' listed twice in priority",
                value
            )));
        }
        priority.push(kind);
    }
    if priority.is_empty() {
        return Err(CpakError::ConfigError(
            "priority node needs at least one manager".to_string(),
        ));
    }
    Ok(priority)
}

fn parse_timeout(node: &KdlNode) -> Result<u64> {
    let value = node
        .entries()
        .first()
        .and_then(|e| e.value().as_integer())
        .ok_or_else(|| {
            CpakError::ConfigError("timeout needs an integer number of seconds".to_string())
        })?;
    if value <= 0 {
        return Err(CpakError::ConfigError(
            "timeout must be positive".to_string(),
        ));
    }
    Ok((value as u64).min(MAX_TIMEOUT_SECS))
}

fn parse_manager_node(node: &KdlNode) -> Result<ManagerConfig> {
    let name = node
        .entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| {
            CpakError::ConfigError("manager node needs a name argument".to_string())
        })?;
    let kind = parse_kind(name)?;
    let mut config = ManagerConfig::for_kind(kind);

    let Some(children) = node.children() else {
        return Ok(config);
    };

    for child in children.nodes() {
        match child.name().value() {
            "executable" => {
                let value = first_string_arg(child, "executable")?;
                if value.is_empty() {
                    return Err(CpakError::ConfigError(format!(
                        "manager '{}' has an empty executable",
                        name
                    )));
                }
                config.executable = value;
            }
            "config_dir" => config.config_dir = Some(PathBuf::from(first_string_arg(child, "config_dir")?)),
            "cache_dir" => config.cache_dir = Some(PathBuf::from(first_string_arg(child, "cache_dir")?)),
            "install_dir" => config.install_dir = Some(PathBuf::from(first_string_arg(child, "install_dir")?)),
            "env" => parse_env_block(child, &mut config, name)?,
            other => {
                return Err(CpakError::ConfigError(format!(
                    "Unknown field '{}' in manager '{}'. Valid fields: executable, config_dir, cache_dir, install_dir, env",
                    other, name
                )));
            }
        }
    }

    Ok(config)
}

fn parse_env_block(node: &KdlNode, config: &mut ManagerConfig, manager: &str) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };
    for var in children.nodes() {
        let key = var.name().value().to_string();
        let value = first_string_arg(var, &key)?;
        if config.env.insert(key.clone(), value).is_some() {
            return Err(CpakError::ConfigError(format!(
                "Duplicate env key '{}' for manager '{}'",
                key, manager
            )));
        }
    }
    Ok(())
}

fn first_string_arg(node: &KdlNode, field: &str) -> Result<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(str::to_string)
        .ok_or_else(|| {
            CpakError::ConfigError(format!("field '{}' needs a string value", field))
        })
}

use crate::cli::args::GlobalFlags;
use crate::config::types::{MAX_TIMEOUT_SECS, Settings};
use crate::config::load_settings;
use crate::core::detector::Detector;
use crate::core::selector::Selector;
use crate::core::types::ManagerKind;
use crate::error::{CpakError, Result};
use crate::managers::{ManagerFactory, PackageManager};
use crate::ui;
use std::str::FromStr;

/// Shared command context: settings → detector → selector, built once
/// per invocation. Commands either ask for the selected manager or for
/// a specific kind the user forced with `--manager`.
pub struct Runtime {
    pub settings: Settings,
    pub detector: Detector,
    pub selector: Selector,
    extra_args: Vec<String>,
}

/// Parse a user-supplied manager name, rejecting anything outside the
/// closed enumeration.
pub fn parse_kind(name: &str) -> Result<ManagerKind> {
    let kind = ManagerKind::from_str(name).unwrap_or(ManagerKind::Unknown);
    if !kind.is_concrete() {
        return Err(CpakError::UnsupportedBackend(name.to_string()));
    }
    Ok(kind)
}

impl Runtime {
    pub fn from_flags(global: &GlobalFlags) -> Result<Self> {
        let mut settings = load_settings(global.config.as_deref())?;

        if let Some(timeout) = global.timeout {
            if timeout == 0 {
                return Err(CpakError::ConfigError("timeout must be positive".into()));
            }
            settings.operation_timeout_secs = timeout.min(MAX_TIMEOUT_SECS);
        }

        if let Some(list) = &global.priority {
            let mut priority = Vec::new();
            for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let kind = parse_kind(name)?;
                if !priority.contains(&kind) {
                    priority.push(kind);
                }
            }
            if priority.is_empty() {
                return Err(CpakError::ConfigError(
                    "priority override must name at least one manager".into(),
                ));
            }
            settings.priority = priority;
        }

        let extra_args = match &global.extra_args {
            Some(raw) => shlex::split(raw).ok_or_else(|| {
                CpakError::ConfigError(format!("Could not parse extra arguments: '{}'", raw))
            })?,
            None => Vec::new(),
        };

        let detector = Detector::from_settings(&settings);
        let selector = Selector::new(settings.priority.clone());

        Ok(Self {
            settings,
            detector,
            selector,
            extra_args,
        })
    }

    /// Pick the manager kind to use: an explicit `--manager` override
    /// wins, otherwise priority-based selection over the detected set.
    pub fn select_kind(&mut self, override_name: Option<&str>) -> Result<ManagerKind> {
        if let Some(name) = override_name {
            return parse_kind(name);
        }

        let available = self.detector.available_kinds()?;
        self.selector.select(&available).ok_or_else(|| {
            let probed = self
                .selector
                .priority()
                .iter()
                .map(ManagerKind::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            CpakError::NoManagerAvailable { probed }
        })
    }

    /// Selected (or forced) manager instance, ready for operations.
    pub fn manager(&mut self, override_name: Option<&str>) -> Result<Box<dyn PackageManager>> {
        let kind = self.select_kind(override_name)?;
        ui::debug(&format!("using manager: {}", kind));
        self.create(kind)
    }

    /// Instance for one specific kind.
    pub fn create(&self, kind: ManagerKind) -> Result<Box<dyn PackageManager>> {
        ManagerFactory::create(
            &self.settings.manager_config(kind),
            self.settings.operation_timeout_secs,
            self.extra_args.clone(),
        )
    }
}

/// Split an `name@version` install spec.
pub fn split_spec(spec: &str) -> (&str, Option<&str>) {
    match spec.split_once('@') {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => (name, Some(version)),
        Some((name, _)) if !name.is_empty() => (name, None),
        _ => (spec, None),
    }
}

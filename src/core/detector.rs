use crate::config::types::{ManagerConfig, Settings};
use crate::core::types::ManagerKind;
use crate::error::Result;
use crate::managers::exec::{self, Availability};
use crate::ui;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Memoized probe result for one manager kind.
#[derive(Debug, Clone)]
pub struct DetectionEntry {
    pub available: bool,
    pub checked_at: DateTime<Utc>,
}

/// Probes which package managers actually work on this host and holds
/// the result for its own lifetime. Detection state is explicit: pass
/// the Detector to whoever needs it instead of consulting a global.
/// Re-detection never happens behind the caller's back: `invalidate` or
/// `refresh` is an explicit action.
pub struct Detector {
    configs: Vec<ManagerConfig>,
    entries: Option<BTreeMap<ManagerKind, DetectionEntry>>,
}

/// Version-probe argument list per kind (vcpkg spells it without dashes).
fn probe_args(kind: ManagerKind) -> &'static [&'static str] {
    match kind {
        ManagerKind::Vcpkg => &["version"],
        _ => &["--version"],
    }
}

impl Detector {
    /// Detector over an explicit config set. `Unknown` entries are
    /// dropped up front, they can never probe successfully.
    pub fn new(configs: Vec<ManagerConfig>) -> Self {
        Self {
            configs: configs
                .into_iter()
                .filter(|c| c.kind.is_concrete())
                .collect(),
            entries: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.all_manager_configs())
    }

    /// Probe every configured kind, memoized. Each probe is independent:
    /// one manager hanging until its timeout or crashing does not stop
    /// the others from being probed.
    pub fn detect(&mut self) -> Result<&BTreeMap<ManagerKind, DetectionEntry>> {
        if self.entries.is_none() {
            let mut entries = BTreeMap::new();
            for config in &self.configs {
                let availability = exec::probe_executable(config, probe_args(config.kind))?;
                if availability == Availability::Unknown {
                    ui::warning(&format!(
                        "probe for '{}' failed with an unexpected error; treating as unavailable",
                        config.kind
                    ));
                }
                entries.insert(
                    config.kind,
                    DetectionEntry {
                        available: availability.is_available(),
                        checked_at: Utc::now(),
                    },
                );
            }
            self.entries = Some(entries);
        }
        Ok(self.entries.as_ref().expect("just populated"))
    }

    /// The kinds that probed available. A set: ordering for decisions is
    /// the Selector's job.
    pub fn available_kinds(&mut self) -> Result<BTreeSet<ManagerKind>> {
        Ok(self
            .detect()?
            .iter()
            .filter(|(_, entry)| entry.available)
            .map(|(kind, _)| *kind)
            .collect())
    }

    /// Drop the memoized result; the next `detect` re-probes.
    pub fn invalidate(&mut self) {
        self.entries = None;
    }

    /// Explicit re-probe.
    pub fn refresh(&mut self) -> Result<&BTreeMap<ManagerKind, DetectionEntry>> {
        self.invalidate();
        self.detect()
    }

    pub fn configured_kinds(&self) -> Vec<ManagerKind> {
        self.configs.iter().map(|c| c.kind).collect()
    }
}

use crate::core::types::ManagerKind;
use std::collections::BTreeSet;

/// Combines preference (the priority list) with fact (the detected set)
/// and nothing else. Priority is caller-supplied policy and can change
/// at runtime without re-probing; detection stays the Detector's
/// business. A host with no usable manager yields `None`, never an
/// arbitrary default.
#[derive(Debug, Clone)]
pub struct Selector {
    priority: Vec<ManagerKind>,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            priority: ManagerKind::all().to_vec(),
        }
    }
}

impl Selector {
    /// Selector with an explicit priority ordering, highest first.
    /// `Unknown` entries are ignored, the sentinel is never selectable.
    pub fn new(priority: Vec<ManagerKind>) -> Self {
        Self {
            priority: priority
                .into_iter()
                .filter(ManagerKind::is_concrete)
                .collect(),
        }
    }

    pub fn priority(&self) -> &[ManagerKind] {
        &self.priority
    }

    /// Replace the priority ordering without touching detection state.
    pub fn set_priority(&mut self, priority: Vec<ManagerKind>) {
        self.priority = priority
            .into_iter()
            .filter(ManagerKind::is_concrete)
            .collect();
    }

    /// First kind in priority order that is present in the available
    /// set. Total but optional: no match is `None`, not an error.
    pub fn select(&self, available: &BTreeSet<ManagerKind>) -> Option<ManagerKind> {
        self.priority
            .iter()
            .copied()
            .find(|kind| available.contains(kind))
    }
}

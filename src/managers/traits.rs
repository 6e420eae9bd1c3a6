use crate::core::types::{ManagerKind, PackageDependency, PackageInfo};
use crate::error::Result;
use std::path::Path;

/// Capability contract every concrete package manager satisfies.
///
/// Mutating operations return `Ok(false)` when the underlying tool
/// reports failure (non-zero exit, timeout); `Err` is reserved for
/// configuration-level problems. Query operations model "nothing found"
/// as empty/`None`, never as an error.
pub trait PackageManager: Send + Sync {
    fn kind(&self) -> ManagerKind;

    /// Bounded-time version probe. Never errors for a missing binary.
    fn is_available(&self) -> bool;

    /// Install one package, optionally pinned to a version. Installing a
    /// package that is already present at the same version is success.
    fn install(&self, name: &str, version: Option<&str>) -> Result<bool>;

    /// Remove one package. Idempotent: removing an absent package succeeds.
    fn uninstall(&self, name: &str) -> Result<bool>;

    /// Update one package, or everything when `name` is `None`.
    fn update(&self, name: Option<&str>) -> Result<bool>;

    /// Repository search. Empty result when nothing matches.
    fn search(&self, query: &str) -> Result<Vec<PackageInfo>>;

    /// Detail lookup. `None` means not found, distinct from a process error.
    fn info(&self, name: &str) -> Result<Option<PackageInfo>>;

    /// Installed packages, status always `Installed`.
    fn list_installed(&self) -> Result<Vec<PackageInfo>>;

    /// Direct (non-transitive) dependencies of one package as this
    /// manager reports them. Unknown package yields an empty list.
    fn get_dependencies(&self, name: &str) -> Result<Vec<PackageDependency>>;

    /// Export named packages to `destination`. Format is manager-specific.
    fn export(&self, names: &[String], destination: &Path) -> Result<bool>;

    /// Import packages from `source`. Format is manager-specific.
    fn import(&self, source: &Path) -> Result<bool>;

    /// Sanity check. The default is the availability probe; managers with
    /// writable-directory or profile requirements layer their own checks.
    fn validate(&self) -> Result<bool> {
        Ok(self.is_available())
    }
}

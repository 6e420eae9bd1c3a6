use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// Supported package manager kinds.
// To add a new manager (e.g. Hunter), add a variant here and update:
// - ManagerKind::display()
// - ManagerKind::from_str()
// - ManagerFactory::create()
// - Detector::default_configs()
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    Conan,   // Conan 2.x (binary packages, profiles)
    Vcpkg,   // Microsoft vcpkg (ports, triplets)
    Cpm,     // Header-only fetch tool
    Unknown, // Sentinel: never selectable, factory rejects it
}

impl ManagerKind {
    /// All concrete kinds, in the default priority order.
    /// `Unknown` is deliberately excluded.
    pub fn all() -> [ManagerKind; 3] {
        [ManagerKind::Conan, ManagerKind::Vcpkg, ManagerKind::Cpm]
    }

    pub fn is_concrete(&self) -> bool {
        !matches!(self, ManagerKind::Unknown)
    }

    /// Default executable name looked up on PATH when no config overrides it.
    pub fn default_executable(&self) -> &'static str {
        match self {
            ManagerKind::Conan => "conan",
            ManagerKind::Vcpkg => "vcpkg",
            ManagerKind::Cpm => "cpm",
            ManagerKind::Unknown => "",
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conan => write!(f, "conan"),
            Self::Vcpkg => write!(f, "vcpkg"),
            Self::Cpm => write!(f, "cpm"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// Parsing is lossy on purpose: anything unrecognized maps to Unknown,
// and the factory rejects Unknown with a configuration error. This keeps
// the enumeration closed without sprinkling parse errors through config code.
impl FromStr for ManagerKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "conan" => ManagerKind::Conan,
            "vcpkg" => ManagerKind::Vcpkg,
            "cpm" => ManagerKind::Cpm,
            _ => ManagerKind::Unknown,
        })
    }
}

/// Lifecycle state of a package with respect to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Installed,
    NotInstalled,
    Outdated,
    Error,
}

/// Where a dependency participates in a consumer's build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Build,
    Test,
    Runtime,
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Test => write!(f, "test"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// Query result for one package as reported by one manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInfo {
    // Immutable once constructed; read through name().
    name: String,
    /// Empty string when the manager does not report a version.
    pub version: String,
    pub status: PackageStatus,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub license: Option<String>,
    /// Names of direct dependencies. Set semantics: no duplicates,
    /// never contains the package's own name.
    pub dependencies: Vec<String>,
    pub install_location: Option<PathBuf>,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>, status: PackageStatus) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            status,
            description: None,
            homepage: None,
            license: None,
            dependencies: Vec::new(),
            install_location: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a dependency name, keeping set semantics and dropping self-references.
    pub fn push_dependency(&mut self, dep: impl Into<String>) {
        let dep = dep.into();
        if dep.is_empty() || dep == self.name || self.dependencies.contains(&dep) {
            return;
        }
        self.dependencies.push(dep);
    }
}

/// One edge in a dependency request, as reported by a manager for a
/// single package. The resolver aggregates these across packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDependency {
    pub name: String,
    /// Required-version constraint, verbatim from the manager ("1.0", ">=2.3").
    pub version: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
    pub scope: Option<DependencyScope>,
}

fn default_required() -> bool {
    true
}

impl PackageDependency {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            required: true,
            scope: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_scope(mut self, scope: DependencyScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

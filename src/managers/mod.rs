//! # Package Manager Adapters
//!
//! One adapter per supported native C/C++ package manager, all behind
//! the [`PackageManager`] trait so callers never special-case a kind
//! outside the Selector/Factory pair.
//!
//! - **conan** (`conan.rs`): Conan 2.x, structured queries via `--format=json`
//! - **vcpkg** (`vcpkg.rs`): classic-mode vcpkg, line-oriented text output
//! - **cpm** (`cpm.rs`): header-only fetch tool, `--json` everywhere
//!
//! Shared plumbing:
//!
//! - [`exec`]: bounded-timeout process execution and the availability probe
//! - [`cache`]: per-instance response cache keyed by package name
//! - [`factory`]: config → instance dispatch, fail-closed on unknown kinds
//!
//! Every operation shells out to the manager's executable directly
//! (no shell interpolation) with the config's environment overrides
//! merged in. Probes run under a 10 second timeout; mutating operations
//! default to 300 seconds.

pub mod cache;
pub mod conan;
pub mod cpm;
pub mod exec;
pub mod factory;
pub mod traits;
pub mod vcpkg;

pub use exec::Availability;
pub use factory::ManagerFactory;
pub use traits::PackageManager;

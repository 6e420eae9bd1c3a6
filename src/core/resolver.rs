use crate::core::types::PackageDependency;
use crate::managers::traits::PackageManager;
use crate::ui;
use std::collections::HashSet;

/// Aggregate the direct dependencies of every requested package into one
/// deduplicated, insertion-ordered list.
///
/// Requested packages are visited in input order and the first-seen
/// occurrence of a dependency name wins; later occurrences, even with a
/// different version constraint or scope, are dropped. No transitive
/// closure: exactly one level deep. A failed lookup for one package
/// contributes zero dependencies and never aborts the rest; callers that
/// need per-package failure detail wrap `get_dependencies` themselves.
///
/// The visit order and first-wins rule make the output deterministic for
/// a fixed input, which reproducible builds depend on.
pub fn resolve_dependencies(
    manager: &dyn PackageManager,
    requests: &[String],
) -> Vec<PackageDependency> {
    let mut resolved: Vec<PackageDependency> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for request in requests {
        let deps = match manager.get_dependencies(request) {
            Ok(deps) => deps,
            Err(e) => {
                ui::debug(&format!("dependency lookup for '{}' failed: {}", request, e));
                continue;
            }
        };
        for dep in deps {
            if seen.contains(&dep.name) {
                continue;
            }
            seen.insert(dep.name.clone());
            resolved.push(dep);
        }
    }

    resolved
}

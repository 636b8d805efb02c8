use indexmap::IndexMap;

use crate::package::{Dependency, PackageRef, ProductMap};

use super::id_map::NameIdMap;
use super::SortMode;

/// Translate a package index into CNF clauses over interned variable
/// ids, registering every referenced package in the product map.
///
/// Emits one clause `(-target, alt1, ..., altN)` per requirement group
/// and, per product, the pairwise exclusions that keep more than one
/// version of the same product out of a model.
pub(crate) fn encode(
    index: &[Dependency],
    sort_mode: SortMode,
    ids: &mut NameIdMap,
    products: &mut ProductMap,
) -> Vec<Vec<i32>> {
    // Preload the id map in preference order. The solver keeps the
    // highest-numbered satisfiable alternative of a requirement group,
    // so the preferred version of each product is interned last.
    if sort_mode != SortMode::None {
        let mut flat = flatten_index(index);
        flat.sort_by_cached_key(|pack| pack.package_name());
        if sort_mode == SortMode::PreferLow {
            flat.reverse();
        }
        for pack in &flat {
            ids.intern(&pack.package_name());
        }
    }

    let mut clauses = Vec::new();

    for dep in index {
        let target = ids.intern(&dep.target.package_name());
        products.add(dep.target.clone());

        for group in &dep.requires {
            let mut clause = Vec::with_capacity(group.len() + 1);
            clause.push(-target);
            for alt in group {
                clause.push(ids.intern(&alt.package_name()));
                products.add(alt.clone());
            }
            clauses.push(clause);
        }
    }

    // At most one version per product.
    for product in products.product_names() {
        let versions = products.packages_of(product);
        let vids: Vec<i32> = versions
            .iter()
            .map(|pack| ids.intern(&pack.package_name()))
            .collect();
        clauses.extend(exclusion_clauses(&vids));
    }

    clauses
}

/// Every package referenced anywhere in the index (targets and all
/// requirement-group alternatives), deduplicated by package name.
fn flatten_index(index: &[Dependency]) -> Vec<PackageRef> {
    let mut seen: IndexMap<String, PackageRef> = IndexMap::new();
    for dep in index {
        seen.entry(dep.target.package_name())
            .or_insert_with(|| dep.target.clone());
        for group in &dep.requires {
            for alt in group {
                seen.entry(alt.package_name()).or_insert_with(|| alt.clone());
            }
        }
    }
    seen.into_values().collect()
}

/// Pairwise exclusion clauses for the given ids: `n * (n - 1) / 2`
/// two-literal clauses forbidding any two from holding together.
fn exclusion_clauses(vids: &[i32]) -> Vec<Vec<i32>> {
    let n = vids.len();
    if n <= 1 {
        return Vec::new();
    }
    let mut clauses = Vec::with_capacity(n * (n - 1) / 2);
    for x in 0..n - 1 {
        for y in x + 1..n {
            clauses.push(vec![-vids[x], -vids[y]]);
        }
    }
    clauses
}

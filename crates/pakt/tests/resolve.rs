use std::collections::{HashMap, HashSet};

use pakt::{Dependency, Package, PackageRef, Resolver, SortMode};

fn pack(product: &str, version: &str) -> PackageRef {
    Package::new(product, version).into_ref()
}

fn dep(target: PackageRef, groups: Vec<Vec<PackageRef>>) -> Dependency {
    Dependency {
        target,
        requires: groups,
    }
}

/// Every solution holds at most one package per product.
fn assert_one_version_per_product(solution: &[PackageRef]) {
    let mut products: HashMap<&str, usize> = HashMap::new();
    for pack in solution {
        *products.entry(pack.product_name()).or_default() += 1;
    }
    for (product, count) in products {
        assert_eq!(count, 1, "product {} selected {} times", product, count);
    }
}

/// Every requirement group of every selected package is satisfied by
/// the solution.
fn assert_closure(index: &[Dependency], solution: &[PackageRef]) {
    let selected: HashSet<String> = solution.iter().map(|p| p.package_name()).collect();
    for dependency in index {
        if !selected.contains(&dependency.target.package_name()) {
            continue;
        }
        for group in &dependency.requires {
            assert!(
                group.iter().any(|alt| selected.contains(&alt.package_name())),
                "unsatisfied group of {}",
                dependency.target.package_name(),
            );
        }
    }
}

fn sample_index() -> Vec<Dependency> {
    vec![
        dep(
            pack("A", "1.0.0"),
            vec![
                vec![pack("B", "1.2.3"), pack("B", "1.2.5"), pack("B", "1.2.9")],
                vec![pack("C", "2.0.0"), pack("C", "2.1.0"), pack("C", "2.2.0")],
            ],
        ),
        dep(
            pack("C", "2.1.0"),
            vec![
                vec![pack("D", "5.0.0"), pack("D", "5.0.1")],
                vec![pack("E", "2.0.0"), pack("E", "3.0.0")],
            ],
        ),
        dep(
            pack("D", "5.0.1"),
            vec![
                vec![pack("B", "1.2.3"), pack("B", "1.2.9")],
                vec![pack("E", "3.0.0")],
            ],
        ),
        dep(pack("Z", "1.0.0"), vec![]),
    ]
}

#[test]
fn solution_satisfies_universal_properties() {
    let index = sample_index();
    let requires = vec![pack("A", "1.0.0"), pack("C", "2.1.0")];
    let mut resolver = Resolver::new(requires.clone(), index.clone());

    assert!(resolver.resolve().unwrap());
    let solution = resolver.solution().to_vec();

    assert_one_version_per_product(&solution);
    assert_closure(&index, &solution);

    // Every requirement appears in the solution.
    let selected: HashSet<String> = solution.iter().map(|p| p.package_name()).collect();
    for required in &requires {
        assert!(selected.contains(&required.package_name()));
    }
}

#[test]
fn conflicts_are_a_subset_of_the_requirements() {
    let index = vec![
        dep(pack("A", "1.0.0"), vec![vec![pack("C", "1.0.0")]]),
        dep(pack("B", "1.0.0"), vec![vec![pack("C", "2.0.0")]]),
    ];
    let requires = vec![pack("A", "1.0.0"), pack("B", "1.0.0"), pack("Z", "9.0.0")];
    let mut resolver = Resolver::new(requires.clone(), index);
    resolver.require_temp(pack("A", "1.0.0"));

    assert!(!resolver.resolve().unwrap());

    let allowed: HashSet<String> = requires.iter().map(|p| p.package_name()).collect();
    for conflict in resolver.conflicts() {
        assert!(allowed.contains(&conflict.package_name()));
    }
}

#[test]
fn sort_modes_pick_the_expected_versions() {
    let index = vec![
        dep(pack("A", "1.0.0"), vec![vec![pack("B", "1.0.0"), pack("B", "2.0.0")]]),
        dep(pack("A", "2.0.0"), vec![vec![pack("B", "1.0.0"), pack("B", "2.0.0")]]),
        dep(pack("B", "1.0.0"), vec![vec![pack("C", "1.0.0"), pack("C", "2.0.0")]]),
        dep(pack("B", "2.0.0"), vec![vec![pack("C", "1.0.0"), pack("C", "2.0.0")]]),
        dep(pack("C", "1.0.0"), vec![]),
        dep(pack("C", "2.0.0"), vec![]),
    ];

    let mut high = Resolver::new_sorted(
        vec![pack("A", "2.0.0")],
        index.clone(),
        SortMode::PreferHigh,
    );
    assert!(high.resolve().unwrap());
    let mut names: Vec<String> = high.solution().iter().map(|p| p.package_name()).collect();
    names.sort();
    assert_eq!(names, vec!["A-2.0.0", "B-2.0.0", "C-2.0.0"]);

    let mut low = Resolver::new_sorted(
        vec![pack("A", "1.0.0")],
        index,
        SortMode::PreferLow,
    );
    assert!(low.resolve().unwrap());
    let mut names: Vec<String> = low.solution().iter().map(|p| p.package_name()).collect();
    names.sort();
    assert_eq!(names, vec!["A-1.0.0", "B-1.0.0", "C-1.0.0"]);
}

#[test]
fn reconfiguration_discards_previous_results() {
    let mut resolver = Resolver::new(
        vec![pack("Z", "1.0.0")],
        vec![dep(pack("Z", "1.0.0"), vec![])],
    );
    assert!(resolver.resolve().unwrap());
    assert!(resolver.solved());

    resolver.set_package_index(sample_index());
    assert!(!resolver.solved());
    assert!(resolver.solution().is_empty());
    assert!(resolver.conflicts().is_empty());
}

#[test]
fn custom_packager_implementations_are_accepted() {
    use std::sync::Arc;

    #[derive(Debug)]
    struct Pinned {
        product: &'static str,
        version: &'static str,
    }

    impl pakt::Packager for Pinned {
        fn product_name(&self) -> &str {
            self.product
        }
        fn version(&self) -> &str {
            self.version
        }
    }

    let target: PackageRef = Arc::new(Pinned {
        product: "tool",
        version: "1.0",
    });
    let index = vec![dep(target.clone(), vec![vec![pack("lib", "1.0")]])];
    let mut resolver = Resolver::new(vec![target], index);

    assert!(resolver.resolve().unwrap());
    let names: HashSet<String> = resolver
        .solution()
        .iter()
        .map(|p| p.package_name())
        .collect();
    assert!(names.contains("tool-1.0"));
    assert!(names.contains("lib-1.0"));
}

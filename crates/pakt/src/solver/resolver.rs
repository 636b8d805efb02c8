use std::mem;
use std::time::Instant;

use crate::error::{ResolverError, Result};
use crate::package::relation::PackageRelations;
use crate::package::{Dependency, PackageRef, Packager, ProductMap};

use super::core_report::parse_core;
use super::driver::{SatDriver, SolveStatus};
use super::encoder::encode;
use super::id_map::NameIdMap;
use super::SortMode;

/// Attempts to solve a package selection from a set of requirements
/// against a package dependency index.
///
/// A resolver is a single cooperative actor: construction,
/// reconfiguration and `resolve` belong on one thread. Independent
/// resolvers may run in parallel on disjoint inputs.
pub struct Resolver {
    driver: SatDriver,
    ids: NameIdMap,
    products: ProductMap,
    sort_mode: SortMode,
    index: Vec<Dependency>,
    requires: Vec<PackageRef>,
    /// Temp requirements queued for the next resolve.
    pending_temp: Vec<PackageRef>,
    /// Temp requirements consumed by the last resolve.
    active_temp: Vec<PackageRef>,
    solution: Vec<PackageRef>,
    /// Cached detailed conflict report for the last resolve.
    detailed: Option<PackageRelations>,
}

impl Resolver {
    /// Create a resolver from a requirement list and a package index.
    pub fn new(requires: Vec<PackageRef>, index: Vec<Dependency>) -> Self {
        Self::new_sorted(requires, index, SortMode::None)
    }

    /// Create a resolver that additionally sorts the package index
    /// before loading it, biasing solutions toward higher or lower
    /// versions.
    pub fn new_sorted(
        requires: Vec<PackageRef>,
        index: Vec<Dependency>,
        sort_mode: SortMode,
    ) -> Self {
        let mut resolver = Self {
            driver: SatDriver::new(),
            ids: NameIdMap::new(),
            products: ProductMap::new(),
            sort_mode,
            index,
            requires,
            pending_temp: Vec::new(),
            active_temp: Vec::new(),
            solution: Vec::new(),
            detailed: None,
        };
        resolver.initialize();
        resolver
    }

    /// Replace the requirement list. Resets all solver state.
    pub fn set_requirements(&mut self, requires: Vec<PackageRef>) {
        self.requires = requires;
        self.initialize();
    }

    /// Replace the package index. Resets all solver state.
    pub fn set_package_index(&mut self, index: Vec<Dependency>) {
        self.index = index;
        self.initialize();
    }

    /// Discard the engine and both maps, then reload the clauses from
    /// the currently configured index.
    fn initialize(&mut self) {
        self.driver = SatDriver::new();
        self.ids = NameIdMap::new();
        self.products = ProductMap::new();
        self.pending_temp.clear();
        self.active_temp.clear();
        self.solution.clear();
        self.detailed = None;

        let clauses = encode(
            &self.index,
            self.sort_mode,
            &mut self.ids,
            &mut self.products,
        );
        self.driver.set_variable_hint(self.ids.len());
        self.driver.add_clauses(&clauses);

        log::debug!(
            "loaded {} packages of {} products as {} variables and {} clauses",
            self.products.num_packages(),
            self.products.num_products(),
            self.ids.len(),
            clauses.len(),
        );
    }

    /// Add one extra requirement that must hold for the next call to
    /// `resolve` only; it is retracted afterwards.
    pub fn require_temp(&mut self, pack: PackageRef) {
        let id = self.ids.intern(&pack.package_name());
        self.driver.assume(id);
        self.pending_temp.push(pack);
    }

    /// Attempt to resolve a package solution with the current
    /// requirements. `Ok(true)` means a solution was found, `Ok(false)`
    /// that the requirements cannot be satisfied; an `Err` signals an
    /// internal failure.
    pub fn resolve(&mut self) -> Result<bool> {
        self.solution.clear();
        self.detailed = None;
        self.active_temp = mem::take(&mut self.pending_temp);

        // Push the fixed requirements as one-shot assumptions. New
        // names intern fresh, unconstrained variables.
        for pack in &self.requires {
            let id = self.ids.intern(&pack.package_name());
            self.driver.assume(id);
        }

        let start = Instant::now();
        match self.driver.solve()? {
            SolveStatus::Satisfiable => {
                self.decode_solution()?;
                log::info!(
                    "resolved {} packages in {:.3}s",
                    self.solution.len(),
                    start.elapsed().as_secs_f64(),
                );
                Ok(true)
            }
            SolveStatus::Unsatisfiable => {
                log::info!(
                    "requirements unsatisfiable after {:.3}s",
                    start.elapsed().as_secs_f64(),
                );
                if self.driver.failed_assumptions().is_empty() {
                    log::debug!("no failed assumptions; the conflict list will be empty");
                }
                Ok(false)
            }
            SolveStatus::Unknown => {
                Err(ResolverError::Engine("engine returned no verdict".into()))
            }
        }
    }

    /// The last successfully resolved solution, in solver variable
    /// order. Empty until a resolve succeeds.
    pub fn solution(&self) -> &[PackageRef] {
        &self.solution
    }

    /// Whether the last resolve found a solution.
    pub fn solved(&self) -> bool {
        self.driver.status() == SolveStatus::Satisfiable
    }

    /// Look up a package known to the resolver by its package name.
    pub fn package_by_name(&self, package_name: &str) -> Result<PackageRef> {
        self.products.by_name(package_name)
    }

    /// Whether the named package was one of the requirements that made
    /// the last resolve fail. Unknown names are never conflicts.
    pub fn is_package_name_conflict(&self, package_name: &str) -> bool {
        match self.ids.get(package_name) {
            Some(id) => self.driver.failed_assumption(id),
            None => false,
        }
    }

    /// Whether the given package was one of the requirements that made
    /// the last resolve fail.
    pub fn is_package_conflict(&self, pack: &dyn Packager) -> bool {
        self.is_package_name_conflict(&pack.package_name())
    }

    /// The requirements (fixed or temp) that made the last resolve
    /// fail, in the order the driver reported them.
    pub fn conflicts(&self) -> Vec<PackageRef> {
        self.driver
            .failed_assumptions()
            .iter()
            .filter_map(|&id| {
                let name = self.ids.name(id);
                self.products
                    .by_name(name)
                    .ok()
                    .or_else(|| self.assumed_package(name))
            })
            .collect()
    }

    /// A typed description of the packages involved in the last failed
    /// resolve, rebuilt from the engine's clausal core and cached until
    /// the next resolve. Empty when the last resolve succeeded.
    pub fn detailed_conflicts(&mut self) -> Result<&PackageRelations> {
        let relations = match self.detailed.take() {
            Some(relations) => relations,
            None if self.solved() => PackageRelations::default(),
            None => {
                let mut core = Vec::new();
                self.driver.write_clausal_core(&mut core)?;
                parse_core(core.as_slice(), &self.ids, &self.products)?
            }
        };
        Ok(self.detailed.insert(relations))
    }

    /// Remap the model back into package values. Requirement names
    /// that are not part of the index resolve through the requirement
    /// lists instead of the product map.
    fn decode_solution(&mut self) -> Result<()> {
        let mut solution = Vec::new();
        for id in 1..=self.ids.len() as i32 {
            if !self.driver.value(id) {
                continue;
            }
            let name = self.ids.name(id);
            let pack = match self.products.by_name(name) {
                Ok(pack) => pack,
                Err(_) => self.assumed_package(name).ok_or_else(|| {
                    ResolverError::UnknownPackage {
                        name: name.to_string(),
                    }
                })?,
            };
            solution.push(pack);
        }
        self.solution = solution;
        Ok(())
    }

    fn assumed_package(&self, name: &str) -> Option<PackageRef> {
        self.requires
            .iter()
            .chain(self.active_temp.iter())
            .find(|pack| pack.package_name() == name)
            .cloned()
    }
}

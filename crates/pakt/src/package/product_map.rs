use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{ResolverError, Result};

use super::PackageRef;

/// Tracks every package known to a resolver, organized both as a
/// mapping of product names to the package versions of that product,
/// and as a flat package-name lookup.
#[derive(Debug, Default)]
pub struct ProductMap {
    /// Product name -> package name -> package, in first-seen order.
    products: IndexMap<String, IndexMap<String, PackageRef>>,
    /// Flat package-name index.
    packages: HashMap<String, PackageRef>,
}

impl ProductMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package, organized by its product name. Adding the same
    /// package twice is idempotent.
    pub fn add(&mut self, pack: PackageRef) {
        let product = pack.product_name().to_string();
        let name = pack.package_name();

        self.products
            .entry(product)
            .or_default()
            .insert(name.clone(), pack.clone());
        self.packages.insert(name, pack);
    }

    /// All packages of a product. The order is unspecified to callers;
    /// sort when order matters.
    pub fn packages_of(&self, product: &str) -> Vec<PackageRef> {
        self.products
            .get(product)
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Look up a package by its package name.
    pub fn by_name(&self, package_name: &str) -> Result<PackageRef> {
        self.packages
            .get(package_name)
            .cloned()
            .ok_or_else(|| ResolverError::UnknownPackage {
                name: package_name.to_string(),
            })
    }

    pub fn num_products(&self) -> usize {
        self.products.len()
    }

    pub fn num_packages(&self) -> usize {
        self.packages.len()
    }

    pub(crate) fn product_names(&self) -> impl Iterator<Item = &str> {
        self.products.keys().map(String::as_str)
    }
}

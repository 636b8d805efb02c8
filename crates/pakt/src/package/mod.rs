use std::fmt;
use std::sync::Arc;

pub mod product_map;
pub mod relation;

pub use product_map::ProductMap;

/// Capability interface for anything that can act as a package.
///
/// Packages are variants of the same product with a different version.
/// A product has one or more packages. Implementations must be cheap to
/// query; the resolver keys all internal storage by `package_name`.
pub trait Packager: fmt::Debug + Send + Sync {
    /// The unversioned name of the product.
    fn product_name(&self) -> &str;

    /// The version identifier.
    fn version(&self) -> &str;

    /// The `"<product>-<version>"` name of the package.
    fn package_name(&self) -> String {
        format!("{}-{}", self.product_name(), self.version())
    }
}

/// A package shared read-only between the caller and the resolver.
pub type PackageRef = Arc<dyn Packager>;

/// A specific version of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Package {
    product: String,
    version: String,
    package_name: String,
}

impl Package {
    pub fn new(product: impl Into<String>, version: impl Into<String>) -> Self {
        let product = product.into();
        let version = version.into();
        let package_name = format!("{}-{}", product, version);
        Self {
            product,
            version,
            package_name,
        }
    }

    /// Wrap the package for sharing with a resolver.
    pub fn into_ref(self) -> PackageRef {
        Arc::new(self)
    }
}

impl Packager for Package {
    fn product_name(&self) -> &str {
        &self.product
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn package_name(&self) -> String {
        self.package_name.clone()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package_name)
    }
}

/// A package and all of its direct dependencies.
///
/// Each requirement group lists the expanded, allowable versions of one
/// depended-on product; selecting the target requires selecting at
/// least one member of every group.
#[derive(Debug, Clone)]
pub struct Dependency {
    pub target: PackageRef,
    pub requires: Vec<Vec<PackageRef>>,
}

impl Dependency {
    pub fn new(target: PackageRef) -> Self {
        Self {
            target,
            requires: Vec::new(),
        }
    }

    /// Append one group of allowable versions of a depended-on product.
    pub fn add_version_set(&mut self, versions: Vec<PackageRef>) {
        self.requires.push(versions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name() {
        let pack = Package::new("A", "1.0.0");
        assert_eq!(pack.product_name(), "A");
        assert_eq!(pack.version(), "1.0.0");
        assert_eq!(pack.package_name(), "A-1.0.0");
        assert_eq!(pack.to_string(), "A-1.0.0");
    }

    #[test]
    fn test_packager_default_name() {
        #[derive(Debug)]
        struct Custom;

        impl Packager for Custom {
            fn product_name(&self) -> &str {
                "tool"
            }
            fn version(&self) -> &str {
                "2.1"
            }
        }

        assert_eq!(Custom.package_name(), "tool-2.1");
    }

    #[test]
    fn test_dependency_version_sets() {
        let mut dep = Dependency::new(Package::new("A", "1.0.0").into_ref());
        assert!(dep.requires.is_empty());

        dep.add_version_set(vec![Package::new("B", "1.0.0").into_ref()]);
        dep.add_version_set(vec![
            Package::new("C", "1.0.0").into_ref(),
            Package::new("C", "2.0.0").into_ref(),
        ]);
        assert_eq!(dep.requires.len(), 2);
        assert_eq!(dep.requires[1].len(), 2);
    }
}

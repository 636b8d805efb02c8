use pakt::{Dependency, Package, PackageRef, Packager};
use serde::{Deserialize, Serialize};

/// One package reference in the index or requirements files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageEntry {
    pub product: String,
    pub version: String,
}

impl PackageEntry {
    pub fn into_package(self) -> PackageRef {
        Package::new(self.product, self.version).into_ref()
    }

    pub fn from_package(pack: &PackageRef) -> Self {
        Self {
            product: pack.product_name().to_string(),
            version: pack.version().to_string(),
        }
    }
}

/// One package and its expanded dependency groups.
#[derive(Debug, Deserialize)]
pub struct DependencyEntry {
    pub package: PackageEntry,
    #[serde(default)]
    pub requires: Vec<Vec<PackageEntry>>,
}

/// The index file: all available packages and their requirements.
#[derive(Debug, Deserialize)]
pub struct IndexFile {
    #[serde(default)]
    pub depends: Vec<DependencyEntry>,
}

impl IndexFile {
    pub fn into_dependencies(self) -> Vec<Dependency> {
        self.depends
            .into_iter()
            .map(|entry| Dependency {
                target: entry.package.into_package(),
                requires: entry
                    .requires
                    .into_iter()
                    .map(|group| group.into_iter().map(PackageEntry::into_package).collect())
                    .collect(),
            })
            .collect()
    }
}

/// The requirements file: the packages a solution must contain.
#[derive(Debug, Deserialize)]
pub struct RequirementsFile {
    #[serde(default)]
    pub requires: Vec<PackageEntry>,
}

impl RequirementsFile {
    pub fn into_packages(self) -> Vec<PackageRef> {
        self.requires
            .into_iter()
            .map(PackageEntry::into_package)
            .collect()
    }
}

/// The result document printed on stdout.
#[derive(Debug, Serialize)]
pub struct ResultsFile {
    pub results: Option<Vec<PackageEntry>>,
    pub solved: bool,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index() {
        let raw = r#"{
            "depends": [
                {
                    "package": {"product": "A", "version": "1.0.0"},
                    "requires": [
                        [
                            {"product": "B", "version": "1.0.0"},
                            {"product": "B", "version": "2.0.0"}
                        ]
                    ]
                },
                {"package": {"product": "Z", "version": "1.0.0"}}
            ]
        }"#;
        let index: IndexFile = serde_json::from_str(raw).unwrap();
        let deps = index.into_dependencies();

        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].target.package_name(), "A-1.0.0");
        assert_eq!(deps[0].requires[0].len(), 2);
        assert!(deps[1].requires.is_empty());
    }

    #[test]
    fn test_parse_requirements() {
        let raw = r#"{"requires": [{"product": "A", "version": "1.0.0"}]}"#;
        let reqs: RequirementsFile = serde_json::from_str(raw).unwrap();
        let packages = reqs.into_packages();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].package_name(), "A-1.0.0");
    }

    #[test]
    fn test_results_serialization() {
        let results = ResultsFile {
            results: None,
            solved: false,
            error: "boom".to_string(),
        };
        let raw = serde_json::to_string(&results).unwrap();
        assert_eq!(raw, r#"{"results":null,"solved":false,"error":"boom"}"#);
    }
}

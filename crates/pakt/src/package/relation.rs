use std::fmt;

use super::PackageRef;

/// How a package (or pair of packages) contributed to a failed resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The package is a mandatory assumption.
    Required,
    /// The package is forbidden.
    Restricted,
    /// The first package requires one of the remaining packages.
    Depends,
    /// The first package excludes the remaining packages.
    Conflicts,
}

/// A relationship of one package to the overall requirements, or of
/// two or more packages to each other.
///
/// `Required`/`Restricted` carry exactly one package; `Depends` and
/// `Conflicts` carry at least two, with the subject first.
#[derive(Debug, Clone)]
pub struct PackageRelation {
    packages: Vec<PackageRef>,
    relation: Relation,
}

impl PackageRelation {
    pub fn new(packages: Vec<PackageRef>, relation: Relation) -> Self {
        debug_assert!(!packages.is_empty());
        Self { packages, relation }
    }

    pub fn packages(&self) -> &[PackageRef] {
        &self.packages
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    fn joined_names(&self) -> String {
        let names: Vec<String> = self.packages[1..]
            .iter()
            .map(|p| p.package_name())
            .collect();
        names.join(", ")
    }
}

impl fmt::Display for PackageRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = self.packages[0].package_name();
        match self.relation {
            Relation::Required => write!(f, "Package {} is required", subject),
            Relation::Restricted => write!(f, "Package {} is not allowed", subject),
            Relation::Depends => {
                write!(f, "Package {} depends on one of ({})", subject, self.joined_names())
            }
            Relation::Conflicts => {
                write!(f, "Package {} conflicts with ({})", subject, self.joined_names())
            }
        }
    }
}

/// An ordered list of package relations, rendered one per line.
#[derive(Debug, Clone, Default)]
pub struct PackageRelations(Vec<PackageRelation>);

impl PackageRelations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageRelation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PackageRelation] {
        &self.0
    }
}

impl From<Vec<PackageRelation>> for PackageRelations {
    fn from(relations: Vec<PackageRelation>) -> Self {
        Self(relations)
    }
}

impl<'a> IntoIterator for &'a PackageRelations {
    type Item = &'a PackageRelation;
    type IntoIter = std::slice::Iter<'a, PackageRelation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PackageRelations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(|rel| rel.to_string()).collect();
        f.write_str(&lines.join("\n"))
    }
}

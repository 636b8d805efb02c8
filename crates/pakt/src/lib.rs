//! pakt resolves a consistent set of package versions from an index of
//! available packages and a list of requirements, by encoding the index
//! as a CNF formula and driving an incremental SAT solver.
//!
//! A *product* is the versionless identity of a component; a *package*
//! is one concrete version of a product, named `"<product>-<version>"`.

pub mod error;
pub mod package;
pub mod solver;

pub use error::{ResolverError, Result};
pub use package::{Dependency, Package, PackageRef, Packager, ProductMap};
pub use package::relation::{PackageRelation, PackageRelations, Relation};
pub use solver::{Resolver, SortMode};

mod core_report;
mod driver;
mod encoder;
mod id_map;
mod resolver;


pub use resolver::Resolver;

/// Preference applied to the package index before encoding.
///
/// The preference biases the solver toward higher or lower versions of
/// each product by controlling the order in which package names are
/// interned as solver variables. Versions are compared by their
/// `"<product>-<version>"` name as a plain string, which is a known
/// limitation for version schemes where lexical and semantic order
/// disagree (`1.10.0` sorts below `1.2.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Leave the package index in its original order.
    #[default]
    None,
    /// Prefer lower versions in the solution.
    PreferLow,
    /// Prefer higher versions in the solution.
    PreferHigh,
}

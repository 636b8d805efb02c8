use std::io::BufRead;

use crate::error::{ResolverError, Result};
use crate::package::relation::{PackageRelation, PackageRelations, Relation};
use crate::package::ProductMap;

use super::id_map::NameIdMap;

/// Parse a DIMACS CNF clausal core back into typed package relations.
///
/// Comment lines (`c ...`) are skipped; the `p cnf ...` preamble sizes
/// the output from its trailing clause count; every other non-empty
/// line is one clause of whitespace-separated signed literals ending
/// in `0`.
pub(crate) fn parse_core<R: BufRead>(
    input: R,
    ids: &NameIdMap,
    products: &ProductMap,
) -> Result<PackageRelations> {
    let mut relations = Vec::new();

    for line in input.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        match line.as_bytes()[0] {
            b'c' => continue,
            b'p' => {
                let count = preamble_clause_count(&line)?;
                relations.reserve(count);
            }
            _ => relations.push(parse_clause(&line, ids, products)?),
        }
    }

    Ok(PackageRelations::from(relations))
}

/// The trailing token of the preamble is the clause count.
fn preamble_clause_count(line: &str) -> Result<usize> {
    line.split_whitespace()
        .last()
        .and_then(|field| field.parse::<i32>().ok())
        .filter(|&count| count >= 0)
        .map(|count| count as usize)
        .ok_or_else(|| ResolverError::CoreParse {
            line: line.to_string(),
        })
}

fn parse_clause(line: &str, ids: &NameIdMap, products: &ProductMap) -> Result<PackageRelation> {
    let mut lits = Vec::new();
    for field in line.split_whitespace() {
        let value: i32 = field.parse().map_err(|_| ResolverError::CoreParse {
            line: line.to_string(),
        })?;
        // Strip the 0 sentinels; classification counts real literals.
        if value != 0 {
            lits.push(value);
        }
    }
    if lits.is_empty() {
        return Err(ResolverError::EmptyClause {
            line: line.to_string(),
        });
    }

    // Ascending order groups the negated literals (the antecedents)
    // in front of the positive ones.
    lits.sort_unstable();
    let negatives = lits.iter().filter(|&&l| l < 0).count();

    let mut packages = Vec::with_capacity(lits.len());
    for &lit in &lits {
        let pack = products.by_name(ids.name(lit)).map_err(|_| {
            ResolverError::UnknownLiteral {
                literal: lit,
                line: line.to_string(),
            }
        })?;
        packages.push(pack);
    }

    let relation = if lits.len() == 1 {
        if lits[0] > 0 {
            Relation::Required
        } else {
            Relation::Restricted
        }
    } else if negatives == 1 {
        Relation::Depends
    } else if negatives > 1 {
        Relation::Conflicts
    } else {
        return Err(ResolverError::UnhandledClause {
            line: line.to_string(),
        });
    };

    Ok(PackageRelation::new(packages, relation))
}

mod schema;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use pakt::{Packager, Resolver};
use serde::de::DeserializeOwned;

use schema::{IndexFile, PackageEntry, RequirementsFile, ResultsFile};

/// Resolve a package selection from a JSON package index and a JSON
/// requirements file.
///
/// The index lists all available packages with their versions and
/// requirements; the requirements file lists the package constraints
/// to resolve. The outcome is printed as JSON on stdout: either the
/// package solution, or an error message explaining the failure.
#[derive(Debug, Parser)]
#[command(name = "pakt", version)]
struct Args {
    /// Path to the index/repo JSON file
    #[arg(long, value_name = "FILE")]
    index: PathBuf,

    /// Path to the requirements JSON file
    #[arg(long, value_name = "FILE")]
    reqs: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let index: IndexFile = read_json(&args.index)
        .with_context(|| format!("failed to load index file {}", args.index.display()))?;
    let reqs: RequirementsFile = read_json(&args.reqs)
        .with_context(|| format!("failed to load requirements file {}", args.reqs.display()))?;

    let mut resolver = Resolver::new(reqs.into_packages(), index.into_dependencies());
    let results = run(&mut resolver);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    serde_json::to_writer(&mut out, &results).context("failed to encode the results")?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

/// Any resolve outcome, including unsatisfiable requirements, is a
/// regular result; only I/O and parse failures exit nonzero.
fn run(resolver: &mut Resolver) -> ResultsFile {
    match resolver.resolve() {
        Ok(true) => ResultsFile {
            results: Some(
                resolver
                    .solution()
                    .iter()
                    .map(PackageEntry::from_package)
                    .collect(),
            ),
            solved: true,
            error: String::new(),
        },
        Ok(false) => ResultsFile {
            results: None,
            solved: false,
            error: conflict_report(resolver),
        },
        Err(err) => ResultsFile {
            results: None,
            solved: false,
            error: err.to_string(),
        },
    }
}

fn conflict_report(resolver: &mut Resolver) -> String {
    let mut report = String::from("The following requirements cannot be satisfied:\n");
    for pack in resolver.conflicts() {
        report.push_str(&format!("    {}\n", pack.package_name()));
    }

    report.push_str("\nDetails:\n");
    match resolver.detailed_conflicts() {
        Ok(relations) => {
            report.push_str(&relations.to_string());
            report.push('\n');
        }
        Err(err) => {
            report.push_str(&format!("(no details available: {})\n", err));
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pakt::{Dependency, Package, PackageRef};

    fn pack(product: &str, version: &str) -> PackageRef {
        Package::new(product, version).into_ref()
    }

    fn clash_resolver() -> Resolver {
        let index = vec![
            Dependency {
                target: pack("A", "1.0.0"),
                requires: vec![vec![pack("C", "1.0.0")]],
            },
            Dependency {
                target: pack("B", "1.0.0"),
                requires: vec![vec![pack("C", "2.0.0")]],
            },
        ];
        Resolver::new(vec![pack("A", "1.0.0"), pack("B", "1.0.0")], index)
    }

    #[test]
    fn test_solved_results() {
        let index = vec![Dependency {
            target: pack("A", "1.0.0"),
            requires: vec![vec![pack("B", "1.0.0")]],
        }];
        let mut resolver = Resolver::new(vec![pack("A", "1.0.0")], index);

        let results = run(&mut resolver);
        assert!(results.solved);
        assert!(results.error.is_empty());
        assert_eq!(results.results.unwrap().len(), 2);
    }

    #[test]
    fn test_conflict_report_format() {
        let mut resolver = clash_resolver();
        let results = run(&mut resolver);

        assert!(!results.solved);
        assert!(results.results.is_none());
        assert_eq!(
            results.error,
            "The following requirements cannot be satisfied:\n\
             \x20   A-1.0.0\n\
             \x20   B-1.0.0\n\
             \n\
             Details:\n\
             Package A-1.0.0 depends on one of (C-1.0.0)\n\
             Package B-1.0.0 depends on one of (C-2.0.0)\n\
             Package C-2.0.0 conflicts with (C-1.0.0)\n"
        );
    }
}

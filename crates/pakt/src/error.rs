use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolverError {
    // Lookup errors
    #[error("package {name:?} does not exist")]
    UnknownPackage { name: String },

    // Clausal core errors
    #[error("literal {literal} in line {line:?} could not be mapped back to a package")]
    UnknownLiteral { literal: i32, line: String },

    #[error("failed to parse literals from line {line:?}")]
    CoreParse { line: String },

    #[error("expected to parse literals, but got none in line {line:?}")]
    EmptyClause { line: String },

    #[error("unhandled clause type for line {line:?}")]
    UnhandledClause { line: String },

    #[error("failed to generate detailed conflict report: {0}")]
    CoreDump(#[from] std::io::Error),

    // SAT engine errors
    #[error("SAT engine error: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, ResolverError>;

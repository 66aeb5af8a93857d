//! Error types for nametab.
//!
//! Two families matter to callers: [`FormatError`] for rows that cannot be
//! parsed, and [`ConfigError`] for resource files that name an entity type,
//! trust policy or rule operation we do not know. Both are fatal for the
//! stream they come from.

use thiserror::Error;

/// Result type for nametab operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A row that does not match its declared format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer columns than the format requires.
    #[error("line {line}: expected at least {expected} columns, found {found}: {content:?}")]
    MissingColumns {
        line: usize,
        expected: usize,
        found: usize,
        content: String,
    },

    /// Offset is not of the form `doc:begin-end`.
    #[error("line {line}: malformed offset {offset:?}")]
    BadOffset { line: usize, offset: String },

    /// A numeric field did not parse.
    #[error("line {line}: bad {field} value {value:?}")]
    BadNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Span end lies before span begin.
    #[error("line {line}: span end {end} precedes begin {begin}")]
    InvertedSpan { line: usize, begin: usize, end: usize },
}

/// A resource file that would let unvalidated values into the table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("line {line}: unknown entity type {value:?}")]
    UnknownEntityType { line: usize, value: String },

    #[error("line {line}: unknown trust policy {value:?} (expected p or p2)")]
    UnknownTrustPolicy { line: usize, value: String },

    #[error("line {line}: unknown rule operation {value:?} (expected mv, rm or in_rm)")]
    UnknownRuleOp { line: usize, value: String },

    #[error("line {line}: mv rule for {surface:?} has no target type")]
    MissingRetypeTarget { line: usize, surface: String },

    #[error("line {line}: unknown mention type {value:?}")]
    UnknownMentionType { line: usize, value: String },
}

/// Error type for nametab operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed input row.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Bad gazetteer, rule or table vocabulary.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A configured noise pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex_automata::meta::BuildError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that stem from resource validation rather than IO.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

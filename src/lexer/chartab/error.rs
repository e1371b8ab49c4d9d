// src/lexer/chartab/error.rs
use thiserror::Error;

/// Everything that can go wrong while building, emitting or packing a char table.
///
/// All of these are configuration errors: the generator aborts and nothing is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("unknown tag `{0}`")]
    UnknownTag(String),

    #[error("tag `{0}` is declared more than once")]
    DuplicateTag(String),

    #[error("{0} tag declarations exceed the id space")]
    TooManyTags(usize),

    #[error("composite tag `{0}` has no constituents")]
    EmptyComposite(String),

    /// `path` lists the composites on the cycle, ending with the one that closes it.
    #[error("composite tag `{name}` references itself via {}", .path.join(" -> "))]
    CyclicComposite { name: String, path: Vec<String> },

    #[error("byte value {0} is outside 0..=255")]
    OutOfRange(u32),

    #[error("inverted range {low}..={high}")]
    InvalidRange { low: u8, high: u8 },

    #[error("tag symbol `{0}` has no flag encoding")]
    UnencodedTag(String),

    #[error("byte {byte} carries two class tags: `{first}` and `{second}`")]
    ClassConflict {
        byte: u8,
        first: String,
        second: String,
    },

    #[error("invalid flag encoding for `{symbol}`: {reason}")]
    InvalidEncoding { symbol: String, reason: String },

    #[error("rule #{index} ({rule}) failed: {source}")]
    Rule {
        index: usize,
        rule: String,
        #[source]
        source: Box<TableError>,
    },
}

impl TableError {
    /// The innermost error, looking through `Rule` wrappers.
    pub fn root(&self) -> &TableError {
        match self {
            TableError::Rule { source, .. } => source.root(),
            other => other,
        }
    }
}

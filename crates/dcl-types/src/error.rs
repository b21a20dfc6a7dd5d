use thiserror::Error;

use crate::drift::DriftCategory;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("drift path is empty after normalization")]
    EmptyPath,

    #[error("duplicate drift path in change set: {path}")]
    DuplicatePath { path: String },

    #[error("{category:?} drift requires {slot} content hash")]
    MissingHash {
        category: DriftCategory,
        slot: &'static str,
    },

    #[error("{category:?} drift must not carry {slot} content hash")]
    UnexpectedHash {
        category: DriftCategory,
        slot: &'static str,
    },
}

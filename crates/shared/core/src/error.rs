//! Error taxonomy shared by every costscope crate

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or out-of-range call argument or feed record
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Construction-time invariant violation
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A model was asked to fit zero samples
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Samples do not determine a unique fit (e.g. zero variance in x)
    #[error("Degenerate fit: {0}")]
    DegenerateFit(String),

    /// Paired sequences of unequal length
    #[error("Mismatched lengths: {left} samples vs {right} labels")]
    MismatchedLengths { left: usize, right: usize },
}

impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

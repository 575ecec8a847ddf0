//! Error types for forecast index resolution.

use fmrc_types::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FmrcError>;

#[derive(Debug, Error)]
pub enum FmrcError {
    /// A label has no exact match on its axis.
    #[error("{value} not found on axis '{axis}'")]
    NotFound { axis: String, value: String },

    /// The request or the cube cannot support the requested cut.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A selection key is bound to a value of the wrong kind.
    #[error("unsupported selector for '{key}': expected {expected}, got {found}")]
    UnsupportedSelectorType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl FmrcError {
    pub(crate) fn not_found(axis: &str, value: impl std::fmt::Display) -> Self {
        FmrcError::NotFound {
            axis: axis.to_string(),
            value: value.to_string(),
        }
    }
}

//! Error types for tone-mapping operations.

use thiserror::Error;

/// Error type for tone-mapping operations.
///
/// Only configuration and shape problems are errors. Numeric degeneracies
/// (zero luminance, flat images) flow through as data.
#[derive(Error, Debug)]
pub enum OpsError {
    /// An operator with this identifier is already registered.
    #[error("duplicate operator id: {0}")]
    DuplicateOperator(String),

    /// No operator is registered under this identifier.
    #[error("operator not found: {0}")]
    OperatorNotFound(String),

    /// Buffers that must share dimensions don't. Wraps
    /// [`tmo_core::Error::DimensionMismatch`], compressed plane first.
    #[error("size mismatch: {0}")]
    SizeMismatch(#[source] tmo_core::Error),

    /// Configuration could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error from the core buffer types.
    #[error(transparent)]
    Core(#[from] tmo_core::Error),
}

impl OpsError {
    /// Returns `true` for registry errors (duplicate or unknown operator).
    #[inline]
    pub fn is_registry_error(&self) -> bool {
        matches!(self, Self::DuplicateOperator(_) | Self::OperatorNotFound(_))
    }
}

impl From<serde_yaml::Error> for OpsError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for tone-mapping operations.
pub type OpsResult<T> = Result<T, OpsError>;

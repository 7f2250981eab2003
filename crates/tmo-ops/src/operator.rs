//! The tone-mapping operator interface.
//!
//! An operator compresses a luminance [`Plane`] into a new plane of the same
//! size, driven by the region [`Statistics`] and a [`Configuration`]. It
//! never touches chroma; the reconstruction stage does that afterwards.
//!
//! Implementations must be deterministic (same inputs, bit-identical output)
//! and must not panic on finite input. Non-finite input may produce
//! non-finite output.

use tmo_core::Plane;

use crate::config::Configuration;
use crate::stats::Statistics;

/// Identifier and human label of an operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperatorDescriptor {
    /// Stable registry key, e.g. `"ashikhminO2"`.
    pub id: String,
    /// Label shown to users, e.g. `"Ashikhmin 02"`.
    pub label: String,
}

impl OperatorDescriptor {
    /// Creates a descriptor.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl std::fmt::Display for OperatorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.label)
    }
}

/// A luminance compression algorithm.
pub trait ToneMapOperator: Send + Sync {
    /// Identifier and label.
    fn descriptor(&self) -> &OperatorDescriptor;

    /// Registry key.
    fn identifier(&self) -> &str {
        &self.descriptor().id
    }

    /// Human label.
    fn label(&self) -> &str {
        &self.descriptor().label
    }

    /// Every parameter this operator reads, at its default value.
    fn default_configuration(&self) -> Configuration;

    /// Compresses `luminance` into a freshly allocated plane of the same
    /// dimensions. `luminance` is not modified.
    fn compress(&self, luminance: &Plane, stats: &Statistics, config: &Configuration) -> Plane;
}

impl std::fmt::Debug for dyn ToneMapOperator + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneMapOperator")
            .field("id", &self.identifier())
            .field("label", &self.label())
            .finish()
    }
}

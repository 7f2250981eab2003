//! Operator registry.
//!
//! Maps identifiers to [`ToneMapOperator`] instances. The registry is a plain
//! value owned by the host: build it once (usually with
//! [`OperatorRegistry::with_builtin`]), then share it by reference.
//!
//! # Example
//!
//! ```rust
//! use tmo_ops::registry::OperatorRegistry;
//!
//! let registry = OperatorRegistry::with_builtin();
//! let op = registry.lookup("ashikhminO2").unwrap();
//! assert_eq!(op.label(), "Ashikhmin 02");
//!
//! for desc in registry.descriptors() {
//!     println!("{}", desc);
//! }
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::ashikhmin02::Ashikhmin02;
use crate::operator::{OperatorDescriptor, ToneMapOperator};
use crate::{OpsError, OpsResult};

/// Collection of tone-mapping operators keyed by identifier.
///
/// Enumeration follows registration order.
#[derive(Debug, Default)]
pub struct OperatorRegistry {
    operators: Vec<Box<dyn ToneMapOperator>>,
    by_id: HashMap<String, usize>,
}

impl OperatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in operator.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_builtin();
        registry
    }

    fn register_builtin(&mut self) {
        // empty registry, ids can't collide
        let op: Box<dyn ToneMapOperator> = Box::new(Ashikhmin02::new());
        let id = op.identifier().to_string();
        self.by_id.insert(id, self.operators.len());
        self.operators.push(op);
    }

    /// Adds an operator.
    ///
    /// # Errors
    ///
    /// [`OpsError::DuplicateOperator`] if the identifier is taken; the
    /// registry is left unchanged.
    pub fn register(&mut self, op: Box<dyn ToneMapOperator>) -> OpsResult<()> {
        let id = op.identifier().to_string();
        if self.by_id.contains_key(&id) {
            return Err(OpsError::DuplicateOperator(id));
        }
        debug!(id = %id, label = op.label(), "registry::register");
        self.by_id.insert(id, self.operators.len());
        self.operators.push(op);
        Ok(())
    }

    /// Adds the operator built by `factory`.
    pub fn register_factory<F>(&mut self, factory: F) -> OpsResult<()>
    where
        F: FnOnce() -> Box<dyn ToneMapOperator>,
    {
        self.register(factory())
    }

    /// Operator registered under `id`.
    ///
    /// # Errors
    ///
    /// [`OpsError::OperatorNotFound`] for unknown identifiers.
    pub fn lookup(&self, id: &str) -> OpsResult<&dyn ToneMapOperator> {
        self.by_id
            .get(id)
            .map(|&index| self.operators[index].as_ref())
            .ok_or_else(|| OpsError::OperatorNotFound(id.to_string()))
    }

    /// Returns `true` if `id` is registered.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Operators in registration order.
    pub fn operators(&self) -> impl Iterator<Item = &dyn ToneMapOperator> {
        self.operators.iter().map(|op| op.as_ref())
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &OperatorDescriptor> {
        self.operators.iter().map(|op| op.descriptor())
    }

    /// Identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.operators.iter().map(|op| op.identifier())
    }

    /// Number of registered operators.
    #[inline]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::stats::Statistics;
    use tmo_core::Plane;

    struct Identity {
        descriptor: OperatorDescriptor,
    }

    impl Identity {
        fn boxed(id: &str) -> Box<dyn ToneMapOperator> {
            Box::new(Self {
                descriptor: OperatorDescriptor::new(id, "Identity"),
            })
        }
    }

    impl ToneMapOperator for Identity {
        fn descriptor(&self) -> &OperatorDescriptor {
            &self.descriptor
        }

        fn default_configuration(&self) -> Configuration {
            Configuration::new()
        }

        fn compress(&self, luminance: &Plane, _: &Statistics, _: &Configuration) -> Plane {
            luminance.clone()
        }
    }

    #[test]
    fn empty_registry() {
        let registry = OperatorRegistry::new();
        assert!(registry.is_empty());
        let err = registry.lookup("ashikhminO2").unwrap_err();
        assert!(matches!(err, OpsError::OperatorNotFound(ref id) if id == "ashikhminO2"));
    }

    #[test]
    fn builtin_contains_ashikhmin() {
        let registry = OperatorRegistry::with_builtin();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("ashikhminO2"));
        assert_eq!(registry.lookup("ashikhminO2").unwrap().label(), "Ashikhmin 02");
    }

    #[test]
    fn duplicate_rejected() {
        let mut registry = OperatorRegistry::with_builtin();
        let err = registry.register(Identity::boxed("ashikhminO2")).unwrap_err();
        assert!(matches!(err, OpsError::DuplicateOperator(_)));
        assert!(err.is_registry_error());
        // original entry survives
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("ashikhminO2").unwrap().label(), "Ashikhmin 02");
    }

    #[test]
    fn registration_order() {
        let mut registry = OperatorRegistry::with_builtin();
        registry.register(Identity::boxed("zz")).unwrap();
        registry.register_factory(|| Identity::boxed("aa")).unwrap();
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["ashikhminO2", "zz", "aa"]);
        let labels: Vec<&str> = registry.descriptors().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Ashikhmin 02", "Identity", "Identity"]);
    }

    #[test]
    fn operators_match_ids() {
        let mut registry = OperatorRegistry::with_builtin();
        registry.register(Identity::boxed("zz")).unwrap();
        let ops: Vec<&dyn ToneMapOperator> = registry.operators().collect();
        assert_eq!(ops.len(), registry.len());
        for (op, id) in ops.iter().zip(registry.ids()) {
            assert_eq!(op.identifier(), id);
            assert_eq!(op.label(), registry.lookup(id).unwrap().label());
        }
        assert!(!ops[0].default_configuration().is_empty());
        assert!(ops[1].default_configuration().is_empty());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = OperatorRegistry::with_builtin();
        assert!(registry.lookup("AshikhminO2").is_err());
    }
}

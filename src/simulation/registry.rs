//! Experiment registry
//!
//! Maps each [`ExperimentKind`] to the factory that builds its module. The
//! standard registry holding every kind is built once and is read-only
//! afterwards; there is no plugin loading.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{LabError, Result};
use crate::experiments;

use super::{
    kind::ExperimentKind, params::ExperimentParams, session::Session,
    settings::SessionSettings, traits::Experiment,
};

/// Builds a kind's module (its setup/update pair) from validated parameters
pub type ExperimentFactory = fn(&ExperimentParams) -> Result<Box<dyn Experiment>>;

/// Lookup table from kind to factory
#[derive(Default)]
pub struct Registry {
    factories: HashMap<ExperimentKind, ExperimentFactory>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in experiment kind
    pub fn standard() -> Self {
        let mut registry = Self::new();
        experiments::register_all(&mut registry);
        registry
    }

    /// Register (or replace) the factory for `kind`
    pub fn register(&mut self, kind: ExperimentKind, factory: ExperimentFactory) {
        log::debug!("registering experiment `{}`", kind);
        self.factories.insert(kind, factory);
    }

    pub fn is_registered(&self, kind: ExperimentKind) -> bool {
        self.factories.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ExperimentKind> + '_ {
        self.factories.keys().copied()
    }

    /// Create a session in the `Created` state
    ///
    /// Fails with `UnknownKind` before anything is built when the kind has no
    /// factory, and with `InvalidParameter` when an override is out of range.
    pub fn instantiate(&self, kind: ExperimentKind, params: &ExperimentParams) -> Result<Session> {
        self.instantiate_with(kind, params, SessionSettings::default())
    }

    pub fn instantiate_with(
        &self,
        kind: ExperimentKind,
        params: &ExperimentParams,
        settings: SessionSettings,
    ) -> Result<Session> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| LabError::UnknownKind(kind.to_string()))?;
        settings.validate()?;
        let experiment = factory(params)?;
        Ok(Session::new(experiment, settings))
    }

    /// Instantiate and run setup, leaving the session `Running`
    pub fn launch(&self, kind: ExperimentKind, params: &ExperimentParams) -> Result<Session> {
        let mut session = self.instantiate(kind, params)?;
        session.setup()?;
        Ok(session)
    }
}

/// Process-wide standard registry, built on first use
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::standard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_covers_every_kind() {
        let registry = registry();
        for kind in ExperimentKind::ALL {
            assert!(registry.is_registered(*kind), "missing {}", kind);
        }
    }

    #[test]
    fn test_unregistered_kind_fails() {
        let registry = Registry::new();
        let result = registry.instantiate(ExperimentKind::Pendulum, &ExperimentParams::new());
        assert_eq!(
            result.err(),
            Some(LabError::UnknownKind("pendulum".to_string()))
        );
    }

    #[test]
    fn test_partial_registry() {
        let mut registry = Registry::new();
        registry.register(ExperimentKind::Pendulum, experiments::pendulum::build);
        assert!(registry
            .instantiate(ExperimentKind::Pendulum, &ExperimentParams::new())
            .is_ok());
        assert!(matches!(
            registry.instantiate(ExperimentKind::FreeFall, &ExperimentParams::new()),
            Err(LabError::UnknownKind(_))
        ));
        assert_eq!(registry.kinds().count(), 1);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let params = ExperimentParams::new().with("length", -1.0);
        assert!(matches!(
            registry().instantiate(ExperimentKind::Pendulum, &params),
            Err(LabError::InvalidParameter { .. })
        ));
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::motion::block_match::BlockMatchEstimator;
use crate::image_pipeline::motion::estimator::MotionEstimator;
use crate::image_pipeline::motion::identity::IdentityEstimator;

/// Name-to-engine lookup for motion estimators
#[derive(Clone, Default)]
pub struct MotionEstimatorRegistry {
    engines: HashMap<String, Arc<dyn MotionEstimator>>,
}

impl MotionEstimatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in `identity` and `block_match` engines.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(IdentityEstimator));
        registry.register(Arc::new(BlockMatchEstimator::default()));
        registry
    }

    /// Adds an engine under its own name, replacing any previous one.
    pub fn register(&mut self, engine: Arc<dyn MotionEstimator>) {
        self.engines.insert(engine.name().to_string(), engine);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn MotionEstimator>> {
        self.engines.get(name).cloned().ok_or_else(|| {
            FusionError::Configuration(format!("unknown motion estimation engine: {}", name))
        })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.engines.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_contain_builtin_engines() {
        let registry = MotionEstimatorRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["block_match", "identity"]);
        assert_eq!(registry.get("identity").unwrap().name(), "identity");
    }

    #[test]
    fn unknown_engine_is_configuration_error() {
        let registry = MotionEstimatorRegistry::with_defaults();
        assert!(matches!(
            registry.get("pixflow_search_20"),
            Err(FusionError::Configuration(_))
        ));
    }
}

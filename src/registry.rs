//! Registry of named endpoint barriers.
//!
//! One barrier per remote operation name, shared by every caller of that operation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::barrier::{EndpointBarrier, EndpointBarrierBuilder};
use crate::config::{ConfigError, RegistryConfig};
use tracing::{debug, warn};

/// Errors from barrier registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No barrier is registered under this name.
    NotFound {
        /// Name that could not be located.
        name: String,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NotFound { name } => write!(f, "no barrier registered for '{name}'"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Name-to-barrier lookup.
pub trait BarrierRegistry: Send + Sync + std::fmt::Debug {
    /// Register a barrier under its own name, replacing any existing one.
    ///
    /// Callers that already hold the replaced barrier keep using its slot; new lookups get the
    /// replacement.
    fn register(&self, barrier: EndpointBarrier);
    /// Get a barrier by name.
    fn get(&self, name: &str) -> Option<EndpointBarrier>;
    /// Get a barrier by name, creating and registering it on first use.
    fn get_or_create(&self, name: &str) -> EndpointBarrier;
    /// Get a barrier by name, erroring if missing.
    fn require(&self, name: &str) -> Result<EndpointBarrier, RegistryError> {
        self.get(name).ok_or_else(|| RegistryError::NotFound { name: name.to_string() })
    }
    /// Registered names, sorted.
    fn names(&self) -> Vec<String>;
}

/// In-memory implementation backed by an RwLock.
///
/// Barriers created by [`get_or_create`](BarrierRegistry::get_or_create) come from the
/// registry's builder template.
#[derive(Clone, Debug)]
pub struct InMemoryBarrierRegistry {
    inner: Arc<RwLock<HashMap<String, EndpointBarrier>>>,
    template: EndpointBarrierBuilder,
}

impl Default for InMemoryBarrierRegistry {
    fn default() -> Self {
        Self::with_template(EndpointBarrierBuilder::default())
    }
}

impl InMemoryBarrierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose on-demand barriers are built from `template`.
    pub fn with_template(template: EndpointBarrierBuilder) -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())), template }
    }

    /// Registry pre-populated with the configured endpoints.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_template(config, EndpointBarrierBuilder::default())
    }

    /// Like [`from_config`](Self::from_config), keeping `template`'s clock and sleeper but
    /// taking the delay policy from `config`.
    pub fn from_config_with_template(
        config: &RegistryConfig,
        template: EndpointBarrierBuilder,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = Self::with_template(template.reset_delay(config.reset_delay));
        for name in &config.endpoints {
            registry.register(registry.template.build(name.as_str()));
        }
        Ok(registry)
    }
}

impl BarrierRegistry for InMemoryBarrierRegistry {
    fn register(&self, barrier: EndpointBarrier) {
        let mut map = self.inner.write().expect("barrier registry poisoned");
        let name = barrier.name().to_string();
        if map.contains_key(&name) {
            warn!(target: "quotagate::registry", endpoint = %name, "barrier replaced; last registration wins");
        }
        map.insert(name, barrier);
    }

    fn get(&self, name: &str) -> Option<EndpointBarrier> {
        let guard = self.inner.read().expect("barrier registry poisoned");
        guard.get(name).cloned()
    }

    fn get_or_create(&self, name: &str) -> EndpointBarrier {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        let mut map = self.inner.write().expect("barrier registry poisoned");
        // Another caller may have created it between the read and the write lock.
        map.entry(name.to_string())
            .or_insert_with(|| {
                debug!(target: "quotagate::registry", endpoint = %name, "barrier created");
                self.template.build(name)
            })
            .clone()
    }

    fn names(&self) -> Vec<String> {
        let map = self.inner.read().expect("barrier registry poisoned");
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        names
    }
}

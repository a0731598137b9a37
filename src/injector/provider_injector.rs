//! # Provider Injector
//!
//! Reference [`Injector`] backed by a flat map of named providers.
//!
//! Argument precedence per parameter, highest first:
//!
//! 1. Caller-supplied override from the shared context
//! 2. A registered provider (static value or context-aware factory)
//! 3. The parameter's declared default
//!
//! A required parameter with none of the three is an injector miss. Only
//! declared parameters are computed; stray overrides are ignored, keeping
//! the argument set deterministic for a given descriptor.

use crate::component::{ComponentArgs, ComponentDescriptor};
use crate::context::SharedContext;
use crate::error::{ResolverError, Result};
use crate::injector::Injector;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Context-aware provider factory.
pub type ProviderFn = Arc<dyn Fn(&SharedContext) -> Value + Send + Sync>;

enum Provider {
    /// Fixed value handed out on every construction
    Value(Value),
    /// Factory consulted with the shared context per construction
    Factory(ProviderFn),
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Value(v) => write!(f, "Value({v})"),
            Provider::Factory(_) => write!(f, "Factory(<fn>)"),
        }
    }
}

/// Flat-map injector for tests and container-less embedders.
#[derive(Debug, Default)]
pub struct ProviderInjector {
    providers: HashMap<String, Provider>,
}

impl ProviderInjector {
    /// Create an injector with no providers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed-value provider for a dependency name.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.providers.insert(name.into(), Provider::Value(value));
        self
    }

    /// Register a context-aware provider factory for a dependency name.
    #[must_use]
    pub fn with_factory<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&SharedContext) -> Value + Send + Sync + 'static,
    {
        self.providers
            .insert(name.into(), Provider::Factory(Arc::new(factory)));
        self
    }

    /// Whether a provider is registered for a dependency name.
    #[must_use]
    pub fn provides(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    fn provide(&self, name: &str, ctx: &SharedContext) -> Option<Value> {
        match self.providers.get(name)? {
            Provider::Value(value) => Some(value.clone()),
            Provider::Factory(factory) => Some(factory(ctx)),
        }
    }
}

#[async_trait]
impl Injector for ProviderInjector {
    async fn construct(
        &self,
        descriptor: &ComponentDescriptor,
        overrides: &HashMap<String, Value>,
        ctx: &SharedContext,
    ) -> Result<ComponentArgs> {
        let mut args = ComponentArgs::new();

        for param in descriptor.params() {
            if let Some(value) = overrides.get(&param.name) {
                trace!(component = descriptor.type_name(), param = %param.name, "Using caller override");
                args.set(&param.name, value.clone());
            } else if let Some(value) = self.provide(&param.name, ctx) {
                trace!(component = descriptor.type_name(), param = %param.name, "Using registered provider");
                args.set(&param.name, value);
            } else if let Some(default) = &param.default {
                args.set(&param.name, default.clone());
            } else if param.required {
                return Err(ResolverError::injector_not_found(
                    descriptor.type_name(),
                    &param.name,
                ));
            }
        }

        Ok(args)
    }
}

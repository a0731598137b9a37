//! # Injector Boundary
//!
//! The consumed dependency-injection capability: "compute final constructor
//! arguments for this descriptor, given overrides and the shared context".
//!
//! The container itself — service registration, factory resolution, service
//! lifetimes — is an external collaborator. The resolver calls
//! [`Injector::construct`] exactly once per resolution and never caches the
//! result across calls.
//!
//! [`ProviderInjector`] is the reference implementation: a flat map of named
//! providers, enough for tests and for embedders without a full container.

pub mod provider_injector;

use crate::component::{ComponentArgs, ComponentDescriptor};
use crate::context::SharedContext;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub use provider_injector::ProviderInjector;

/// Computes constructor arguments for a descriptor.
#[async_trait]
pub trait Injector: Send + Sync + fmt::Debug {
    /// Compute the final constructor arguments.
    ///
    /// `overrides` are the caller-supplied values from the shared context;
    /// they take precedence over anything the injector would supply itself.
    /// A required parameter the injector cannot satisfy surfaces as
    /// [`crate::error::ResolverError::InjectorNotFound`].
    async fn construct(
        &self,
        descriptor: &ComponentDescriptor,
        overrides: &HashMap<String, Value>,
        ctx: &SharedContext,
    ) -> Result<ComponentArgs>;
}

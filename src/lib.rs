#![allow(clippy::doc_markdown)] // Allow technical terms like PreResolution, PostRender in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Component Core Rust
//!
//! Component resolution engine: a name registry, a dependency-injection
//! handoff, and a priority-ordered middleware pipeline for observing and
//! influencing each resolution.
//!
//! ## Overview
//!
//! Applications register components under unique names, attach middleware
//! that hook well-defined lifecycle phases, and then resolve names into
//! constructed, dependency-injected output. The resolver is the sole
//! orchestrator: middleware never call each other and never see the
//! pipeline's internals beyond the payload of their phase.
//!
//! ## Architecture
//!
//! Each resolution walks a fixed sequence of phases:
//!
//! 1. **PreResolution** - middleware may re-route the requested name
//! 2. **Name lookup** - registry miss fails with near-miss suggestions
//! 3. **PostResolution** - middleware may substitute the descriptor
//! 4. **Argument resolution** - the injector computes constructor arguments
//! 5. **BeforeRender** - middleware may amend the arguments
//! 6. **Invocation** - the descriptor's construction strategy runs
//! 7. **PostRender** - middleware may substitute the immutable output
//!
//! Any middleware in a sequential phase may halt the resolution, which is a
//! distinct non-error outcome. Failures route through the `on_error` phase
//! (which may supply fallback output), and `cleanup` always runs exactly
//! once per resolution.
//!
//! ## Module Organization
//!
//! - [`component`] - Descriptors, construction strategies, and render output
//! - [`registry`] - Name-keyed component registry and discovery scanning
//! - [`middleware`] - Lifecycle phases and the priority-ordered chain
//! - [`injector`] - Constructor-argument resolution
//! - [`resolver`] - The pipeline orchestrator
//! - [`context`] - Shared per-resolution state visible to middleware
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use component_core::component::{ComponentDescriptor, RenderOutput};
//! use component_core::context::SharedContext;
//! use component_core::injector::ProviderInjector;
//! use component_core::registry::ComponentRegistry;
//! use component_core::resolver::ComponentResolver;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> component_core::Result<()> {
//! let registry = Arc::new(ComponentRegistry::new());
//! registry.register(
//!     "Greeting",
//!     ComponentDescriptor::class("Greeting", vec![], |_| {
//!         Ok(RenderOutput::new("Greeting", json!("hello")))
//!     }),
//! );
//!
//! let resolver = ComponentResolver::new(registry, Arc::new(ProviderInjector::new()));
//! let resolution = resolver.resolve("Greeting", &SharedContext::new()).await?;
//! assert_eq!(resolution.output().unwrap().body, json!("hello"));
//! # Ok(())
//! # }
//! ```

pub mod component;
pub mod config;
pub mod context;
pub mod error;
pub mod injector;
pub mod logging;
pub mod middleware;
pub mod registry;
pub mod resolver;

pub use component::{
    ComponentArgs, ComponentDescriptor, ComponentKind, ComponentMetadata, ParamSpec, RenderOutput,
};
pub use config::ResolverConfig;
pub use context::SharedContext;
pub use error::{DiscoveryError, ResolverError, Result};
pub use injector::{Injector, ProviderInjector};
pub use middleware::{
    ErrorAction, MiddlewareChain, PhaseAction, ResolutionMiddleware, ResolutionPhase,
};
pub use registry::{ComponentRegistry, ComponentScanner, ScanReport};
pub use resolver::{ComponentResolver, Resolution};

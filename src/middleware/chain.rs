//! # Middleware Chain
//!
//! Ordered collection of middleware executing per-phase handlers with
//! short-circuit semantics.
//!
//! ## Ordering
//!
//! Middleware run in ascending priority order; equal priorities preserve
//! registration order (the sort is stable), so execution order is
//! deterministic and reproducible for the same registration sequence.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let chain = MiddlewareChain::new()
//!     .with_middleware(Arc::new(ThemeDefaults))?
//!     .with_middleware(Arc::new(RenderMetrics))?;
//!
//! match chain.run_pre_resolution("Button".to_string(), &ctx).await? {
//!     ChainOutcome::Completed(name) => { /* continue with `name` */ }
//!     ChainOutcome::Halted { middleware } => { /* aborted by `middleware` */ }
//! }
//! ```

use crate::component::{ComponentArgs, ComponentDescriptor, RenderOutput};
use crate::context::SharedContext;
use crate::error::{ResolverError, Result};
use crate::middleware::{ErrorAction, PhaseAction, ResolutionMiddleware, ResolutionPhase};
use std::sync::Arc;
use tracing::{debug, trace};

/// Lowest accepted middleware priority.
pub const MIN_PRIORITY: i32 = -100;
/// Highest accepted middleware priority.
pub const MAX_PRIORITY: i32 = 100;

/// Outcome of running one phase across the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome<T> {
    /// Every handler ran; the final payload is the phase result.
    Completed(T),
    /// A middleware halted the chain.
    Halted {
        /// Name of the middleware that halted
        middleware: String,
    },
}

/// Priority-ordered middleware chain.
///
/// Registration happens during startup configuration; the chain is treated
/// as immutable afterwards and shared across concurrent resolutions.
#[derive(Debug, Default)]
pub struct MiddlewareChain {
    /// Middleware sorted by ascending priority, ties in registration order
    middleware: Vec<Arc<dyn ResolutionMiddleware>>,
}

impl MiddlewareChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a middleware, keeping the execution order sorted.
    ///
    /// Rejects priorities outside `[-100, 100]`.
    pub fn register(&mut self, middleware: Arc<dyn ResolutionMiddleware>) -> Result<()> {
        let priority = middleware.priority();
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
            return Err(ResolverError::InvalidMiddleware {
                name: middleware.name().to_string(),
                reason: format!(
                    "priority {priority} outside [{MIN_PRIORITY}, {MAX_PRIORITY}]"
                ),
            });
        }

        debug!(
            middleware = middleware.name(),
            priority, "Registered middleware"
        );
        self.middleware.push(middleware);
        // Stable sort: equal priorities keep registration order
        self.middleware.sort_by_key(|m| m.priority());
        Ok(())
    }

    /// Builder-style registration.
    pub fn with_middleware(mut self, middleware: Arc<dyn ResolutionMiddleware>) -> Result<Self> {
        self.register(middleware)?;
        Ok(self)
    }

    /// Number of registered middleware.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Middleware names in execution order.
    #[must_use]
    pub fn middleware_names(&self) -> Vec<&str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }

    /// Run the `pre_resolution` phase with the requested name as payload.
    pub async fn run_pre_resolution(
        &self,
        name: String,
        ctx: &SharedContext,
    ) -> Result<ChainOutcome<String>> {
        let mut payload = name;
        for middleware in &self.middleware {
            match middleware.pre_resolution(payload, ctx).await? {
                PhaseAction::Continue(next) => payload = next,
                PhaseAction::Halt => return Ok(self.halted(middleware, ResolutionPhase::PreResolution)),
            }
        }
        Ok(ChainOutcome::Completed(payload))
    }

    /// Run the `post_resolution` phase with the resolved descriptor.
    pub async fn run_post_resolution(
        &self,
        descriptor: ComponentDescriptor,
        ctx: &SharedContext,
    ) -> Result<ChainOutcome<ComponentDescriptor>> {
        let mut payload = descriptor;
        for middleware in &self.middleware {
            match middleware.post_resolution(payload, ctx).await? {
                PhaseAction::Continue(next) => payload = next,
                PhaseAction::Halt => {
                    return Ok(self.halted(middleware, ResolutionPhase::PostResolution))
                }
            }
        }
        Ok(ChainOutcome::Completed(payload))
    }

    /// Run the `before_render` phase. This phase additionally exposes the
    /// resolved descriptor, not just the argument payload.
    pub async fn run_before_render(
        &self,
        descriptor: &ComponentDescriptor,
        args: ComponentArgs,
        ctx: &SharedContext,
    ) -> Result<ChainOutcome<ComponentArgs>> {
        let mut payload = args;
        for middleware in &self.middleware {
            match middleware.before_render(descriptor, payload, ctx).await? {
                PhaseAction::Continue(next) => payload = next,
                PhaseAction::Halt => {
                    return Ok(self.halted(middleware, ResolutionPhase::BeforeRender))
                }
            }
        }
        Ok(ChainOutcome::Completed(payload))
    }

    /// Run the `post_render` phase. The chain always feeds the latest
    /// returned value into the next handler; handlers substitute new values
    /// rather than mutating the one they received.
    pub async fn run_post_render(
        &self,
        output: Arc<RenderOutput>,
        ctx: &SharedContext,
    ) -> Result<ChainOutcome<Arc<RenderOutput>>> {
        let mut payload = output;
        for middleware in &self.middleware {
            match middleware.post_render(payload, ctx).await? {
                PhaseAction::Continue(next) => payload = next,
                PhaseAction::Halt => return Ok(self.halted(middleware, ResolutionPhase::PostRender)),
            }
        }
        Ok(ChainOutcome::Completed(payload))
    }

    /// Run the `on_error` phase. Returns the first fallback output a
    /// middleware supplied, or `None` when every handler chose to propagate.
    pub async fn run_on_error(
        &self,
        error: &ResolverError,
        phase: ResolutionPhase,
        ctx: &SharedContext,
    ) -> Option<RenderOutput> {
        for middleware in &self.middleware {
            match middleware.on_error(error, phase, ctx).await {
                ErrorAction::Propagate => {}
                ErrorAction::Fallback(output) => {
                    debug!(
                        middleware = middleware.name(),
                        phase = %phase,
                        "Middleware supplied fallback output for failed resolution"
                    );
                    return Some(output);
                }
            }
        }
        None
    }

    /// Run the `cleanup` phase. Always runs every handler; cleanup cannot
    /// halt, and its modifications are discarded.
    pub async fn run_cleanup(&self, succeeded: bool, ctx: &SharedContext) {
        for middleware in &self.middleware {
            trace!(middleware = middleware.name(), succeeded, "Running cleanup");
            middleware.cleanup(succeeded, ctx).await;
        }
    }

    fn halted<T>(
        &self,
        middleware: &Arc<dyn ResolutionMiddleware>,
        phase: ResolutionPhase,
    ) -> ChainOutcome<T> {
        debug!(
            middleware = middleware.name(),
            phase = %phase,
            "Middleware halted the chain"
        );
        ChainOutcome::Halted {
            middleware: middleware.name().to_string(),
        }
    }
}

//! # Component Resolver
//!
//! Orchestrates one resolution end to end: runs the middleware phases in
//! order, looks the (possibly re-routed) name up in the registry, hands the
//! descriptor to the injector for argument resolution, invokes the
//! construction strategy, and threads the produced output through
//! `post_render`.
//!
//! ## Concurrency
//!
//! The resolver owns no thread pool or event loop. Each `resolve` call runs
//! on the caller's task; phases within one call are strictly sequential,
//! while independent calls may run concurrently sharing only the registry
//! (and whatever context the caller chose to share). No retries and no
//! timeouts are applied internally.
//!
//! ## Usage
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
//! # async fn example() -> component_core::error::Result<()> {
//! let registry = Arc::new(ComponentRegistry::new());
//! registry.register(
//!     "Button",
//!     ComponentDescriptor::class("Button", vec![], |_| {
//!         Ok(RenderOutput::new("Button", json!("<button/>")))
//!     }),
//! );
//!
//! let resolver = ComponentResolver::new(registry, Arc::new(ProviderInjector::new()));
//! let resolution = resolver.resolve("Button", &SharedContext::new()).await?;
//! assert!(resolution.output().is_some());
//! # Ok(())
//! # }
//! ```

use crate::component::RenderOutput;
use crate::config::ResolverConfig;
use crate::context::SharedContext;
use crate::error::{ResolverError, Result};
use crate::injector::Injector;
use crate::middleware::{ChainOutcome, MiddlewareChain, ResolutionMiddleware, ResolutionPhase};
use crate::registry::ComponentRegistry;
use crate::resolver::suggestions::suggest;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Outcome of one resolution.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The pipeline completed; this is the final (possibly middleware
    /// substituted) output.
    Rendered(Arc<RenderOutput>),
    /// A middleware intentionally stopped the resolution. Not an error.
    Halted {
        /// Phase where the halt happened
        phase: ResolutionPhase,
        /// Middleware that issued the halt
        middleware: String,
    },
}

impl Resolution {
    /// The rendered output, if the pipeline completed.
    #[must_use]
    pub fn output(&self) -> Option<&Arc<RenderOutput>> {
        match self {
            Resolution::Rendered(output) => Some(output),
            Resolution::Halted { .. } => None,
        }
    }

    /// Whether a middleware halted the resolution.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        matches!(self, Resolution::Halted { .. })
    }
}

/// Ephemeral per-call state. Never shared across calls; dropped after
/// cleanup has run.
#[derive(Debug)]
struct ResolutionAttempt {
    attempt_id: Uuid,
    requested: String,
    started_at: DateTime<Utc>,
}

impl ResolutionAttempt {
    fn new(requested: &str) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            requested: requested.to_string(),
            started_at: Utc::now(),
        }
    }
}

/// Resolves component names into constructed, dependency-injected output.
///
/// The registry is passed in explicitly (or taken from the shared context),
/// never reached through a global, so independent registries can coexist.
pub struct ComponentResolver {
    registry: Arc<ComponentRegistry>,
    injector: Arc<dyn Injector>,
    chain: MiddlewareChain,
    config: ResolverConfig,
}

impl ComponentResolver {
    /// Create a resolver over an explicit registry and injector.
    #[must_use]
    pub fn new(registry: Arc<ComponentRegistry>, injector: Arc<dyn Injector>) -> Self {
        Self {
            registry,
            injector,
            chain: MiddlewareChain::new(),
            config: ResolverConfig::default(),
        }
    }

    /// Create a resolver using the registry attached to the context.
    ///
    /// A context without a registry is a setup error, distinct from any
    /// individual name missing.
    pub fn from_context(ctx: &SharedContext, injector: Arc<dyn Injector>) -> Result<Self> {
        let registry = ctx.registry().ok_or(ResolverError::RegistryNotSetup)?;
        Ok(Self::new(registry, injector))
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a middleware. Startup configuration only — the chain is
    /// immutable once resolutions are flowing.
    pub fn register_middleware(&mut self, middleware: Arc<dyn ResolutionMiddleware>) -> Result<()> {
        self.chain.register(middleware)
    }

    /// Builder-style middleware registration.
    pub fn with_middleware(mut self, middleware: Arc<dyn ResolutionMiddleware>) -> Result<Self> {
        self.register_middleware(middleware)?;
        Ok(self)
    }

    /// The registry this resolver reads from.
    #[must_use]
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Names of the registered middleware in execution order.
    #[must_use]
    pub fn middleware_names(&self) -> Vec<&str> {
        self.chain.middleware_names()
    }

    /// Resolve `name` into constructed output.
    ///
    /// Errors from any phase first run the `on_error` middleware; a fallback
    /// output turns the failure into a `Rendered` resolution. `cleanup`
    /// always runs exactly once, with `succeeded` true only for a normal
    /// rendered completion.
    #[instrument(skip(self, ctx), fields(component = %name))]
    pub async fn resolve(&self, name: &str, ctx: &SharedContext) -> Result<Resolution> {
        let attempt = ResolutionAttempt::new(name);
        let timer = Instant::now();
        debug!(
            attempt_id = %attempt.attempt_id,
            started_at = %attempt.started_at.to_rfc3339(),
            "Starting resolution"
        );

        match self.run_pipeline(&attempt, ctx).await {
            Ok(resolution) => {
                let succeeded = !resolution.is_halted();
                self.chain.run_cleanup(succeeded, ctx).await;
                match &resolution {
                    Resolution::Rendered(output) => info!(
                        attempt_id = %attempt.attempt_id,
                        component = %output.component,
                        duration_ms = timer.elapsed().as_millis() as u64,
                        "Resolution complete"
                    ),
                    Resolution::Halted { phase, middleware } => debug!(
                        attempt_id = %attempt.attempt_id,
                        phase = %phase,
                        middleware = %middleware,
                        "Resolution halted by middleware"
                    ),
                }
                Ok(resolution)
            }
            Err((phase, error)) => {
                warn!(
                    attempt_id = %attempt.attempt_id,
                    phase = %phase,
                    error = %error,
                    "Resolution failed"
                );
                let fallback = self.chain.run_on_error(&error, phase, ctx).await;
                self.chain.run_cleanup(false, ctx).await;
                match fallback {
                    Some(output) => Ok(Resolution::Rendered(Arc::new(output))),
                    None => Err(error),
                }
            }
        }
    }

    /// Synchronous variant of [`resolve`](Self::resolve), driving the async
    /// pipeline to completion on the calling thread.
    ///
    /// Must not be called from inside an async runtime context.
    pub fn resolve_blocking(&self, name: &str, ctx: &SharedContext) -> Result<Resolution> {
        futures::executor::block_on(self.resolve(name, ctx))
    }

    /// The linear pipeline, errors tagged with the last middleware phase
    /// reached so `on_error` can report where the failure happened.
    async fn run_pipeline(
        &self,
        attempt: &ResolutionAttempt,
        ctx: &SharedContext,
    ) -> std::result::Result<Resolution, (ResolutionPhase, ResolverError)> {
        // PreResolution: middleware may re-route the name or abort.
        let effective = match self
            .chain
            .run_pre_resolution(attempt.requested.clone(), ctx)
            .await
            .map_err(|e| (ResolutionPhase::PreResolution, e))?
        {
            ChainOutcome::Completed(name) => name,
            ChainOutcome::Halted { middleware } => {
                return Ok(Resolution::Halted {
                    phase: ResolutionPhase::PreResolution,
                    middleware,
                })
            }
        };
        if effective != attempt.requested {
            debug!(
                attempt_id = %attempt.attempt_id,
                requested = %attempt.requested,
                effective = %effective,
                "Middleware re-routed resolution"
            );
        }

        // NameLookup: a re-routed name that is also absent gets the same
        // treatment as an initial miss.
        let record = self.registry.lookup(&effective).ok_or_else(|| {
            let suggestions = suggest(
                &self.registry.all_names(),
                &effective,
                self.config.max_suggestion_distance,
                self.config.max_suggestions,
            );
            (
                ResolutionPhase::PreResolution,
                ResolverError::not_found(&effective, suggestions),
            )
        })?;

        // PostResolution: middleware may substitute the descriptor.
        let descriptor = match self
            .chain
            .run_post_resolution(record.descriptor, ctx)
            .await
            .map_err(|e| (ResolutionPhase::PostResolution, e))?
        {
            ChainOutcome::Completed(descriptor) => descriptor,
            ChainOutcome::Halted { middleware } => {
                return Ok(Resolution::Halted {
                    phase: ResolutionPhase::PostResolution,
                    middleware,
                })
            }
        };

        // ArgumentResolution: exactly one injector call per resolution,
        // never cached across calls.
        let overrides = ctx.overrides();
        let args = self
            .injector
            .construct(&descriptor, &overrides, ctx)
            .await
            .map_err(|e| (ResolutionPhase::PostResolution, e))?;

        // BeforeRender: middleware see both descriptor and arguments.
        let args = match self
            .chain
            .run_before_render(&descriptor, args, ctx)
            .await
            .map_err(|e| (ResolutionPhase::BeforeRender, e))?
        {
            ChainOutcome::Completed(args) => args,
            ChainOutcome::Halted { middleware } => {
                return Ok(Resolution::Halted {
                    phase: ResolutionPhase::BeforeRender,
                    middleware,
                })
            }
        };

        // Invoke: construction strategy was tagged at registration time.
        let output = descriptor
            .construct(&args)
            .map_err(|e| (ResolutionPhase::BeforeRender, e))?;

        // PostRender: immutable output threading.
        match self
            .chain
            .run_post_render(Arc::new(output), ctx)
            .await
            .map_err(|e| (ResolutionPhase::PostRender, e))?
        {
            ChainOutcome::Completed(output) => Ok(Resolution::Rendered(output)),
            ChainOutcome::Halted { middleware } => Ok(Resolution::Halted {
                phase: ResolutionPhase::PostRender,
                middleware,
            }),
        }
    }
}

impl std::fmt::Debug for ComponentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentResolver")
            .field("registered_components", &self.registry.len())
            .field("middleware", &self.chain.middleware_names())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentArgs, ComponentDescriptor, ParamSpec};
    use crate::injector::ProviderInjector;
    use crate::middleware::{ErrorAction, PhaseAction};
    use async_trait::async_trait;
    use serde_json::json;

    fn registry_with_button() -> Arc<ComponentRegistry> {
        let registry = Arc::new(ComponentRegistry::new());
        registry.register(
            "Button",
            ComponentDescriptor::class("Button", vec![ParamSpec::required("label")], |args| {
                Ok(RenderOutput::new(
                    "Button",
                    json!({ "label": args.get("label").cloned() }),
                ))
            }),
        );
        registry
    }

    fn injector_with_label() -> Arc<ProviderInjector> {
        Arc::new(ProviderInjector::new().with_value("label", json!("Save")))
    }

    #[derive(Debug)]
    struct Rerouter {
        from: String,
        to: String,
    }

    #[async_trait]
    impl ResolutionMiddleware for Rerouter {
        fn name(&self) -> &str {
            "rerouter"
        }

        async fn pre_resolution(
            &self,
            name: String,
            _ctx: &SharedContext,
        ) -> Result<PhaseAction<String>> {
            if name == self.from {
                Ok(PhaseAction::Continue(self.to.clone()))
            } else {
                Ok(PhaseAction::Continue(name))
            }
        }
    }

    #[derive(Debug)]
    struct PreResolutionHalter;

    #[async_trait]
    impl ResolutionMiddleware for PreResolutionHalter {
        fn name(&self) -> &str {
            "pre_halter"
        }

        async fn pre_resolution(
            &self,
            _name: String,
            _ctx: &SharedContext,
        ) -> Result<PhaseAction<String>> {
            Ok(PhaseAction::Halt)
        }
    }

    #[derive(Debug)]
    struct CleanupFlag;

    #[async_trait]
    impl ResolutionMiddleware for CleanupFlag {
        fn name(&self) -> &str {
            "cleanup_flag"
        }

        async fn cleanup(&self, succeeded: bool, ctx: &SharedContext) {
            ctx.push("cleanup_runs", json!(succeeded));
        }
    }

    #[tokio::test]
    async fn test_resolve_happy_path() {
        let resolver = ComponentResolver::new(registry_with_button(), injector_with_label());
        let resolution = resolver
            .resolve("Button", &SharedContext::new())
            .await
            .unwrap();

        let output = resolution.output().unwrap();
        assert_eq!(output.component, "Button");
        assert_eq!(output.body["label"], json!("Save"));
    }

    #[tokio::test]
    async fn test_resolve_uses_caller_overrides() {
        let resolver = ComponentResolver::new(registry_with_button(), injector_with_label());
        let ctx = SharedContext::new();
        ctx.set_override("label", json!("Cancel"));

        let resolution = resolver.resolve("Button", &ctx).await.unwrap();
        assert_eq!(resolution.output().unwrap().body["label"], json!("Cancel"));
    }

    #[tokio::test]
    async fn test_missing_name_carries_suggestions() {
        let resolver = ComponentResolver::new(registry_with_button(), injector_with_label());
        let error = resolver
            .resolve("Buttn", &SharedContext::new())
            .await
            .unwrap_err();

        match error {
            ResolverError::ComponentNotFound { name, suggestions } => {
                assert_eq!(name, "Buttn");
                assert!(suggestions.contains(&"Button".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_reroute_to_registered_name() {
        let resolver = ComponentResolver::new(registry_with_button(), injector_with_label())
            .with_middleware(Arc::new(Rerouter {
                from: "LegacyButton".to_string(),
                to: "Button".to_string(),
            }))
            .unwrap();

        let resolution = resolver
            .resolve("LegacyButton", &SharedContext::new())
            .await
            .unwrap();
        assert_eq!(resolution.output().unwrap().component, "Button");
    }

    #[tokio::test]
    async fn test_reroute_to_missing_name_is_uniform_miss() {
        let resolver = ComponentResolver::new(registry_with_button(), injector_with_label())
            .with_middleware(Arc::new(Rerouter {
                from: "Button".to_string(),
                to: "Ghost".to_string(),
            }))
            .unwrap();

        let error = resolver
            .resolve("Button", &SharedContext::new())
            .await
            .unwrap_err();
        // The error names the re-routed name, not the requested one
        assert!(matches!(
            error,
            ResolverError::ComponentNotFound { ref name, .. } if name == "Ghost"
        ));
    }

    #[tokio::test]
    async fn test_halt_yields_not_resolved_and_failed_cleanup() {
        let resolver = ComponentResolver::new(registry_with_button(), injector_with_label())
            .with_middleware(Arc::new(PreResolutionHalter))
            .unwrap()
            .with_middleware(Arc::new(CleanupFlag))
            .unwrap();

        let ctx = SharedContext::new();
        let resolution = resolver.resolve("Button", &ctx).await.unwrap();

        assert!(resolution.is_halted());
        // Cleanup ran exactly once, with succeeded = false
        assert_eq!(ctx.get("cleanup_runs"), Some(json!([false])));
    }

    #[tokio::test]
    async fn test_injector_miss_propagates_after_on_error() {
        let registry = Arc::new(ComponentRegistry::new());
        registry.register(
            "Card",
            ComponentDescriptor::class("Card", vec![ParamSpec::required("theme")], |_| {
                Ok(RenderOutput::new("Card", json!(null)))
            }),
        );

        let resolver = ComponentResolver::new(registry, Arc::new(ProviderInjector::new()))
            .with_middleware(Arc::new(CleanupFlag))
            .unwrap();

        let ctx = SharedContext::new();
        let error = resolver.resolve("Card", &ctx).await.unwrap_err();

        assert_eq!(error, ResolverError::injector_not_found("Card", "theme"));
        assert_eq!(ctx.get("cleanup_runs"), Some(json!([false])));
    }

    #[tokio::test]
    async fn test_on_error_fallback_becomes_result() {
        #[derive(Debug)]
        struct ErrorFallback;

        #[async_trait]
        impl ResolutionMiddleware for ErrorFallback {
            fn name(&self) -> &str {
                "error_fallback"
            }

            async fn on_error(
                &self,
                error: &ResolverError,
                phase: ResolutionPhase,
                ctx: &SharedContext,
            ) -> ErrorAction {
                ctx.set("observed_phase", json!(phase.as_str()));
                ctx.set("observed_error", json!(error.to_string()));
                ErrorAction::Fallback(RenderOutput::new("ErrorPage", json!("something broke")))
            }
        }

        let resolver = ComponentResolver::new(registry_with_button(), injector_with_label())
            .with_middleware(Arc::new(ErrorFallback))
            .unwrap();

        let ctx = SharedContext::new();
        let resolution = resolver.resolve("Ghost", &ctx).await.unwrap();

        assert_eq!(resolution.output().unwrap().component, "ErrorPage");
        assert_eq!(ctx.get("observed_phase"), Some(json!("pre_resolution")));
    }

    #[tokio::test]
    async fn test_before_render_argument_amendment() {
        #[derive(Debug)]
        struct Uppercaser;

        #[async_trait]
        impl ResolutionMiddleware for Uppercaser {
            fn name(&self) -> &str {
                "uppercaser"
            }

            async fn before_render(
                &self,
                _descriptor: &ComponentDescriptor,
                args: ComponentArgs,
                _ctx: &SharedContext,
            ) -> Result<PhaseAction<ComponentArgs>> {
                let label = args
                    .get("label")
                    .and_then(|v| v.as_str())
                    .map(str::to_uppercase)
                    .unwrap_or_default();
                Ok(PhaseAction::Continue(args.with("label", json!(label))))
            }
        }

        let resolver = ComponentResolver::new(registry_with_button(), injector_with_label())
            .with_middleware(Arc::new(Uppercaser))
            .unwrap();

        let resolution = resolver
            .resolve("Button", &SharedContext::new())
            .await
            .unwrap();
        assert_eq!(resolution.output().unwrap().body["label"], json!("SAVE"));
    }

    #[tokio::test]
    async fn test_from_context_without_registry() {
        let result = ComponentResolver::from_context(
            &SharedContext::new(),
            Arc::new(ProviderInjector::new()),
        );
        assert!(matches!(result, Err(ResolverError::RegistryNotSetup)));
    }

    #[tokio::test]
    async fn test_from_context_with_registry() {
        let ctx = SharedContext::new().with_registry(registry_with_button());
        let resolver =
            ComponentResolver::from_context(&ctx, injector_with_label()).unwrap();

        let resolution = resolver.resolve("Button", &ctx).await.unwrap();
        assert!(resolution.output().is_some());
    }

    #[test]
    fn test_resolve_blocking_outside_runtime() {
        let resolver = ComponentResolver::new(registry_with_button(), injector_with_label());
        let resolution = resolver
            .resolve_blocking("Button", &SharedContext::new())
            .unwrap();
        assert_eq!(resolution.output().unwrap().component, "Button");
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_are_independent() {
        let resolver = Arc::new(ComponentResolver::new(
            registry_with_button(),
            injector_with_label(),
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let resolver = Arc::clone(&resolver);
            handles.push(tokio::spawn(async move {
                let ctx = SharedContext::new();
                resolver.resolve("Button", &ctx).await
            }));
        }

        for handle in handles {
            let resolution = handle.await.unwrap().unwrap();
            assert_eq!(resolution.output().unwrap().component, "Button");
        }
    }
}

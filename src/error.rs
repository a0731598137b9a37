//! # Resolution Error Types
//!
//! Structured error handling for the resolution pipeline using thiserror
//! for typed errors instead of `Box<dyn Error>` patterns.
//!
//! Two taxonomies live here:
//!
//! - [`ResolverError`] — everything that can go wrong while resolving a name
//!   into a rendered component (registry miss, injector miss, construction
//!   failure, misbehaving middleware).
//! - [`DiscoveryError`] — failures of the bulk discovery path. A missing
//!   package fails the whole scan; individually broken modules are recorded
//!   as [`SkippedModule`] warnings on the scan report, never as errors.
//!
//! A middleware halting the chain is intentionally NOT an error. Halts are
//! modeled as control flow (`PhaseAction::Halt` / `Resolution::Halted`).

use crate::middleware::ResolutionPhase;
use thiserror::Error;

/// Errors surfaced by the resolution pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    /// The requested name is absent from the registry. Carries near-match
    /// suggestions drawn from the registered names.
    #[error("Component not found: '{name}'{}", suggestion_hint(.suggestions))]
    ComponentNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// The injector could not supply a required dependency. Registration or
    /// provider setup is incomplete.
    #[error("Injector has no provider for dependency '{dependency}' required by component '{component}'")]
    InjectorNotFound {
        component: String,
        dependency: String,
    },

    /// No registry was configured in the current context. Distinct from a
    /// name miss: the registry itself was never set up.
    #[error("Component registry is not set up in this context")]
    RegistryNotSetup,

    /// The component's construction strategy failed with the final arguments.
    #[error("Construction failed for component '{component}': {reason}")]
    Construction { component: String, reason: String },

    /// A middleware was rejected at registration time.
    #[error("Invalid middleware '{name}': {reason}")]
    InvalidMiddleware { name: String, reason: String },

    /// A middleware handler raised during a phase.
    #[error("Middleware '{middleware}' failed during {phase}: {reason}")]
    Middleware {
        middleware: String,
        phase: ResolutionPhase,
        reason: String,
    },

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

impl ResolverError {
    /// Create a not-found error with suggestions.
    pub fn not_found(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::ComponentNotFound {
            name: name.into(),
            suggestions,
        }
    }

    /// Create an injector-miss error.
    pub fn injector_not_found(
        component: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        Self::InjectorNotFound {
            component: component.into(),
            dependency: dependency.into(),
        }
    }

    /// Create a construction error.
    pub fn construction(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Construction {
            component: component.into(),
            reason: reason.into(),
        }
    }

    /// Create a middleware failure error for a specific phase.
    pub fn middleware(
        middleware: impl Into<String>,
        phase: ResolutionPhase,
        reason: impl Into<String>,
    ) -> Self {
        Self::Middleware {
            middleware: middleware.into(),
            phase,
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the bulk discovery path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    /// A requested discovery source does not exist. Fails the whole scan;
    /// nothing from any source is registered.
    #[error("Package not found: '{package}'")]
    PackageNotFound { package: String },

    /// A discovery marker was applied to something that is not a
    /// constructible component. Raised at mark time, not at scan time.
    #[error("Decoration target '{target}' is not a constructible component: {reason}")]
    DecorationType { target: String, reason: String },
}

impl DiscoveryError {
    /// Create a package-not-found error.
    pub fn package_not_found(package: impl Into<String>) -> Self {
        Self::PackageNotFound {
            package: package.into(),
        }
    }

    /// Create a decoration-type error for an invalid mark target.
    pub fn decoration_type(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecorationType {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// A module that failed to load during a scan while its package as a whole
/// was importable. Recorded and logged, never propagated.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedModule {
    /// Module path within the package, e.g. `widgets.button`
    pub module: String,
    /// Why the module was skipped
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, ResolverError>;

fn suggestion_hint(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

//! # Resolution Middleware Trait
//!
//! The fixed-method-set interface a middleware implements. Every phase
//! handler has a pass-through default, so an implementation overrides only
//! the phases it cares about; a non-overridden handler is indistinguishable
//! from "no handler for this phase".
//!
//! Handlers are `async fn`s. Purely synchronous work simply returns without
//! awaiting — mixing sync and async middleware in one chain needs nothing
//! from the chain author, and priority ordering holds regardless.
//!
//! ## Example
//!
//! ```rust
//! use component_core::context::SharedContext;
//! use component_core::error::Result;
//! use component_core::middleware::{PhaseAction, ResolutionMiddleware};
//! use async_trait::async_trait;
//! use serde_json::json;
//!
//! /// Records every resolved name into the shared context.
//! #[derive(Debug)]
//! struct NameCollector;
//!
//! #[async_trait]
//! impl ResolutionMiddleware for NameCollector {
//!     fn name(&self) -> &str {
//!         "name_collector"
//!     }
//!
//!     fn priority(&self) -> i32 {
//!         -50 // run early
//!     }
//!
//!     async fn pre_resolution(
//!         &self,
//!         name: String,
//!         ctx: &SharedContext,
//!     ) -> Result<PhaseAction<String>> {
//!         ctx.push("requested_names", json!(name.clone()));
//!         Ok(PhaseAction::Continue(name))
//!     }
//! }
//! ```

use crate::component::{ComponentArgs, ComponentDescriptor, RenderOutput};
use crate::context::SharedContext;
use crate::error::{ResolverError, Result};
use crate::middleware::ResolutionPhase;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// What a phase handler decided to do with the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseAction<T> {
    /// Keep going; the (possibly replaced) payload feeds the next middleware.
    Continue(T),
    /// Stop the chain now. No later middleware in this phase and no later
    /// phase through Invoke runs; `cleanup` still does.
    Halt,
}

impl<T> PhaseAction<T> {
    /// Whether this action halts the chain.
    #[must_use]
    pub fn is_halt(&self) -> bool {
        matches!(self, PhaseAction::Halt)
    }
}

/// What an `on_error` handler decided about a failing resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorAction {
    /// Let the error propagate to the caller (the default).
    Propagate,
    /// Swallow the error and use this output as the resolution result.
    Fallback(RenderOutput),
}

/// A priority-tagged middleware with one handler per lifecycle phase.
///
/// Priorities live in `[-100, 100]`; lower runs earlier, ties preserve
/// registration order. Implementations must be `Send + Sync` — one chain is
/// shared by every concurrent resolution.
#[async_trait]
pub trait ResolutionMiddleware: Send + Sync + fmt::Debug {
    /// Middleware name for logging and halt attribution.
    fn name(&self) -> &str;

    /// Priority in `[-100, 100]`; lower runs earlier. Defaults to 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Runs before the name lookup. May return a different name (re-routing)
    /// or halt to abort the resolution without an error.
    async fn pre_resolution(&self, name: String, _ctx: &SharedContext) -> Result<PhaseAction<String>> {
        Ok(PhaseAction::Continue(name))
    }

    /// Runs after the name lookup. May substitute a different descriptor.
    async fn post_resolution(
        &self,
        descriptor: ComponentDescriptor,
        _ctx: &SharedContext,
    ) -> Result<PhaseAction<ComponentDescriptor>> {
        Ok(PhaseAction::Continue(descriptor))
    }

    /// Runs after argument resolution, with both the resolved descriptor and
    /// the computed arguments in view. May return a modified argument set.
    async fn before_render(
        &self,
        _descriptor: &ComponentDescriptor,
        args: ComponentArgs,
        _ctx: &SharedContext,
    ) -> Result<PhaseAction<ComponentArgs>> {
        Ok(PhaseAction::Continue(args))
    }

    /// Runs on the produced output. The received value is immutable: a
    /// handler that wants a change clones it, edits the copy, and returns a
    /// new `Arc`. Returning the received `Arc` unchanged means "untouched".
    async fn post_render(
        &self,
        output: Arc<RenderOutput>,
        _ctx: &SharedContext,
    ) -> Result<PhaseAction<Arc<RenderOutput>>> {
        Ok(PhaseAction::Continue(output))
    }

    /// Runs when any phase raised, before the error propagates. The first
    /// middleware returning a fallback turns the failure into a result.
    async fn on_error(
        &self,
        _error: &ResolverError,
        _phase: ResolutionPhase,
        _ctx: &SharedContext,
    ) -> ErrorAction {
        ErrorAction::Propagate
    }

    /// Terminal hook, run exactly once per resolution regardless of halts or
    /// errors, with the overall success flag. Returns nothing and cannot
    /// raise: cleanup releases per-resolution resources and must never
    /// suppress or replace a prior error.
    async fn cleanup(&self, _succeeded: bool, _ctx: &SharedContext) {}
}

//! # Middleware Pipeline
//!
//! Priority-ordered, pluggable hooks invoked at fixed lifecycle phases of a
//! resolution.
//!
//! ## Overview
//!
//! Middleware are registered once at startup into a [`MiddlewareChain`]. The
//! chain keeps a stable priority-sorted view (ascending priority; equal
//! priorities preserve registration order) and runs the handlers of one phase
//! sequentially, feeding each handler's returned payload into the next.
//!
//! A handler either continues with a (possibly replaced) payload or halts the
//! chain. Halting is control flow, not an error: no further middleware in the
//! phase — or any later phase through Invoke — runs, but `cleanup` still does.
//!
//! ## Architecture
//!
//! ```text
//! MiddlewareChain
//! ├── ResolutionPhase       (pre_resolution .. cleanup)
//! ├── ResolutionMiddleware  (per-phase async handlers, pass-through defaults)
//! ├── PhaseAction           (Continue(payload) | Halt)
//! └── ErrorAction           (Propagate | Fallback(output))
//! ```

pub mod chain;
pub mod phase;

mod resolution_middleware;

pub use chain::{ChainOutcome, MiddlewareChain};
pub use phase::ResolutionPhase;
pub use resolution_middleware::{ErrorAction, PhaseAction, ResolutionMiddleware};

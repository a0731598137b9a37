//! # Component Resolver
//!
//! The pipeline orchestrator: name → descriptor (registry) → middleware
//! phases → constructor arguments (injector) → constructed output.
//!
//! ```text
//! Start → PreResolution → NameLookup → PostResolution → ArgumentResolution
//!       → BeforeRender → Invoke → PostRender → Cleanup → Done
//!                    ↘ (any step raises) OnError → Cleanup → Done
//! ```

pub mod component_resolver;
pub mod suggestions;

pub use component_resolver::{ComponentResolver, Resolution};

//! Resolution lifecycle phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A lifecycle phase of one resolution. Not stored anywhere; threaded as a
/// parameter through execution and into `on_error` handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPhase {
    /// Before the name lookup; payload is the requested name
    PreResolution,
    /// After the name lookup; payload is the resolved descriptor
    PostResolution,
    /// After argument resolution; payload is the argument set
    BeforeRender,
    /// After the component produced output; payload is the output
    PostRender,
    /// Diversion phase run when any earlier phase raised
    OnError,
    /// Terminal phase; always runs exactly once
    Cleanup,
}

impl ResolutionPhase {
    /// All phases in pipeline order.
    pub const ALL: [ResolutionPhase; 6] = [
        ResolutionPhase::PreResolution,
        ResolutionPhase::PostResolution,
        ResolutionPhase::BeforeRender,
        ResolutionPhase::PostRender,
        ResolutionPhase::OnError,
        ResolutionPhase::Cleanup,
    ];

    /// Stable snake_case name, matching the handler method names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionPhase::PreResolution => "pre_resolution",
            ResolutionPhase::PostResolution => "post_resolution",
            ResolutionPhase::BeforeRender => "before_render",
            ResolutionPhase::PostRender => "post_render",
            ResolutionPhase::OnError => "on_error",
            ResolutionPhase::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for ResolutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! # Resolver Configuration
//!
//! Small knob set for the resolution pipeline, loadable from environment
//! variables (`COMPONENT_CORE_*`) with optional TOML file layering.

use crate::error::{ResolverError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum number of near-match suggestions on a failed lookup
    pub max_suggestions: usize,
    /// Maximum edit distance for a name to count as a near match
    pub max_suggestion_distance: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 3,
            max_suggestion_distance: 3,
        }
    }
}

impl ResolverConfig {
    /// Load configuration: defaults, then an optional TOML file, then
    /// `COMPONENT_CORE_*` environment variables (highest precedence).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("max_suggestions", defaults.max_suggestions as i64)
            .map_err(|e| ResolverError::Configuration {
                reason: e.to_string(),
            })?
            .set_default(
                "max_suggestion_distance",
                defaults.max_suggestion_distance as i64,
            )
            .map_err(|e| ResolverError::Configuration {
                reason: e.to_string(),
            })?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("COMPONENT_CORE"));

        builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ResolverError::Configuration {
                reason: e.to_string(),
            })
    }

    /// Load from environment variables only.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }
}

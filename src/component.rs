//! # Component Model
//!
//! Core value types for the resolution pipeline: the type descriptor with its
//! construction strategy, constructor arguments, decoration metadata, and the
//! immutable render output.
//!
//! ## Class vs. callable components
//!
//! Whether a component is class-like (constructed) or callable (invoked) is
//! decided once, at registration time, as a tagged [`ConstructionStrategy`]
//! variant carrying its own construction closure. The pipeline never inspects
//! the component kind at runtime; it dispatches through the variant.

use crate::error::{ResolverError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Construction closure: final arguments in, rendered output out.
pub type ConstructFn = Arc<dyn Fn(&ComponentArgs) -> Result<RenderOutput> + Send + Sync>;

/// How a component gets turned into output. Tagged at registration time.
#[derive(Clone)]
pub enum ConstructionStrategy {
    /// Class-like component: instantiated with constructor arguments.
    Class(ConstructFn),
    /// Callable component: invoked directly with the arguments.
    Callable(ConstructFn),
}

impl ConstructionStrategy {
    /// Kind tag for logging and metadata.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            ConstructionStrategy::Class(_) => ComponentKind::Class,
            ConstructionStrategy::Callable(_) => ComponentKind::Callable,
        }
    }
}

impl fmt::Debug for ConstructionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionStrategy::Class(_) => write!(f, "Class(<fn>)"),
            ConstructionStrategy::Callable(_) => write!(f, "Callable(<fn>)"),
        }
    }
}

/// Component kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Class,
    Callable,
}

/// A constructor parameter expected by a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name, unique within a descriptor
    pub name: String,
    /// Whether the injector must supply a value when no default exists
    pub required: bool,
    /// Default value used when neither overrides nor providers supply one
    pub default: Option<serde_json::Value>,
}

impl ParamSpec {
    /// A required parameter with no default.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            default: None,
        }
    }

    /// An optional parameter with a default value.
    #[must_use]
    pub fn optional(name: impl Into<String>, default: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: Some(default),
        }
    }
}

/// Describes a constructible component type: its canonical name, the
/// parameters its constructor expects, and the construction strategy.
#[derive(Clone)]
pub struct ComponentDescriptor {
    type_name: String,
    params: Vec<ParamSpec>,
    strategy: ConstructionStrategy,
}

impl ComponentDescriptor {
    /// Describe a class-like component.
    pub fn class<F>(type_name: impl Into<String>, params: Vec<ParamSpec>, construct: F) -> Self
    where
        F: Fn(&ComponentArgs) -> Result<RenderOutput> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            params,
            strategy: ConstructionStrategy::Class(Arc::new(construct)),
        }
    }

    /// Describe a callable component.
    pub fn callable<F>(type_name: impl Into<String>, params: Vec<ParamSpec>, invoke: F) -> Self
    where
        F: Fn(&ComponentArgs) -> Result<RenderOutput> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            params,
            strategy: ConstructionStrategy::Callable(Arc::new(invoke)),
        }
    }

    /// Canonical type name. Used as the registry key during discovery.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Constructor parameters expected by this component.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Component kind tag.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.strategy.kind()
    }

    /// Construct or invoke the component with the final arguments.
    pub fn construct(&self, args: &ComponentArgs) -> Result<RenderOutput> {
        let construct = match &self.strategy {
            ConstructionStrategy::Class(f) | ConstructionStrategy::Callable(f) => f,
        };
        construct(args).map_err(|e| match e {
            // Preserve structured errors raised by the strategy itself
            e @ ResolverError::Construction { .. } => e,
            other => ResolverError::construction(&self.type_name, other.to_string()),
        })
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("type_name", &self.type_name)
            .field("params", &self.params)
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Final constructor arguments computed by the injector and possibly amended
/// by `before_render` middleware. Ordered for deterministic iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentArgs {
    values: BTreeMap<String, serde_json::Value>,
}

impl ComponentArgs {
    /// Create an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an argument value, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style argument insertion.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.set(name, value);
        self
    }

    /// Get an argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.values.get(name)
    }

    /// Whether an argument is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the argument set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.values.iter()
    }
}

/// Decoration metadata attached to a type at mark time. Stored in the
/// registry's side table, never bolted onto the type itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    /// Free-form tags, e.g. `resource` or `location` markers
    pub tags: BTreeMap<String, serde_json::Value>,
}

impl ComponentMetadata {
    /// Create empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style tag insertion.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.tags.insert(key.into(), value);
        self
    }

    /// Get a tag by key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&serde_json::Value> {
        self.tags.get(key)
    }
}

/// The immutable output produced by invoking a component.
///
/// `post_render` middleware never mutate an output they received; a handler
/// that wants a change clones the value, edits the copy, and returns a new
/// `Arc`. The pipeline threads `Arc<RenderOutput>` so substitution is
/// observable by identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    /// Name of the component that produced this output
    pub component: String,
    /// Rendered body value
    pub body: serde_json::Value,
    /// Output attributes, e.g. markup attributes added by middleware
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl RenderOutput {
    /// Create an output with an empty attribute map.
    #[must_use]
    pub fn new(component: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            component: component.into(),
            body,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute insertion.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Get an attribute by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn button_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::class(
            "Button",
            vec![
                ParamSpec::required("label"),
                ParamSpec::optional("variant", json!("primary")),
            ],
            |args| {
                Ok(RenderOutput::new(
                    "Button",
                    json!({ "label": args.get("label").cloned() }),
                ))
            },
        )
    }

    #[test]
    fn test_descriptor_kind_tagged_at_registration() {
        let class = button_descriptor();
        assert_eq!(class.kind(), ComponentKind::Class);

        let callable = ComponentDescriptor::callable("greeting", vec![], |_| {
            Ok(RenderOutput::new("greeting", json!("hello")))
        });
        assert_eq!(callable.kind(), ComponentKind::Callable);
    }

    #[test]
    fn test_construct_dispatches_through_strategy() {
        let descriptor = button_descriptor();
        let args = ComponentArgs::new().with("label", json!("Save"));

        let output = descriptor.construct(&args).unwrap();
        assert_eq!(output.component, "Button");
        assert_eq!(output.body["label"], json!("Save"));
    }

    #[test]
    fn test_construct_failure_becomes_construction_error() {
        let descriptor = ComponentDescriptor::callable("broken", vec![], |_| {
            Err(ResolverError::construction("broken", "template missing"))
        });

        let error = descriptor.construct(&ComponentArgs::new()).unwrap_err();
        assert!(matches!(error, ResolverError::Construction { .. }));
        assert!(error.to_string().contains("template missing"));
    }

    #[test]
    fn test_args_ordered_iteration() {
        let args = ComponentArgs::new()
            .with("zebra", json!(1))
            .with("alpha", json!(2));

        let names: Vec<&str> = args.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zebra"]);
    }

    #[test]
    fn test_render_output_attribute_builder() {
        let output = RenderOutput::new("Card", json!(null)).with_attribute("role", json!("region"));
        assert_eq!(output.attribute("role"), Some(&json!("region")));
        assert_eq!(output.attribute("missing"), None);
    }

    #[test]
    fn test_metadata_side_table_tags() {
        let metadata = ComponentMetadata::new()
            .with_tag("resource", json!("button.html"))
            .with_tag("location", json!("widgets/"));
        assert_eq!(metadata.tag("resource"), Some(&json!("button.html")));
    }
}

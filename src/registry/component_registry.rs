//! # Component Registry
//!
//! Thread-safe name → descriptor mapping with a decoration-metadata side
//! table.
//!
//! ## Key Features
//!
//! - **Concurrent access**: records live in a `DashMap`, so updates are
//!   atomic per name and readers never observe a partially written record
//! - **Last write wins**: re-registering a name replaces the record wholesale
//! - **Insertion-ordered names**: `all_names()` reports first-registration
//!   order, which suggestion building relies on being deterministic
//! - **Metadata side table**: decoration tags are stored next to, not on,
//!   the type (`metadata()` is inspectable independently of the descriptor)
//!
//! ## Usage
//!
//! ```rust
//! use component_core::registry::ComponentRegistry;
//! use component_core::component::{ComponentDescriptor, RenderOutput};
//! use serde_json::json;
//!
//! let registry = ComponentRegistry::new();
//! registry.register(
//!     "Button",
//!     ComponentDescriptor::class("Button", vec![], |_| {
//!         Ok(RenderOutput::new("Button", json!("<button/>")))
//!     }),
//! );
//!
//! assert!(registry.lookup("Button").is_some());
//! assert!(registry.lookup("button").is_none()); // names are case-sensitive
//! ```

use crate::component::{ComponentDescriptor, ComponentKind, ComponentMetadata};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

/// A stored registration. Immutable once created; superseded, not merged,
/// when the same name is registered again.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    /// Unique, case-sensitive component name
    pub name: String,
    /// Type descriptor with construction strategy
    pub descriptor: ComponentDescriptor,
    /// When this record was stored
    pub registered_at: DateTime<Utc>,
}

/// Registry statistics for introspection and logging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryStats {
    pub total_components: usize,
    pub class_components: usize,
    pub callable_components: usize,
}

/// Concurrent-safe mapping from component name to type descriptor.
///
/// Writes happen during a startup/registration phase in practice, but the
/// contract does not assume single-threaded registration: `register` and
/// `lookup` are safe from any number of threads.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    /// Records keyed by component name
    records: DashMap<String, ComponentRecord>,
    /// Decoration metadata keyed by canonical type name
    metadata: DashMap<String, ComponentMetadata>,
    /// First-registration order of names; guards the new-name decision
    insertion_order: Mutex<Vec<String>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under `name`, overwriting any existing record.
    pub fn register(&self, name: impl Into<String>, descriptor: ComponentDescriptor) {
        let name = name.into();
        let record = ComponentRecord {
            name: name.clone(),
            descriptor,
            registered_at: Utc::now(),
        };

        let mut order = self.insertion_order.lock();
        let previous = self.records.insert(name.clone(), record);
        if previous.is_none() {
            order.push(name.clone());
        }
        drop(order);

        match previous {
            Some(old) => debug!(
                component = %name,
                superseded = %old.descriptor.type_name(),
                "Re-registered component (last write wins)"
            ),
            None => debug!(component = %name, "Registered component"),
        }
    }

    /// Register a component along with its decoration metadata.
    pub fn register_with_metadata(
        &self,
        name: impl Into<String>,
        descriptor: ComponentDescriptor,
        metadata: ComponentMetadata,
    ) {
        let name = name.into();
        self.metadata
            .insert(descriptor.type_name().to_string(), metadata);
        self.register(name, descriptor);
    }

    /// Look up a record by name. Absence is a normal outcome, never an error.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ComponentRecord> {
        self.records.get(name).map(|entry| entry.clone())
    }

    /// Look up just the descriptor by name.
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<ComponentDescriptor> {
        self.records.get(name).map(|entry| entry.descriptor.clone())
    }

    /// Decoration metadata for a canonical type name.
    #[must_use]
    pub fn metadata(&self, type_name: &str) -> Option<ComponentMetadata> {
        self.metadata.get(type_name).map(|entry| entry.clone())
    }

    /// All registered names in first-registration order. Used to build
    /// suggestions for failed lookups.
    #[must_use]
    pub fn all_names(&self) -> Vec<String> {
        self.insertion_order.lock().clone()
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registry statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats::default();
        for entry in &self.records {
            stats.total_components += 1;
            match entry.descriptor.kind() {
                ComponentKind::Class => stats.class_components += 1,
                ComponentKind::Callable => stats.callable_components += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::RenderOutput;
    use serde_json::json;
    use std::sync::Arc;

    fn descriptor(type_name: &str) -> ComponentDescriptor {
        let owned = type_name.to_string();
        ComponentDescriptor::class(type_name, vec![], move |_| {
            Ok(RenderOutput::new(owned.clone(), json!(null)))
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ComponentRegistry::new();
        registry.register("Button", descriptor("Button"));

        let record = registry.lookup("Button").unwrap();
        assert_eq!(record.name, "Button");
        assert_eq!(record.descriptor.type_name(), "Button");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = ComponentRegistry::new();
        registry.register("Button", descriptor("Button"));

        assert!(registry.lookup("button").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let registry = ComponentRegistry::new();
        registry.register("Card", descriptor("CardV1"));
        registry.register("Card", descriptor("CardV2"));

        assert_eq!(registry.len(), 1);
        let record = registry.lookup("Card").unwrap();
        assert_eq!(record.descriptor.type_name(), "CardV2");
    }

    #[test]
    fn test_all_names_first_registration_order() {
        let registry = ComponentRegistry::new();
        registry.register("Zebra", descriptor("Zebra"));
        registry.register("Alpha", descriptor("Alpha"));
        registry.register("Zebra", descriptor("Zebra2"));

        assert_eq!(registry.all_names(), vec!["Zebra", "Alpha"]);
    }

    #[test]
    fn test_metadata_side_table() {
        let registry = ComponentRegistry::new();
        registry.register_with_metadata(
            "Button",
            descriptor("Button"),
            ComponentMetadata::new().with_tag("resource", json!("button.html")),
        );

        let metadata = registry.metadata("Button").unwrap();
        assert_eq!(metadata.tag("resource"), Some(&json!("button.html")));
        assert!(registry.metadata("Unknown").is_none());
    }

    #[test]
    fn test_stats_by_kind() {
        let registry = ComponentRegistry::new();
        registry.register("Button", descriptor("Button"));
        registry.register(
            "greeting",
            ComponentDescriptor::callable("greeting", vec![], |_| {
                Ok(RenderOutput::new("greeting", json!("hi")))
            }),
        );

        let stats = registry.stats();
        assert_eq!(stats.total_components, 2);
        assert_eq!(stats.class_components, 1);
        assert_eq!(stats.callable_components, 1);
    }

    #[test]
    fn test_concurrent_register_and_lookup_no_torn_reads() {
        let registry = Arc::new(ComponentRegistry::new());
        registry.register("Widget", descriptor("Widget0"));

        let mut handles = Vec::new();
        for generation in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for i in 0..250 {
                    let type_name = format!("Widget{}", generation * 1000 + i);
                    let owned = type_name.clone();
                    registry.register(
                        "Widget",
                        ComponentDescriptor::class(type_name, vec![], move |_| {
                            Ok(RenderOutput::new(owned.clone(), json!(null)))
                        }),
                    );
                }
            }));
        }
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    let record = registry.lookup("Widget").expect("record always present");
                    // A torn read would pair the record with a foreign descriptor
                    assert_eq!(record.name, "Widget");
                    assert!(record.descriptor.type_name().starts_with("Widget"));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.all_names(), vec!["Widget"]);
    }
}

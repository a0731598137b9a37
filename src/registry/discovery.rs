//! # Discovery Integration
//!
//! Consumes an external scanner's `(name, type, metadata)` output to
//! populate the name registry.
//!
//! ## Failure policy
//!
//! - A source package that cannot be located at all fails the whole ingestion
//!   atomically: the scan errors first, so nothing from ANY source reaches
//!   the registry.
//! - A single module that fails to load inside an otherwise importable
//!   package is skipped with a recorded warning and scanning continues.
//! - Applying the discovery mark to something that is not a constructible
//!   component fails at mark time ([`DiscoveredComponent::marked`]), not at
//!   scan time, so mistakes surface as early as possible.

use crate::component::{ComponentDescriptor, ComponentMetadata};
use crate::error::{DiscoveryError, SkippedModule};
use crate::registry::ComponentRegistry;
use std::collections::HashMap;
use tracing::{info, warn};

/// Reference to a discovery source package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef(pub String);

impl PackageRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageRef {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A component yielded by a scanner: canonical name, descriptor, and the
/// metadata attached at mark time.
#[derive(Debug, Clone)]
pub struct DiscoveredComponent {
    /// Canonical type name; used as the registry key (no alternate naming)
    pub name: String,
    pub descriptor: ComponentDescriptor,
    pub metadata: ComponentMetadata,
}

impl DiscoveredComponent {
    /// Mark a descriptor for discovery, validating it immediately.
    ///
    /// Rejects non-identifier canonical names and descriptors with duplicate
    /// parameter names; both are registration mistakes that should fail where
    /// the mark is applied rather than during a later scan.
    pub fn marked(
        descriptor: ComponentDescriptor,
        metadata: ComponentMetadata,
    ) -> Result<Self, DiscoveryError> {
        let name = descriptor.type_name().to_string();
        validate_canonical_name(&name)?;

        let mut seen = std::collections::HashSet::new();
        for param in descriptor.params() {
            if !seen.insert(param.name.as_str()) {
                return Err(DiscoveryError::decoration_type(
                    &name,
                    format!("duplicate constructor parameter '{}'", param.name),
                ));
            }
        }

        Ok(Self {
            name,
            descriptor,
            metadata,
        })
    }
}

/// Outcome of scanning one or more packages.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Components discovered across all sources
    pub records: Vec<DiscoveredComponent>,
    /// Modules skipped because they failed to load individually
    pub skipped: Vec<SkippedModule>,
}

/// External enumerator of marked types. This system only consumes its
/// output; package walking itself is an external concern.
pub trait ComponentScanner: Send + Sync {
    /// Scan the given sources.
    ///
    /// Fails fast with [`DiscoveryError::PackageNotFound`] if any source
    /// cannot be located; broken modules inside located packages become
    /// skip entries on the report instead.
    fn scan(&self, sources: &[PackageRef]) -> Result<ScanReport, DiscoveryError>;
}

/// Scan the sources and register everything the scan yielded.
///
/// The scan runs to completion before the first registration, so a failing
/// source leaves the registry untouched (atomic failure). Skipped modules
/// are logged at `warn` and returned on the report.
pub fn ingest_scan(
    registry: &ComponentRegistry,
    scanner: &dyn ComponentScanner,
    sources: &[PackageRef],
) -> Result<ScanReport, DiscoveryError> {
    let report = scanner.scan(sources)?;

    for skipped in &report.skipped {
        warn!(
            module = %skipped.module,
            reason = %skipped.reason,
            "Skipped module during component discovery"
        );
    }

    for record in &report.records {
        registry.register_with_metadata(
            record.name.clone(),
            record.descriptor.clone(),
            record.metadata.clone(),
        );
    }

    info!(
        sources = sources.len(),
        registered = report.records.len(),
        skipped = report.skipped.len(),
        "Component discovery complete"
    );

    Ok(report)
}

#[derive(Debug, Clone, Default)]
struct PackageManifest {
    /// Module path → components it declares
    modules: HashMap<String, Vec<DiscoveredComponent>>,
    /// Module path → load failure reason
    poisoned: HashMap<String, String>,
}

/// In-memory scanner backed by explicit package manifests.
///
/// Useful as the reference [`ComponentScanner`] implementation and in tests:
/// packages are declared up front, and individual modules can be poisoned to
/// exercise the skip-warning path.
#[derive(Debug, Clone, Default)]
pub struct ManifestScanner {
    packages: HashMap<String, PackageManifest>,
}

impl ManifestScanner {
    /// Create a scanner with no packages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a package (possibly with no components yet).
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.packages.entry(package.into()).or_default();
        self
    }

    /// Declare a component inside `package::module`.
    #[must_use]
    pub fn with_component(
        mut self,
        package: impl Into<String>,
        module: impl Into<String>,
        component: DiscoveredComponent,
    ) -> Self {
        self.packages
            .entry(package.into())
            .or_default()
            .modules
            .entry(module.into())
            .or_default()
            .push(component);
        self
    }

    /// Mark a module as failing to load with the given reason.
    #[must_use]
    pub fn with_poisoned_module(
        mut self,
        package: impl Into<String>,
        module: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.packages
            .entry(package.into())
            .or_default()
            .poisoned
            .insert(module.into(), reason.into());
        self
    }
}

impl ComponentScanner for ManifestScanner {
    fn scan(&self, sources: &[PackageRef]) -> Result<ScanReport, DiscoveryError> {
        // Locate every package before yielding anything: fail-fast.
        for source in sources {
            if !self.packages.contains_key(source.name()) {
                return Err(DiscoveryError::package_not_found(source.name()));
            }
        }

        let mut report = ScanReport::default();
        for source in sources {
            let manifest = &self.packages[source.name()];

            for (module, reason) in &manifest.poisoned {
                report.skipped.push(SkippedModule {
                    module: format!("{}.{}", source.name(), module),
                    reason: reason.clone(),
                });
            }

            for (module, components) in &manifest.modules {
                if manifest.poisoned.contains_key(module) {
                    continue;
                }
                report.records.extend(components.iter().cloned());
            }
        }

        Ok(report)
    }
}

fn validate_canonical_name(name: &str) -> Result<(), DiscoveryError> {
    if name.is_empty() {
        return Err(DiscoveryError::decoration_type(
            "<empty>",
            "canonical name is empty",
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | ':'))
    {
        return Err(DiscoveryError::decoration_type(
            name,
            "canonical name contains characters not valid in a type path",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ParamSpec, RenderOutput};
    use serde_json::json;

    fn discovered(name: &str) -> DiscoveredComponent {
        let owned = name.to_string();
        DiscoveredComponent::marked(
            ComponentDescriptor::class(name, vec![], move |_| {
                Ok(RenderOutput::new(owned.clone(), json!(null)))
            }),
            ComponentMetadata::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_mark_rejects_invalid_canonical_name() {
        let result = DiscoveredComponent::marked(
            ComponentDescriptor::class("not a type!", vec![], |_| {
                Ok(RenderOutput::new("x", json!(null)))
            }),
            ComponentMetadata::new(),
        );

        assert!(matches!(
            result,
            Err(DiscoveryError::DecorationType { .. })
        ));
    }

    #[test]
    fn test_mark_rejects_duplicate_params() {
        let result = DiscoveredComponent::marked(
            ComponentDescriptor::class(
                "Button",
                vec![ParamSpec::required("label"), ParamSpec::required("label")],
                |_| Ok(RenderOutput::new("Button", json!(null))),
            ),
            ComponentMetadata::new(),
        );

        let error = result.unwrap_err();
        assert!(error.to_string().contains("duplicate"));
    }

    #[test]
    fn test_ingest_registers_under_canonical_name() {
        let registry = ComponentRegistry::new();
        let scanner = ManifestScanner::new().with_component(
            "widgets",
            "buttons",
            discovered("widgets.Button"),
        );

        let report = ingest_scan(&registry, &scanner, &["widgets".into()]).unwrap();
        assert_eq!(report.records.len(), 1);
        assert!(report.skipped.is_empty());
        assert!(registry.lookup("widgets.Button").is_some());
    }

    #[test]
    fn test_missing_package_registers_nothing() {
        let registry = ComponentRegistry::new();
        let scanner = ManifestScanner::new()
            .with_component("first", "mod", discovered("first.One"))
            .with_component("third", "mod", discovered("third.Three"));

        let sources: Vec<PackageRef> =
            vec!["first".into(), "second_missing".into(), "third".into()];
        let error = ingest_scan(&registry, &scanner, &sources).unwrap_err();

        assert_eq!(
            error,
            DiscoveryError::package_not_found("second_missing")
        );
        // Atomic failure: not even records from the located packages landed
        assert!(registry.is_empty());
    }

    #[test]
    fn test_poisoned_module_is_skipped_not_fatal() {
        let registry = ComponentRegistry::new();
        let scanner = ManifestScanner::new()
            .with_component("widgets", "buttons", discovered("widgets.Button"))
            .with_component("widgets", "cards", discovered("widgets.Card"))
            .with_poisoned_module("widgets", "cards", "syntax error");

        let report = ingest_scan(&registry, &scanner, &["widgets".into()]).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].module, "widgets.cards");
        assert!(registry.lookup("widgets.Button").is_some());
        assert!(registry.lookup("widgets.Card").is_none());
    }

    #[test]
    fn test_empty_source_list_is_a_no_op() {
        let registry = ComponentRegistry::new();
        let scanner = ManifestScanner::new();

        let report = ingest_scan(&registry, &scanner, &[]).unwrap();
        assert!(report.records.is_empty());
        assert!(registry.is_empty());
    }
}

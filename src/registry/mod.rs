//! # Name Registry
//!
//! Concurrent-safe mapping from a unique component name to its type
//! descriptor, plus the discovery integration that populates it.
//!
//! ## Overview
//!
//! The registry is the single source of truth for "which type does this name
//! mean right now". Names are case-sensitive and unique; re-registering a
//! name supersedes the previous record (last write wins). Lookups never
//! error — absence is a normal outcome the caller decides how to react to.
//!
//! ## Architecture
//!
//! ```text
//! Registry
//! ├── ComponentRegistry     (name → ComponentRecord, concurrent map)
//! ├── Metadata side table   (type name → ComponentMetadata)
//! └── Discovery integration (ComponentScanner → ingest_scan, atomic)
//! ```

pub mod component_registry;
pub mod discovery;

pub use component_registry::{ComponentRecord, ComponentRegistry, RegistryStats};
pub use discovery::{
    ingest_scan, DiscoveredComponent, ManifestScanner, PackageRef, ComponentScanner, ScanReport,
};

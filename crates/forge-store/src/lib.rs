//! Storage for Module Forge.
//!
//! [`StorageBackend`] is the boundary the installer calls outward through.
//! [`MemoryBackend`] is the in-memory reference implementation, used by the
//! CLI and throughout the test suites.

pub mod backend;
pub mod error;
pub mod memory;

pub use backend::{ImpactOutcome, ManagedSchema, SchemaChange, StorageBackend};
pub use error::{Error, Result};
pub use memory::{MemoryBackend, MemoryBackendOptions, RecordStore};

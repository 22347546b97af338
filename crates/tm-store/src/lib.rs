//! Collaborators for the Trailmarker encounter engine.
//!
//! [`memory`] keeps everything in process and enforces per-user ownership of
//! saved encounters. [`json`] reads catalogs and character lists from JSON
//! files and stores one file per encounter in a local directory.

/// JSON-file adapters.
pub mod json;
/// In-memory adapters.
pub mod memory;

/// Re-export JSON adapters.
pub use json::{JsonCatalog, JsonCharacters, JsonEncounterStore};
/// Re-export in-memory adapters.
pub use memory::{MemoryCatalog, MemoryCharacters, MemoryEncounterStore};

//! Core types for Trailmarker: creature templates, the catalog, and filtering.
//!
//! Creatures are read-only reference data. Everything that varies during an
//! encounter-building session (quantities, party, derived XP) lives in
//! `tm-encounter`; this crate only describes what a creature *is* and how to
//! narrow a catalog down to the ones a user is looking for.

/// The in-memory creature catalog.
pub mod catalog;
/// Creature templates, identifiers, defenses, and actions.
pub mod creature;
/// Error types used throughout the crate.
pub mod error;
/// Catalog filter criteria and the fluent query builder.
pub mod filter;

/// Re-export the catalog.
pub use catalog::Catalog;
/// Re-export creature types.
pub use creature::{ALL_DAMAGE, Creature, CreatureId};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export filter types.
pub use filter::{CatalogQuery, FilterCriteria, KeywordFilter, MatchMode, filter};

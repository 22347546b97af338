//! Encounter composition and threat assessment for Trailmarker.
//!
//! A GM picks creatures from the catalog into a [`Roster`], describes the
//! party with a [`PartyConfig`], and reads back an [`Assessment`]: the XP
//! budget for the party, the XP the roster is worth, and the threat tier
//! that results. [`EncounterSession`] ties these together with the catalog
//! filter and the external collaborators reached through [`ports`].

/// Derived values and selective recomputation.
pub mod assessment;
/// XP budget per party size.
pub mod budget;
/// Session configuration.
pub mod config;
/// Explicit session credentials.
pub mod context;
/// Threat tiers and classification.
pub mod difficulty;
/// Error types used throughout the crate.
pub mod error;
/// Party size and level.
pub mod party;
/// Async collaborator traits and the shapes exchanged with them.
pub mod ports;
/// Creatures selected for the encounter.
pub mod roster;
/// The encounter-building session.
pub mod session;
/// Earned XP evaluation.
pub mod xp;

/// Re-export assessment types.
pub use assessment::{Assessment, Changes, Derived, assess};
/// Re-export budget types.
pub use budget::{XpBudget, compute_budget};
/// Re-export configuration.
pub use config::EncounterConfig;
/// Re-export context types.
pub use context::{SessionContext, UserIdentity};
/// Re-export difficulty types.
pub use difficulty::{Tier, classify};
/// Re-export error types.
pub use error::{EncounterError, EncounterResult, PortError, PortResult};
/// Re-export party types.
pub use party::{PartyConfig, SavedParty};
/// Re-export port traits and shapes.
pub use ports::{
    CharacterSource, CombatSimulator, CreatureCatalog, EncounterId, EncounterStore,
    SavedCharacter, SavedEncounter, SavedEnemy, SimulationRequest, SimulationSummary,
};
/// Re-export roster types.
pub use roster::{MAX_QUANTITY, Roster, RosterEntry, RosterSelection, Unresolved, UnresolvedReason};
/// Re-export the session.
pub use session::{EncounterSession, LoadReport};
/// Re-export XP types.
pub use xp::{Contribution, XpBreakdown, compute_xp, xp_for_level_delta};

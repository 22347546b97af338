//! Error types for the encounter engine.

use tm_core::{CoreError, CreatureId};

/// Errors that can occur while building or assessing an encounter.
#[derive(Debug, thiserror::Error)]
pub enum EncounterError {
    /// The party must have at least one member.
    #[error("invalid party size: {0} (must be at least 1)")]
    InvalidPartySize(u32),

    /// The creature has no entry in the current roster.
    #[error("creature {0} is not in the encounter")]
    NotInRoster(CreatureId),

    /// The creature is not in the loaded catalog.
    #[error("creature {0} not found in catalog")]
    CreatureNotFound(CreatureId),

    /// "Use saved party" was requested but the character list is empty.
    #[error("no saved characters")]
    NoSavedCharacters,

    /// Simulation needs the party taken from the user's saved characters.
    #[error("simulation needs a saved party, switch to saved characters first")]
    SavedPartyRequired,

    /// Save or simulation was requested with an empty roster.
    #[error("encounter is empty, add some creatures first")]
    EmptyEncounter,

    /// An external collaborator failed.
    #[error(transparent)]
    Port(#[from] PortError),

    /// A catalog error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for encounter operations.
pub type EncounterResult<T> = Result<T, EncounterError>;

/// Errors reported by external collaborators (catalog, store, simulator).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The session context carries no valid credentials.
    #[error("not authenticated")]
    Unauthorized,

    /// The resource belongs to another user.
    #[error("not allowed to {action} {resource}")]
    Forbidden {
        /// What was attempted (e.g. "load").
        action: String,
        /// What it was attempted on (e.g. "encounter").
        resource: String,
    },

    /// The requested resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The collaborator could not be reached or failed internally.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for port calls.
pub type PortResult<T> = Result<T, PortError>;

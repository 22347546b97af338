use crate::creature::CreatureId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or querying a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two templates in the same catalog share an identifier.
    #[error("duplicate creature id: {0}")]
    DuplicateCreature(CreatureId),

    /// The requested creature ID does not exist in the catalog.
    #[error("creature not found: {0}")]
    CreatureNotFound(CreatureId),

    /// A template failed a sanity check (e.g. it has no name).
    #[error("validation error: {0}")]
    Validation(String),
}

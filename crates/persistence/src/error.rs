use domain::ValidationError;
use thiserror::Error;

/// Errors that can occur when interacting with the repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A lookup missed.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A create collided with an already-persisted identity.
    #[error("{entity} already exists: {id}")]
    Conflict { entity: &'static str, id: String },

    /// A transaction or storage failure occurred. The operation's
    /// transaction was rolled back and storage is unchanged; the caller may
    /// retry the whole operation.
    #[error("storage error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Persisted rows no longer satisfy the aggregate's invariants.
    ///
    /// Raised on reads: reconstruction goes through the aggregates'
    /// validating constructors, so corrupted storage fails loudly instead of
    /// silently returning a broken aggregate.
    #[error("stored state failed validation: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

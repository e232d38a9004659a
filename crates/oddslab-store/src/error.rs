//! Error types for oddslab storage.

use oddslab_core::GateError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// User record not found.
    #[error("user not found: {user_id}")]
    UserNotFound {
        /// The user ID that was not found.
        user_id: String,
    },

    /// User record already exists.
    #[error("user already exists: {user_id}")]
    UserAlreadyExists {
        /// The user ID that already exists.
        user_id: String,
    },

    /// A stored value could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<StoreError> for GateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound { user_id } => Self::UserNotFound { user_id },
            other => Self::Store(other.to_string()),
        }
    }
}

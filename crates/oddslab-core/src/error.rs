//! Error types for oddslab gating operations.

/// Result type for gating operations.
pub type Result<T> = std::result::Result<T, GateError>;

/// Errors that can occur in gating and ledger operations.
///
/// Limit exhaustion is never an error: it is an expected, frequent outcome
/// and is communicated through [`crate::AccessDecision::allowed`].
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The user is not known to the user directory.
    #[error("user not found: {user_id}")]
    UserNotFound {
        /// The user ID that was not found.
        user_id: String,
    },

    /// The feature key is not recognized.
    ///
    /// This is a programming error: callers hold a [`crate::Feature`] value
    /// and the only place this can arise is parsing an untrusted string.
    #[error("unknown feature: {name}")]
    InvalidFeature {
        /// The unrecognized feature key.
        name: String,
    },

    /// The persistence store failed.
    ///
    /// Store failures propagate unchanged; no operation in this crate
    /// retries automatically.
    #[error("store error: {0}")]
    Store(String),
}

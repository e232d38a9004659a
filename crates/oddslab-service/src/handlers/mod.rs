//! HTTP request handlers.

pub mod health;
pub mod usage;
pub mod users;

use oddslab_core::{Feature, UserId};

use crate::error::ApiError;

/// Parse a user ID path parameter.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid user ID".into()))
}

/// Parse a feature path parameter.
///
/// Feature keys from clients are validated here, so the core's
/// invalid-feature error stays a programming error.
pub(crate) fn parse_feature(raw: &str) -> Result<Feature, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown feature: {raw}")))
}

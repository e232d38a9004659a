//! User account handlers.
//!
//! Registration and tier changes live here; the gate itself never writes
//! user records.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use oddslab_core::{Tier, UserId};
use oddslab_store::UserAccount;

use crate::error::ApiError;
use crate::state::AppState;

use super::parse_user_id;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Caller-supplied user ID; generated when absent.
    pub user_id: Option<String>,

    /// Initial tier; `free` when absent.
    pub tier: Option<Tier>,
}

/// Register a user.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserAccount>), ApiError> {
    let user_id = match body.user_id {
        Some(raw) => parse_user_id(&raw)?,
        None => UserId::generate(),
    };
    let tier = body.tier.unwrap_or(Tier::Free);

    let account = state.store.create_user(user_id, tier).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Fetch a user record.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserAccount>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Json(state.store.get_user(user_id).await?))
}

/// Request body for a tier change.
#[derive(Debug, Deserialize)]
pub struct SetTierRequest {
    /// The new tier.
    pub tier: Tier,
}

/// Change a user's tier (subscription upgrade/downgrade).
pub async fn set_tier(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<SetTierRequest>,
) -> Result<Json<UserAccount>, ApiError> {
    let user_id = parse_user_id(&user_id)?;

    state.store.set_user_tier(user_id, body.tier).await?;
    Ok(Json(state.store.get_user(user_id).await?))
}

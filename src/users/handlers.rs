use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{jwt::JwtKeys, password, AuthUser},
    error::ApiError,
    state::AppState,
    users::dto::{LoginRequest, LoginResponse, RegisterRequest},
};

const MIN_PASSWORD_LEN: usize = 8;

/// `POST /users`: validate, hash and persist a new account.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;

    if payload.username.is_empty() {
        warn!("registration without a username");
        return Err(ApiError::Validation("missing username".into()));
    }

    if state
        .users
        .find_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Validation("username exists".into()));
    }

    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!(username = %payload.username, "password too short");
        return Err(ApiError::Validation("password too short".into()));
    }

    let hash = password::hash_password(&payload.password)?;
    let user = state.users.create_user(&payload.username, &hash).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(StatusCode::CREATED)
}

/// `POST /users/login`: check credentials and issue a token.
///
/// An unknown username and a wrong password produce the same response,
/// so the endpoint cannot be used to probe which usernames exist.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;

    let user = state
        .users
        .find_user_by_username(&payload.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with a wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).issue(user.id, &user.username)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        token,
        username: user.username,
    }))
}

/// `GET /users/recipes`: ids of every recipe the caller authored.
#[instrument(skip(state))]
pub async fn own_recipes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let ids = state.recipes.recipe_ids_by_author(user.id).await?;
    Ok(Json(ids))
}

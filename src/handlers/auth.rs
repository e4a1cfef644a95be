// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    handlers::friends::{friends_of, pending_requests_for},
    models::user::{CreateUserRequest, LoginRequest, User},
    response,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Principal, sign_jwt},
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created; duplicate usernames yield 409.
pub async fn register(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let result = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (username, password)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(&payload.username)
    .bind(&hashed_password)
    .fetch_one(&pool)
    .await;

    let user_id = result.map_err(|e| {
        // Postgres error code for unique violation is 23505
        if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok(response::created(
        json!({ "id": user_id }),
        "User successfully created",
    ))
}

/// Authenticates a user and returns a JWT token.
///
/// The response data carries everything the front end needs to hydrate:
/// token, profile summary, friends list, and pending friend requests.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user: Option<User> = sqlx::query_as(
        r#"
        SELECT id, username, password, bio, sports, profile_complete,
               img_url, thumb_url, joined
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let user = user.ok_or(AppError::NotFound("User does not exist".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::AuthError("Incorrect password".to_string()));
    }

    let token = sign_jwt(user.id, &config.jwt_secret, config.jwt_expiration)?;

    let friends = friends_of(&pool, user.id).await?;
    let pending_requests = pending_requests_for(&pool, user.id).await?;

    Ok(response::ok(
        json!({
            "token": token,
            "type": "Bearer",
            "id": user.id,
            "username": user.username,
            "profile_complete": user.profile_complete,
            "friends": friends,
            "pending_requests": pending_requests,
        }),
        "Log In Successful",
    ))
}

/// Resolves the bearer token back into a profile summary plus pending
/// requests, for front-end re-authentication on page load.
pub async fn authenticate(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    let profile: Option<(bool, String)> =
        sqlx::query_as("SELECT profile_complete, thumb_url FROM users WHERE id = $1")
            .bind(principal.id)
            .fetch_optional(&pool)
            .await?;

    let (profile_complete, thumb_url) =
        profile.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let friends = friends_of(&pool, principal.id).await?;
    let pending_requests = pending_requests_for(&pool, principal.id).await?;

    Ok(response::ok(
        json!({
            "id": principal.id,
            "username": principal.username,
            "profile_complete": profile_complete,
            "thumb_url": thumb_url,
            "friends": friends,
            "pending_requests": pending_requests,
        }),
        "Authentication successful",
    ))
}

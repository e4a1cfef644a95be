// src/handlers/users.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{PublicProfile, UpdateProfileRequest, UserSummary},
    response,
    utils::{guards, html::clean_html, jwt::Principal},
};

/// Public profile for a user.
pub async fn profile(
    State(pool): State<PgPool>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let profile: Option<PublicProfile> = sqlx::query_as(
        r#"
        SELECT username, bio, joined, sports, img_url, thumb_url
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?;

    let profile = profile.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(response::ok(profile, "Public profile"))
}

/// Update the principal's own profile (bio, sports, image URL).
/// A completed update flips profile_complete.
pub async fn update_profile(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    guards::ensure_self(&principal, user_id)?;

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let bio = clean_html(&payload.bio);
    let sports: Vec<String> = payload.sports.iter().map(|s| clean_html(s)).collect();

    sqlx::query(
        r#"
        UPDATE users
        SET bio = $1, sports = $2, img_url = $3, profile_complete = TRUE
        WHERE id = $4
        "#,
    )
    .bind(&bio)
    .bind(&sports)
    .bind(&payload.img_url)
    .bind(user_id)
    .execute(&pool)
    .await?;

    Ok(response::ok((), "Profile successfully updated"))
}

/// Directory of all registered users, username-sorted.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users: Vec<UserSummary> =
        sqlx::query_as("SELECT id, username, thumb_url FROM users ORDER BY username ASC")
            .fetch_all(&pool)
            .await?;

    Ok(response::ok(users, "All registered users"))
}

/// The six most recently joined users.
pub async fn latest_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users: Vec<UserSummary> =
        sqlx::query_as("SELECT id, username, thumb_url FROM users ORDER BY joined DESC LIMIT 6")
            .fetch_all(&pool)
            .await?;

    Ok(response::ok(users, "Most recently joined users"))
}

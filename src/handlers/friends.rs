// src/handlers/friends.rs

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::friend_request::{FriendEdge, PendingRequestResponse, STATUS_ACCEPTED, STATUS_PENDING},
    response,
    utils::{guards, jwt::Principal},
};

/// Create a friend request from the principal to the path-addressed user.
///
/// Conflicts if a pending request already exists between the pair in either
/// direction, or if the two users are already friends.
pub async fn create_request(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if user_id == principal.id {
        return Err(AppError::BadRequest(
            "You cannot send a friend request to yourself".to_string(),
        ));
    }

    let requestee: Option<(i64, String)> =
        sqlx::query_as("SELECT id, username FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&pool)
            .await?;

    let (requestee_id, requestee_name) =
        requestee.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // The unordered-pair invariant: a pending request in either direction
    // blocks creation.
    let pending_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM friend_requests
            WHERE status = $1
              AND ((requester_id = $2 AND requestee_id = $3)
                OR (requester_id = $3 AND requestee_id = $2))
        )
        "#,
    )
    .bind(STATUS_PENDING)
    .bind(principal.id)
    .bind(requestee_id)
    .fetch_one(&pool)
    .await?;

    if pending_exists {
        return Err(AppError::Conflict(
            "A pending friend request already exists between these users".to_string(),
        ));
    }

    let already_friends: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM friends WHERE user_id = $1 AND friend_id = $2)",
    )
    .bind(principal.id)
    .bind(requestee_id)
    .fetch_one(&pool)
    .await?;

    if already_friends {
        return Err(AppError::Conflict("Users are already friends".to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO friend_requests
            (requester_id, requester_name, requestee_id, requestee_name, sent, status)
        VALUES ($1, $2, $3, $4, NOW(), $5)
        "#,
    )
    .bind(principal.id)
    .bind(&principal.username)
    .bind(requestee_id)
    .bind(&requestee_name)
    .bind(STATUS_PENDING)
    .execute(&pool)
    .await?;

    Ok(response::created((), "Friend request created"))
}

/// Accept a pending friend request.
///
/// Only the requestee may respond. The two edge rows and the status update
/// are committed in one transaction so the symmetric-edge invariant cannot
/// be observed half-applied.
pub async fn accept_request(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let request: Option<(i64, i64)> = sqlx::query_as(
        "SELECT requester_id, requestee_id FROM friend_requests WHERE id = $1 AND status = $2",
    )
    .bind(request_id)
    .bind(STATUS_PENDING)
    .fetch_optional(&pool)
    .await?;

    let (requester_id, requestee_id) =
        request.ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;

    guards::ensure_request_recipient(&principal, requestee_id)?;

    // The requester may have vanished since sending the request.
    let requester: Option<(i64, String)> =
        sqlx::query_as("SELECT id, username FROM users WHERE id = $1")
            .bind(requester_id)
            .fetch_optional(&pool)
            .await?;

    let (requester_id, requester_name) = requester
        .ok_or_else(|| AppError::NotFound("Friend requester no longer exists".to_string()))?;

    let since = Utc::now();

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO friends (user_id, friend_id, friend_name, since) VALUES ($1, $2, $3, $4)")
        .bind(requester_id)
        .bind(principal.id)
        .bind(&principal.username)
        .bind(since)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO friends (user_id, friend_id, friend_name, since) VALUES ($1, $2, $3, $4)")
        .bind(principal.id)
        .bind(requester_id)
        .bind(&requester_name)
        .bind(since)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE friend_requests SET status = $1 WHERE id = $2")
        .bind(STATUS_ACCEPTED)
        .bind(request_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(response::ok((), "Friend request accepted"))
}

/// Decline a pending friend request.
///
/// Declining deletes the row outright; no "declined" state is retained, so a
/// fresh request between the same pair is allowed afterwards.
pub async fn decline_request(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let request: Option<(i64,)> = sqlx::query_as(
        "SELECT requestee_id FROM friend_requests WHERE id = $1 AND status = $2",
    )
    .bind(request_id)
    .bind(STATUS_PENDING)
    .fetch_optional(&pool)
    .await?;

    let (requestee_id,) =
        request.ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;

    guards::ensure_request_recipient(&principal, requestee_id)?;

    sqlx::query("DELETE FROM friend_requests WHERE id = $1")
        .bind(request_id)
        .execute(&pool)
        .await?;

    Ok(response::ok((), "Friend request declined and deleted"))
}

/// List a user's friends, sorted by denormalized friend name for display.
pub async fn list_friends(
    State(pool): State<PgPool>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&pool)
            .await?;

    if !user_exists {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let friends = friends_of(&pool, user_id).await?;

    Ok(response::ok(friends, "Friends list"))
}

/// List the principal's pending friend requests, joined with each
/// requester's profile summary.
pub async fn list_pending(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    let pending = pending_requests_for(&pool, principal.id).await?;

    Ok(response::ok(pending, "Pending friend requests"))
}

/// The principal's friends ordered by `since` descending, for the
/// "recently befriended" view.
pub async fn list_recent(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    let recent: Vec<FriendEdge> = sqlx::query_as(
        r#"
        SELECT friend_id, friend_name, since
        FROM friends
        WHERE user_id = $1
        ORDER BY since DESC
        LIMIT 10
        "#,
    )
    .bind(principal.id)
    .fetch_all(&pool)
    .await?;

    Ok(response::ok(recent, "Recently added friends"))
}

/// Friendship edges for one user, name-sorted. Shared with the auth handlers
/// which include the friends list in login/authenticate payloads.
pub(crate) async fn friends_of(pool: &PgPool, user_id: i64) -> Result<Vec<FriendEdge>, AppError> {
    let friends = sqlx::query_as(
        r#"
        SELECT friend_id, friend_name, since
        FROM friends
        WHERE user_id = $1
        ORDER BY friend_name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(friends)
}

/// Pending requests addressed to `user_id`, newest first.
pub(crate) async fn pending_requests_for(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<PendingRequestResponse>, AppError> {
    let pending = sqlx::query_as(
        r#"
        SELECT fr.id, fr.requester_id, fr.requester_name,
               u.thumb_url AS requester_thumb_url, fr.sent
        FROM friend_requests fr
        JOIN users u ON u.id = fr.requester_id
        WHERE fr.requestee_id = $1 AND fr.status = $2
        ORDER BY fr.sent DESC
        "#,
    )
    .bind(user_id)
    .bind(STATUS_PENDING)
    .fetch_all(pool)
    .await?;

    Ok(pending)
}

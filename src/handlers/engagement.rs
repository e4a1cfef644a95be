// src/handlers/engagement.rs

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{error::AppError, response, utils::jwt::Principal};

/// Which entity a like is recorded against. Likes are set-membership rows
/// keyed (target, user); counts are always derived, never stored.
///
/// A comment target carries its parent session id so a like through a
/// mismatched `/sessions/{id}/comments/{cid}` path is rejected, matching the
/// comment-delete predicate.
#[derive(Clone, Copy)]
enum LikeTarget {
    Session(i64),
    Comment { session_id: i64, comment_id: i64 },
}

impl LikeTarget {
    fn id(self) -> i64 {
        match self {
            LikeTarget::Session(session_id) => session_id,
            LikeTarget::Comment { comment_id, .. } => comment_id,
        }
    }

    fn like_table(self) -> &'static str {
        match self {
            LikeTarget::Session(_) => "session_likes",
            LikeTarget::Comment { .. } => "comment_likes",
        }
    }

    fn key_column(self) -> &'static str {
        match self {
            LikeTarget::Session(_) => "session_id",
            LikeTarget::Comment { .. } => "comment_id",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LikeTarget::Session(_) => "Session",
            LikeTarget::Comment { .. } => "Comment",
        }
    }
}

async fn target_exists(pool: &PgPool, target: LikeTarget) -> Result<bool, AppError> {
    let exists: bool = match target {
        LikeTarget::Session(session_id) => {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = $1)")
                .bind(session_id)
                .fetch_one(pool)
                .await?
        }
        LikeTarget::Comment {
            session_id,
            comment_id,
        } => {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1 AND session_id = $2)",
            )
            .bind(comment_id)
            .bind(session_id)
            .fetch_one(pool)
            .await?
        }
    };

    Ok(exists)
}

/// Append `user_id` to the target's like set.
///
/// The insert is conditioned on absence at the storage layer (primary key +
/// ON CONFLICT DO NOTHING), so two concurrent likes from the same user
/// cannot both succeed; the loser sees zero rows affected and gets 409.
async fn add_like(pool: &PgPool, target: LikeTarget, user_id: i64) -> Result<(), AppError> {
    if !target_exists(pool, target).await? {
        return Err(AppError::NotFound(format!("{} not found", target.label())));
    }

    let result = sqlx::query(&format!(
        "INSERT INTO {} ({}, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        target.like_table(),
        target.key_column()
    ))
    .bind(target.id())
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict(format!(
            "User already likes this {}",
            target.label().to_lowercase()
        )));
    }

    Ok(())
}

/// Remove `user_id` from the target's like set. Idempotent: removing an
/// absent like is a no-op, not an error.
async fn remove_like(pool: &PgPool, target: LikeTarget, user_id: i64) -> Result<(), AppError> {
    if !target_exists(pool, target).await? {
        return Err(AppError::NotFound(format!("{} not found", target.label())));
    }

    sqlx::query(&format!(
        "DELETE FROM {} WHERE {} = $1 AND user_id = $2",
        target.like_table(),
        target.key_column()
    ))
    .bind(target.id())
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn like_session(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    add_like(&pool, LikeTarget::Session(session_id), principal.id).await?;
    Ok(response::created((), "Session successfully liked"))
}

pub async fn unlike_session(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    remove_like(&pool, LikeTarget::Session(session_id), principal.id).await?;
    Ok(response::ok((), "Session successfully un-liked"))
}

pub async fn like_comment(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path((session_id, comment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let target = LikeTarget::Comment {
        session_id,
        comment_id,
    };
    add_like(&pool, target, principal.id).await?;
    Ok(response::created((), "Comment successfully liked"))
}

pub async fn unlike_comment(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path((session_id, comment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let target = LikeTarget::Comment {
        session_id,
        comment_id,
    };
    remove_like(&pool, target, principal.id).await?;
    Ok(response::ok((), "Comment successfully un-liked"))
}

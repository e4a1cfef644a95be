// src/handlers/comments.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::{CommentResponse, CreateCommentRequest},
    response,
    utils::{guards, html::clean_html, jwt::Principal},
};

/// Create a new comment on a session.
pub async fn create_comment(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(session_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let session_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = $1)")
            .bind(session_id)
            .fetch_one(&pool)
            .await?;

    if !session_exists {
        return Err(AppError::NotFound("Session not found".to_string()));
    }

    let text = clean_html(&payload.text);

    let comment_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO comments (session_id, user_id, username, text)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(session_id)
    .bind(principal.id)
    .bind(&principal.username)
    .bind(&text)
    .fetch_one(&pool)
    .await?;

    Ok(response::created(
        json!({ "id": comment_id }),
        "Comment successfully created",
    ))
}

/// List all comments for a session, oldest first, with viewer-relative
/// like annotations. The raw like set stays server-side.
pub async fn list_comments(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let session_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = $1)")
            .bind(session_id)
            .fetch_one(&pool)
            .await?;

    if !session_exists {
        return Err(AppError::NotFound("Session not found".to_string()));
    }

    let comments: Vec<CommentResponse> = sqlx::query_as(
        r#"
        SELECT c.id, c.session_id, c.user_id, c.username, c.text,
               c.created_date, c.edited_date,
               EXISTS(SELECT 1 FROM comment_likes cl
                      WHERE cl.comment_id = c.id AND cl.user_id = $2) AS has_liked,
               (SELECT COUNT(*) FROM comment_likes cl
                WHERE cl.comment_id = c.id) AS likes_count
        FROM comments c
        WHERE c.session_id = $1
        ORDER BY c.created_date ASC
        "#,
    )
    .bind(session_id)
    .bind(principal.id)
    .fetch_all(&pool)
    .await?;

    Ok(response::ok(comments, "All comments for session"))
}

/// Delete a comment. Author only.
pub async fn delete_comment(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path((session_id, comment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let author: Option<(i64,)> =
        sqlx::query_as("SELECT user_id FROM comments WHERE id = $1 AND session_id = $2")
            .bind(comment_id)
            .bind(session_id)
            .fetch_optional(&pool)
            .await?;

    let (author_id,) = author.ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    guards::ensure_comment_owner(&principal, author_id)?;

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(&pool)
        .await?;

    Ok(response::ok((), "Comment successfully deleted"))
}

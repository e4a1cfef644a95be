// src/handlers/feed.rs

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::session::{FeedItem, SessionOverview},
    response,
    utils::{guards, jwt::Principal},
};

/// Friends activity feed: for each friend of the viewer, their most recent
/// session by activity date, annotated with viewer-relative engagement.
///
/// Fan-out is bounded by the friend count; DISTINCT ON picks the latest
/// session per friend in one pass. Friends with no sessions are omitted.
/// Heavy fields (description, equipment, conditions, created date) are
/// stripped from the feed card.
pub async fn feed(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    guards::ensure_self(&principal, user_id)?;

    let items: Vec<FeedItem> = sqlx::query_as(
        r#"
        SELECT latest.* FROM (
            SELECT DISTINCT ON (s.user_id)
                   s.id, s.user_id, s.username, u.thumb_url,
                   s.sport, s.location_name, s.coords, s.activity_date,
                   EXISTS(SELECT 1 FROM session_likes sl
                          WHERE sl.session_id = s.id AND sl.user_id = $1) AS has_liked,
                   (SELECT COUNT(*) FROM session_likes sl
                    WHERE sl.session_id = s.id) AS likes_count,
                   (SELECT COUNT(*) FROM comments c
                    WHERE c.session_id = s.id) AS comments_count
            FROM friends f
            JOIN sessions s ON s.user_id = f.friend_id
            JOIN users u ON u.id = f.friend_id
            WHERE f.user_id = $1
            ORDER BY s.user_id, s.activity_date DESC
        ) latest
        ORDER BY latest.activity_date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(response::ok(items, "Latest sessions of friends"))
}

/// Session overviews for one user, newest activity first, annotated with the
/// viewer's engagement state. Description, equipment, and created date are
/// stripped; conditions and coords stay.
pub async fn overviews(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
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

    let sessions: Vec<SessionOverview> = sqlx::query_as(
        r#"
        SELECT s.id, s.user_id, s.username, s.sport, s.location_name,
               s.coords, s.conditions, s.activity_date,
               EXISTS(SELECT 1 FROM session_likes sl
                      WHERE sl.session_id = s.id AND sl.user_id = $2) AS has_liked,
               (SELECT COUNT(*) FROM session_likes sl
                WHERE sl.session_id = s.id) AS likes_count,
               (SELECT COUNT(*) FROM comments c
                WHERE c.session_id = s.id) AS comments_count
        FROM sessions s
        WHERE s.user_id = $1
        ORDER BY s.activity_date DESC
        "#,
    )
    .bind(user_id)
    .bind(principal.id)
    .fetch_all(&pool)
    .await?;

    Ok(response::ok(sessions, "Sessions overview"))
}

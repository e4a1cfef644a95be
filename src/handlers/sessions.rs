// src/handlers/sessions.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use sqlx::types::Json as Jsonb;
use validator::Validate;

use crate::{
    error::AppError,
    models::session::{CreateSessionRequest, Equipment, SessionDetail},
    response,
    utils::{guards, html::clean_html, jwt::Principal},
};

/// Keep only the equipment fields relevant to the sport: a surfing session
/// carries no kite even if the client sent one.
fn relevant_equipment(sport: &str, equipment: Option<Equipment>) -> Option<Equipment> {
    let equipment = equipment?;

    let kept = match sport {
        "surfing" | "paddleboarding" => Equipment {
            board: equipment.board,
            ..Equipment::default()
        },
        "windsurfing" => Equipment {
            board: equipment.board,
            sail: equipment.sail,
            ..Equipment::default()
        },
        "kitesurfing" => Equipment {
            board: equipment.board,
            kite: equipment.kite,
            ..Equipment::default()
        },
        "wingsurfing" => Equipment {
            board: equipment.board,
            wing: equipment.wing,
            ..Equipment::default()
        },
        _ => equipment,
    };

    Some(kept)
}

/// Create a new session authored by the principal.
pub async fn create_session(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let description = payload.description.as_deref().map(clean_html);
    let equipment = relevant_equipment(&payload.sport, payload.equipment);

    let session_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO sessions
            (user_id, username, description, sport, location_name, coords,
             equipment, conditions, activity_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(principal.id)
    .bind(&principal.username)
    .bind(&description)
    .bind(&payload.sport)
    .bind(&payload.location.name)
    .bind(&payload.location.coords)
    .bind(equipment.map(Jsonb))
    .bind(payload.conditions.map(Jsonb))
    .bind(payload.date)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create session: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(response::created(json!({ "id": session_id }), "Session created"))
}

/// Update a session. Author only.
pub async fn update_session(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(session_id): Path<i64>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let author: Option<(i64,)> = sqlx::query_as("SELECT user_id FROM sessions WHERE id = $1")
        .bind(session_id)
        .fetch_optional(&pool)
        .await?;

    let (author_id,) = author.ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    guards::ensure_session_owner(&principal, author_id)?;

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let description = payload.description.as_deref().map(clean_html);
    let equipment = relevant_equipment(&payload.sport, payload.equipment);

    sqlx::query(
        r#"
        UPDATE sessions
        SET description = $1, sport = $2, location_name = $3, coords = $4,
            equipment = $5, conditions = $6, activity_date = $7
        WHERE id = $8
        "#,
    )
    .bind(&description)
    .bind(&payload.sport)
    .bind(&payload.location.name)
    .bind(&payload.location.coords)
    .bind(equipment.map(Jsonb))
    .bind(payload.conditions.map(Jsonb))
    .bind(payload.date)
    .bind(session_id)
    .execute(&pool)
    .await?;

    Ok(response::ok((), "Session updated"))
}

/// Delete a session. Author only. Likes and comments cascade.
pub async fn delete_session(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let author: Option<(i64,)> = sqlx::query_as("SELECT user_id FROM sessions WHERE id = $1")
        .bind(session_id)
        .fetch_optional(&pool)
        .await?;

    let (author_id,) = author.ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    guards::ensure_session_owner(&principal, author_id)?;

    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(session_id)
        .execute(&pool)
        .await?;

    Ok(response::ok((), "Session successfully deleted"))
}

/// Full detail for one session: author summary plus viewer-relative
/// engagement annotations. The raw like set is never returned.
pub async fn session_detail(
    State(pool): State<PgPool>,
    Extension(principal): Extension<Principal>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let detail: Option<SessionDetail> = sqlx::query_as(
        r#"
        SELECT s.id, s.user_id, s.username, u.thumb_url AS author_thumb_url,
               s.description, s.sport, s.location_name, s.coords,
               s.equipment, s.conditions, s.created_date, s.activity_date,
               EXISTS(SELECT 1 FROM session_likes sl
                      WHERE sl.session_id = s.id AND sl.user_id = $2) AS has_liked,
               (SELECT COUNT(*) FROM session_likes sl
                WHERE sl.session_id = s.id) AS likes_count,
               (SELECT COUNT(*) FROM comments c
                WHERE c.session_id = s.id) AS comments_count
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.id = $1
        "#,
    )
    .bind(session_id)
    .bind(principal.id)
    .fetch_optional(&pool)
    .await?;

    let detail = detail.ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    Ok(response::ok(detail, "Session detail"))
}

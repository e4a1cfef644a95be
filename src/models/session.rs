// src/models/session.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use validator::Validate;

// Sessions are read through purpose-built projections (detail, feed card,
// overview); the like set lives in `session_likes` and counts are derived at
// read time.

/// Sport-dependent equipment description. Only the fields relevant to the
/// session's sport are persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Equipment {
    #[validate(length(max = 40, message = "Board description must be 40 characters max"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,

    #[validate(length(max = 40, message = "Sail description must be 40 characters max"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sail: Option<String>,

    #[validate(length(max = 40, message = "Kite description must be 40 characters max"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kite: Option<String>,

    #[validate(length(max = 40, message = "Wing description must be 40 characters max"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wing: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Wind {
    #[validate(range(min = 0.0, max = 360.0))]
    pub direction: f64,
    #[validate(range(min = 0.0, max = 200.0))]
    pub speed: f64,
    #[validate(range(min = 0.0, max = 200.0))]
    pub gust: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Swell {
    #[validate(range(min = 0.0, max = 360.0))]
    pub direction: f64,
    #[validate(range(min = 0.0, max = 50.0))]
    pub height: f64,
    #[validate(range(min = 0.0, max = 50.0))]
    pub frequency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Conditions {
    #[validate(nested)]
    pub wind: Wind,
    #[validate(nested)]
    pub swell: Swell,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LocationInput {
    #[validate(length(
        min = 3,
        max = 30,
        message = "Location name must be between 3 and 30 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 2,
        max = 2,
        message = "Coordinates must be an array of length 2"
    ))]
    pub coords: Vec<f64>,
}

/// DTO for creating or updating a session.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    pub date: chrono::DateTime<chrono::Utc>,

    #[validate(length(min = 1, max = 20, message = "Sport required"))]
    pub sport: String,

    #[validate(nested)]
    pub location: LocationInput,

    #[validate(length(
        max = 2500,
        message = "Session description must be less than 2500 characters"
    ))]
    pub description: Option<String>,

    #[validate(nested)]
    pub equipment: Option<Equipment>,

    #[validate(nested)]
    pub conditions: Option<Conditions>,
}

/// Full session payload for the detail endpoint. The raw like list is never
/// exposed; only its cardinality and the viewer's membership.
#[derive(Debug, Serialize, FromRow)]
pub struct SessionDetail {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub author_thumb_url: String,
    pub description: Option<String>,
    pub sport: String,
    pub location_name: String,
    pub coords: Vec<f64>,
    pub equipment: Option<Json<Equipment>>,
    pub conditions: Option<Json<Conditions>>,
    pub created_date: chrono::DateTime<chrono::Utc>,
    pub activity_date: chrono::DateTime<chrono::Utc>,
    pub has_liked: bool,
    pub likes_count: i64,
    pub comments_count: i64,
}

/// Feed card: one friend's most recent session, heavy fields stripped.
#[derive(Debug, Serialize, FromRow)]
pub struct FeedItem {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub thumb_url: String,
    pub sport: String,
    pub location_name: String,
    pub coords: Vec<f64>,
    pub activity_date: chrono::DateTime<chrono::Utc>,
    pub has_liked: bool,
    pub likes_count: i64,
    pub comments_count: i64,
}

/// Session overview row for a user's own session list.
#[derive(Debug, Serialize, FromRow)]
pub struct SessionOverview {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub sport: String,
    pub location_name: String,
    pub coords: Vec<f64>,
    pub conditions: Option<Json<Conditions>>,
    pub activity_date: chrono::DateTime<chrono::Utc>,
    pub has_liked: bool,
    pub likes_count: i64,
    pub comments_count: i64,
}

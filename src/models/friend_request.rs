// src/models/friend_request.rs

use serde::Serialize;
use sqlx::FromRow;

/// Friend request lifecycle: created 'pending', either accepted (terminal,
/// reflected as two edge rows in `friends`) or deleted outright on decline.
/// Requester and requestee names are denormalized at creation time.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";

/// A pending request as shown to its recipient, joined with the requester's
/// profile summary.
#[derive(Debug, Serialize, FromRow)]
pub struct PendingRequestResponse {
    pub id: i64,
    pub requester_id: i64,
    pub requester_name: String,
    pub requester_thumb_url: String,
    pub sent: chrono::DateTime<chrono::Utc>,
}

/// One direction of a friendship edge, as stored on a user's side.
#[derive(Debug, Serialize, FromRow)]
pub struct FriendEdge {
    pub friend_id: i64,
    pub friend_name: String,
    pub since: chrono::DateTime<chrono::Utc>,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 1500,
        message = "Comment must be between 1 and 1500 characters"
    ))]
    pub text: String,
}

/// DTO for displaying a comment with viewer-relative engagement state.
#[derive(Debug, Serialize, FromRow)]
pub struct CommentResponse {
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub created_date: chrono::DateTime<chrono::Utc>,
    pub edited_date: Option<chrono::DateTime<chrono::Utc>>,
    pub has_liked: bool,
    pub likes_count: i64,
}

// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username, immutable after registration.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub bio: String,

    /// Sports the user tags themselves with (e.g. "surfing").
    pub sports: Vec<String>,

    pub profile_complete: bool,

    pub img_url: String,
    pub thumb_url: String,

    pub joined: chrono::DateTime<chrono::Utc>,
}

/// Lightweight user row for directory listings and request joins.
#[derive(Debug, Serialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub thumb_url: String,
}

/// Public profile payload (no id-internal fields beyond what the UI shows).
#[derive(Debug, Serialize, FromRow)]
pub struct PublicProfile {
    pub username: String,
    pub bio: String,
    pub joined: chrono::DateTime<chrono::Utc>,
    pub sports: Vec<String>,
    pub img_url: String,
    pub thumb_url: String,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 20,
        message = "Username length must be between 3 and 20 characters."
    ))]
    pub username: String,

    #[validate(
        length(max = 50, message = "Password must be a maximum of 50 characters."),
        custom(function = "strong_password")
    )]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for updating the public profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: String,

    pub sports: Vec<String>,

    #[validate(length(max = 1000, message = "Image URL must be at most 1000 characters"))]
    pub img_url: String,
}

/// Password strength policy: at least 8 characters with one lowercase, one
/// uppercase, one digit, and one symbol.
fn strong_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if long_enough && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password").with_message(
            "Password must be at least 8 characters with a lowercase letter, \
             an uppercase letter, a number, and a symbol"
                .into(),
        ))
    }
}

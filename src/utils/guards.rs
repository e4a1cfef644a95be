// src/utils/guards.rs

use crate::{error::AppError, utils::jwt::Principal};

/// Ownership and identity-match predicates, evaluated before any mutation.
///
/// Taxonomy: every failure here is 403 Forbidden. 401 is reserved for the
/// identity resolver (missing or invalid credential).

/// The principal must be the path-addressed user.
pub fn ensure_self(principal: &Principal, user_id: i64) -> Result<(), AppError> {
    if principal.id != user_id {
        return Err(AppError::Forbidden(
            "You are not authorised to access this resource".to_string(),
        ));
    }
    Ok(())
}

/// The principal must be the session's author.
pub fn ensure_session_owner(principal: &Principal, author_id: i64) -> Result<(), AppError> {
    if principal.id != author_id {
        return Err(AppError::Forbidden(
            "You are not authorised to modify this session".to_string(),
        ));
    }
    Ok(())
}

/// The principal must be the comment's author.
pub fn ensure_comment_owner(principal: &Principal, author_id: i64) -> Result<(), AppError> {
    if principal.id != author_id {
        return Err(AppError::Forbidden(
            "You are not authorised to modify this comment".to_string(),
        ));
    }
    Ok(())
}

/// Only the requestee may respond to a friend request.
pub fn ensure_request_recipient(principal: &Principal, requestee_id: i64) -> Result<(), AppError> {
    if principal.id != requestee_id {
        return Err(AppError::Forbidden(
            "You are not authorised to respond to this friend request".to_string(),
        ));
    }
    Ok(())
}

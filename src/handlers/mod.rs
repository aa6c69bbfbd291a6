pub mod auth;
pub mod feed;
pub mod users;

use crate::error::ApiError;

/// Pull a required string field out of a request body. Blank-after-trim
/// counts as missing; the value itself is passed through unchanged.
pub(crate) fn require_field(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(message)),
    }
}

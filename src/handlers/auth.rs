use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::require_field;
use crate::database::users;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /login - Authenticate a user against the stored credentials.
///
/// Unknown email and wrong password produce the same response on purpose so
/// the endpoint cannot be used to enumerate accounts. Both are a 200 with
/// success=false, matching what the client expects.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = require_field(payload.email, "Email and password are required.")?;
    let password = require_field(payload.password, "Email and password are required.")?;

    let stored = users::stored_password(&state.pool, &email).await?;

    if credentials_match(stored.as_deref(), &password) {
        tracing::info!("login succeeded for {}", email);
        Ok(Json(json!({ "success": true, "message": "Login successful." })))
    } else {
        Ok(Json(json!({ "success": false, "message": "Invalid credentials." })))
    }
}

/// Exact string equality against the stored plaintext password, preserved
/// from the system this replaces. A missing row and a wrong password are the
/// same answer.
fn credentials_match(stored: Option<&str>, supplied: &str) -> bool {
    matches!(stored, Some(s) if s == supplied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_the_only_success() {
        assert!(credentials_match(Some("pw-secret"), "pw-secret"));
        assert!(!credentials_match(Some("pw-secret"), "pw-Secret"));
        assert!(!credentials_match(Some("pw-secret"), "pw-secret "));
        assert!(!credentials_match(Some("pw-secret"), ""));
    }

    #[test]
    fn missing_row_is_indistinguishable_from_wrong_password() {
        assert_eq!(
            credentials_match(None, "pw-secret"),
            credentials_match(Some("other"), "pw-secret")
        );
    }

    #[test]
    fn empty_stored_password_only_matches_empty() {
        assert!(credentials_match(Some(""), ""));
        assert!(!credentials_match(Some(""), "x"));
    }
}

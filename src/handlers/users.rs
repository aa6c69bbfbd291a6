//! Account CRUD endpoints.
//!
//! Every mutation runs its statements inside a transaction: commit on the
//! success path, rollback (via drop) on any error path before the response
//! is produced. Email uniqueness is checked by a read before the write; the
//! two are not atomic, so racing writers remain possible.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::require_field;
use crate::database::users::{self, NewUser, UserChanges, UserRow, MASKED_PASSWORD};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub email: Option<String>,
}

/// GET /get_user_details?email= - single-record projection by email
pub async fn get_user_details(
    State(state): State<AppState>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<Value>, ApiError> {
    let email = require_field(query.email, "Email query parameter is required.")?;

    let user = users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(json!({
        "username": user.display_name(),
        "is_admin": user.is_admin,
    })))
}

/// Listing projection: everything except the real password.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    #[serde(rename = "accountType")]
    pub account_type: &'static str,
    #[serde(rename = "agencyName")]
    pub agency_name: String,
    pub email: String,
    pub name: String,
    pub password: &'static str,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            account_type: row.account_type(),
            agency_name: row.agency_or_default().to_string(),
            name: row.display_name().to_string(),
            id: row.id,
            email: row.email,
            password: MASKED_PASSWORD,
        }
    }
}

/// GET /get_all_users - full listing, id ascending, passwords masked
pub async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let rows = users::list_all(&state.pool).await?;
    Ok(Json(rows.into_iter().map(UserSummary::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub agency_name: Option<String>,
    pub is_admin: Option<bool>,
}

/// POST /add_user - create an account after the email uniqueness pre-check
pub async fn add_user(
    State(state): State<AppState>,
    Json(payload): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = NewUser {
        email: require_field(payload.email, "Email is required.")?,
        password: require_field(payload.password, "Password is required.")?,
        username: require_field(payload.username, "Username is required.")?,
        agency_name: require_field(payload.agency_name, "Agency name is required.")?,
        is_admin: payload.is_admin.unwrap_or(false),
    };

    if users::email_in_use(&state.pool, &user.email).await? {
        return Err(ApiError::conflict("An account with this email already exists."));
    }

    let mut tx = state.pool.begin().await?;
    users::insert(&mut tx, &user).await?;
    tx.commit().await?;

    tracing::info!("created account for {}", user.email);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Account created successfully." })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub agency_name: Option<String>,
    pub password: Option<String>,
}

/// PUT /update_user/:id - mutate account fields; the masked placeholder (or
/// an absent/empty password) leaves the stored password untouched
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let changes = UserChanges {
        email: require_field(payload.email, "Email is required.")?,
        username: require_field(payload.username, "Username is required.")?,
        agency_name: require_field(payload.agency_name, "Agency name is required.")?,
        password: payload.password,
    };

    if users::email_used_by_other(&state.pool, &changes.email, id).await? {
        return Err(ApiError::conflict("This email is used by another account."));
    }

    let mut tx = state.pool.begin().await?;
    let affected = users::update(&mut tx, id, &changes).await?;
    if affected == 0 {
        // Dropping the transaction rolls it back
        return Err(ApiError::not_found("User not found."));
    }
    tx.commit().await?;

    Ok(Json(json!({ "success": true, "message": "Account updated successfully." })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteUsersRequest {
    pub ids: Option<Value>,
}

/// DELETE /delete_users - bulk delete by id set, reporting the removed count
pub async fn delete_users(
    State(state): State<AppState>,
    Json(payload): Json<DeleteUsersRequest>,
) -> Result<Json<Value>, ApiError> {
    let ids = parse_id_list(payload.ids)?;

    let mut tx = state.pool.begin().await?;
    let deleted = users::delete_ids(&mut tx, &ids).await?;
    tx.commit().await?;

    tracing::info!("deleted {} account(s)", deleted);
    Ok(Json(json!({
        "success": true,
        "message": format!("{} user(s) deleted.", deleted),
    })))
}

/// `ids` must be a non-empty JSON array of integers.
fn parse_id_list(value: Option<Value>) -> Result<Vec<i64>, ApiError> {
    let items = match value {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(ApiError::validation("A non-empty list of ids is required.")),
    };
    items
        .into_iter()
        .map(|item| {
            item.as_i64()
                .ok_or_else(|| ApiError::validation("User ids must be integers."))
        })
        .collect()
}

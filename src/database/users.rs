//! Account store accessor. Every statement binds its parameters; nothing in
//! here interpolates request data into SQL text.

use sqlx::{FromRow, PgPool, Postgres, Transaction};

/// Fixed literal returned instead of a real password on every read path.
/// On update it doubles as a sentinel meaning "leave the password alone".
pub const MASKED_PASSWORD: &str = "********";

/// Display name fallback when the stored username is blank.
pub const DEFAULT_USERNAME: &str = "User";

/// Agency display fallback when none is stored.
pub const DEFAULT_AGENCY: &str = "N/A";

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password: String,
    pub agency_name: Option<String>,
    pub is_admin: bool,
}

impl UserRow {
    pub fn account_type(&self) -> &'static str {
        if self.is_admin {
            "Admin"
        } else {
            "Responder"
        }
    }

    pub fn display_name(&self) -> &str {
        if self.username.trim().is_empty() {
            DEFAULT_USERNAME
        } else {
            &self.username
        }
    }

    pub fn agency_or_default(&self) -> &str {
        match self.agency_name.as_deref() {
            Some(a) if !a.trim().is_empty() => a,
            _ => DEFAULT_AGENCY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub username: String,
    pub agency_name: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct UserChanges {
    pub email: String,
    pub username: String,
    pub agency_name: String,
    pub password: Option<String>,
}

impl UserChanges {
    /// A new password is taken only when one was supplied, it is non-empty,
    /// and it is not the masked placeholder echoed back by the client.
    pub fn password_change(&self) -> Option<&str> {
        match self.password.as_deref() {
            Some(p) if !p.is_empty() && p != MASKED_PASSWORD => Some(p),
            _ => None,
        }
    }
}

pub async fn stored_password(pool: &PgPool, email: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT password FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, username, password, agency_name, is_admin FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Uniqueness pre-check before insert.
pub async fn email_in_use(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(id.is_some())
}

/// Uniqueness pre-check before update: the email may stay on its own row.
pub async fn email_used_by_other(
    pool: &PgPool,
    email: &str,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let other: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE email = $1 AND id <> $2")
            .bind(email)
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(other.is_some())
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, username, password, agency_name, is_admin FROM users ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn insert(tx: &mut Transaction<'_, Postgres>, user: &NewUser) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (email, password, username, agency_name, is_admin) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&user.email)
    .bind(&user.password)
    .bind(&user.username)
    .bind(&user.agency_name)
    .bind(user.is_admin)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Apply field changes to one row. Returns the affected row count so the
/// caller can distinguish a missing id.
pub async fn update(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    changes: &UserChanges,
) -> Result<u64, sqlx::Error> {
    let result = match changes.password_change() {
        Some(password) => {
            sqlx::query(
                "UPDATE users SET email = $1, username = $2, agency_name = $3, password = $4 \
                 WHERE id = $5",
            )
            .bind(&changes.email)
            .bind(&changes.username)
            .bind(&changes.agency_name)
            .bind(password)
            .bind(id)
            .execute(&mut **tx)
            .await?
        }
        None => {
            sqlx::query("UPDATE users SET email = $1, username = $2, agency_name = $3 WHERE id = $4")
                .bind(&changes.email)
                .bind(&changes.username)
                .bind(&changes.agency_name)
                .bind(id)
                .execute(&mut **tx)
                .await?
        }
    };
    Ok(result.rows_affected())
}

/// Delete every row whose id is in the set. Ids with no matching row simply
/// contribute zero to the count.
pub async fn delete_ids(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[i64],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(ids)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

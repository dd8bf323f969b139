use rand::RngCore;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: String, // RFC3339
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: String, // RFC3339
}

/// Stored digests look like `sha256$<salt_hex>$<digest_hex>`.
fn digest_password(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);
    let digest = digest_password(&salt_hex, password);
    format!("sha256${salt_hex}${digest}")
}

fn verify_password(stored: &str, password: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("sha256"), Some(salt_hex), Some(digest)) => {
            digest_password(salt_hex, password) == digest
        }
        _ => false,
    }
}

pub fn sign_up(
    conn: &Connection,
    username: &str,
    password: &str,
    created_at: &str,
) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() || password.trim().is_empty() {
        return Err(AppError::new(
            "AUTH_INVALID_INPUT",
            "Provide username and password",
        ));
    }

    let password_hash = hash_password(password);
    let inserted = conn.execute(
        "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![username, password_hash, created_at],
    );
    match inserted {
        Ok(_) => {}
        Err(e) if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) => {
            return Err(AppError::new("AUTH_USERNAME_TAKEN", "Username already exists")
                .with_details(format!("username={username}")));
        }
        Err(e) => {
            return Err(AppError::new("DB_QUERY_FAILED", "Failed to insert user")
                .with_details(e.to_string()));
        }
    }

    let id = conn.last_insert_rowid();
    Ok(User {
        id,
        username: username.to_string(),
        created_at: created_at.to_string(),
    })
}

fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<(User, String)>, AppError> {
    let mut stmt = conn
        .prepare("SELECT id, username, password_hash, created_at FROM users WHERE username = ?1")
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to prepare user query")
                .with_details(e.to_string())
        })?;

    stmt.query_row([username], |row| {
        Ok((
            User {
                id: row.get(0)?,
                username: row.get(1)?,
                created_at: row.get(3)?,
            },
            row.get::<_, String>(2)?,
        ))
    })
    .optional()
    .map_err(|e| {
        AppError::new("DB_QUERY_FAILED", "Failed to query user").with_details(e.to_string())
    })
}

/// Verifies credentials and opens a new session. The caller supplies the
/// timestamp so results stay deterministic under test.
pub fn sign_in(
    conn: &Connection,
    username: &str,
    password: &str,
    created_at: &str,
) -> Result<Session, AppError> {
    let username = username.trim();
    let found = get_user_by_username(conn, username)?;
    let (user, password_hash) = match found {
        Some(v) => v,
        None => return Err(AppError::new("AUTH_INVALID_CREDENTIALS", "Invalid credentials")),
    };
    if !verify_password(&password_hash, password) {
        return Err(AppError::new("AUTH_INVALID_CREDENTIALS", "Invalid credentials"));
    }

    let token = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![token, user.id, created_at],
    )
    .map_err(|e| {
        AppError::new("DB_QUERY_FAILED", "Failed to insert session").with_details(e.to_string())
    })?;

    Ok(Session {
        token,
        user_id: user.id,
        created_at: created_at.to_string(),
    })
}

/// Deletes the session for `token`. Unknown tokens are a no-op.
pub fn sign_out(conn: &Connection, token: &str) -> Result<(), AppError> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", [token])
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to delete session")
                .with_details(e.to_string())
        })?;
    Ok(())
}

pub fn user_for_token(conn: &Connection, token: &str) -> Result<Option<User>, AppError> {
    let mut stmt = conn
        .prepare(
            r#"
      SELECT u.id, u.username, u.created_at
      FROM sessions s
      JOIN users u ON u.id = s.user_id
      WHERE s.token = ?1
      "#,
        )
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to prepare session query")
                .with_details(e.to_string())
        })?;

    stmt.query_row([token], |row| {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            created_at: row.get(2)?,
        })
    })
    .optional()
    .map_err(|e| {
        AppError::new("DB_QUERY_FAILED", "Failed to query session").with_details(e.to_string())
    })
}

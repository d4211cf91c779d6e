use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::{Result, ScribeError};
use crate::models::User;

pub struct UserRepository;

impl UserRepository {
    /// Insert `user` unless the username is already taken.
    ///
    /// Returns `false` when a row with the same username exists; the existing
    /// row is left untouched.
    pub async fn insert_if_absent(conn: &Connection, user: &User) -> Result<bool> {
        let affected = conn
            .execute(
                r#"
                INSERT INTO users (id, username, password_hash, created_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(username) DO NOTHING
                "#,
                params![
                    user.id.clone(),
                    user.username.clone(),
                    user.password_hash.clone(),
                    user.created_at.to_rfc3339(),
                ],
            )
            .await?;

        Ok(affected > 0)
    }

    pub async fn get_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
                params![username],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn count(conn: &Connection) -> Result<u64> {
        let mut rows = conn.query("SELECT COUNT(*) FROM users", ()).await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?.max(0) as u64),
            None => Ok(0),
        }
    }

    fn row_to_user(row: &libsql::Row) -> Result<User> {
        let created_at: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| ScribeError::Internal(format!("Corrupt created_at '{created_at}': {e}")))?;

        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            created_at,
        })
    }
}

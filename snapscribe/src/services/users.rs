use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use tracing::{debug, info};

use crate::db::DatabaseBackend;
use crate::error::{Result, ScribeError};
use crate::models::{Credentials, User};

/// Account registration and password verification.
#[derive(Clone)]
pub struct UserService {
    db: Arc<dyn DatabaseBackend>,
}

impl UserService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    /// Register a new account.
    ///
    /// Fails with [`ScribeError::Conflict`] when the username is taken; the
    /// existing account is never modified.
    pub async fn create_user(&self, credentials: Credentials) -> Result<User> {
        let Credentials { username, password } = credentials;

        let password_hash = hash_password(password).await?;
        let user = User::new(username, password_hash);

        if !self.db.create_user(&user).await? {
            debug!(username = %user.username, "Rejected duplicate username");
            return Err(ScribeError::Conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Check a username/password pair against the stored hash.
    pub async fn login(&self, credentials: Credentials) -> Result<User> {
        let Credentials { username, password } = credentials;

        let user = self
            .db
            .get_user_by_username(&username)
            .await?
            .ok_or_else(|| ScribeError::NotFound(format!("User '{username}' not found")))?;

        if !verify_password(password, user.password_hash.clone()).await? {
            debug!(username = %user.username, "Password mismatch");
            return Err(ScribeError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }
}

async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ScribeError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| ScribeError::Internal(format!("Password hashing task failed: {e}")))?
}

async fn verify_password(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|e| ScribeError::PasswordHash(format!("Stored hash is unreadable: {e}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(ScribeError::PasswordHash(e.to_string())),
        }
    })
    .await
    .map_err(|e| ScribeError::Internal(format!("Password verification task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::{Database, LibSqlBackend};

    async fn service() -> UserService {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 1000,
        };
        let db = Database::new(&config).await.unwrap();
        UserService::new(Arc::new(LibSqlBackend::new(db)))
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_password_is_hashed_not_stored_plain() {
        let service = service().await;
        let user = service.create_user(creds("alice", "s3cret")).await.unwrap();

        assert_ne!(user.password_hash, "s3cret");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let a = hash_password("same".to_string()).await.unwrap();
        let b = hash_password("same".to_string()).await.unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same".to_string(), a).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_outcomes() {
        let service = service().await;
        service.create_user(creds("bob", "hunter2")).await.unwrap();

        let user = service.login(creds("bob", "hunter2")).await.unwrap();
        assert_eq!(user.username, "bob");

        let wrong = service.login(creds("bob", "hunter3")).await.unwrap_err();
        assert!(matches!(wrong, ScribeError::InvalidCredentials));

        let missing = service.login(creds("nobody", "hunter2")).await.unwrap_err();
        assert!(matches!(missing, ScribeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_keeps_original_password() {
        let service = service().await;
        service.create_user(creds("carol", "first")).await.unwrap();

        let err = service.create_user(creds("carol", "second")).await.unwrap_err();
        assert!(matches!(err, ScribeError::Conflict(_)));

        assert!(service.login(creds("carol", "first")).await.is_ok());
        assert!(matches!(
            service.login(creds("carol", "second")).await,
            Err(ScribeError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_internal_error() {
        let err = verify_password("x".to_string(), "not-a-phc-string".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::PasswordHash(_)));
    }
}

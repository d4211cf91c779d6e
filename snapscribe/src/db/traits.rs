use async_trait::async_trait;

use crate::error::Result;
use crate::models::User;

/// Persistence for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert `user` atomically with respect to its username.
    ///
    /// Returns `Ok(false)` when the username is already taken. Concurrent
    /// calls with the same username yield exactly one `Ok(true)`.
    async fn create_user(&self, user: &User) -> Result<bool>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn count_users(&self) -> Result<u64>;
}

/// Everything the service needs from a database.
#[async_trait]
pub trait DatabaseBackend: UserStore {
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;

    /// Round-trip check used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}

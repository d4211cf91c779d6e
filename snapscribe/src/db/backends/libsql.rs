use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::db::connection::Database;
use crate::db::repository::UserRepository;
use crate::db::traits::{DatabaseBackend, UserStore};
use crate::error::Result;
use crate::models::User;

pub struct LibSqlBackend {
    db: Database,
    /// Serializes writes so concurrent inserts never surface as SQLITE_BUSY.
    write_lock: Arc<Mutex<()>>,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl UserStore for LibSqlBackend {
    async fn create_user(&self, user: &User) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let conn = self.db.connect()?;
        UserRepository::insert_if_absent(&conn, user).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        UserRepository::get_by_username(&conn, username).await
    }

    async fn count_users(&self) -> Result<u64> {
        let conn = self.db.connect()?;
        UserRepository::count(&conn).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    async fn backend(dir: &tempfile::TempDir) -> Arc<LibSqlBackend> {
        let config = DatabaseConfig {
            url: format!("file:{}", dir.path().join("backend.db").display()),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 5000,
        };
        Arc::new(LibSqlBackend::new(Database::new(&config).await.unwrap()))
    }

    #[tokio::test]
    async fn test_concurrent_creates_insert_once() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(&dir).await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let backend = Arc::clone(&backend);
            handles.push(tokio::spawn(async move {
                backend
                    .create_user(&User::new("racer", format!("hash-{i}")))
                    .await
                    .unwrap()
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(backend.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sync_is_noop_for_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(&dir).await;
        backend.sync().await.unwrap();
        backend.ping().await.unwrap();
    }
}

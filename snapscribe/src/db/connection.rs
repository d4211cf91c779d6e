use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

const JOURNAL_MODE: &str = "WAL";
const SYNCHRONOUS: &str = "NORMAL";

pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
    /// In-memory databases are private to a connection, so one is shared.
    pub(crate) shared: Option<Connection>,
    pub(crate) busy_timeout_ms: u64,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = if config.url.starts_with("libsql://") || config.url.starts_with("https://") {
            if let Some(ref local_path) = config.local_path {
                Builder::new_remote_replica(
                    local_path,
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            } else {
                Builder::new_remote(
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            }
        } else if config.url == ":memory:" {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let shared = if config.url == ":memory:" {
            Some(db.connect()?)
        } else {
            None
        };

        let database = Self {
            db: Arc::new(db),
            shared,
            busy_timeout_ms: config.busy_timeout_ms,
        };
        database.configure_database().await?;
        database.init_schema().await?;

        tracing::info!(url = %redact_url(&config.url), "Database ready");
        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        match &self.shared {
            Some(conn) => Ok(conn.clone()),
            None => Ok(self.db.connect()?),
        }
    }

    async fn configure_database(&self) -> Result<()> {
        let conn = self.connect()?;

        let busy_timeout_sql = format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms);
        if let Err(error) = conn.execute_batch(&busy_timeout_sql).await {
            tracing::warn!(
                busy_timeout_ms = self.busy_timeout_ms,
                error = %error,
                "Failed to set SQLite busy_timeout"
            );
        }

        let journal_sql = format!("PRAGMA journal_mode = {JOURNAL_MODE}");
        if let Err(error) = conn.execute_batch(&journal_sql).await {
            tracing::warn!(mode = JOURNAL_MODE, error = %error, "Failed to set SQLite journal_mode");
        }

        let synchronous_sql = format!("PRAGMA synchronous = {SYNCHRONOUS}");
        if let Err(error) = conn.execute_batch(&synchronous_sql).await {
            tracing::warn!(mode = SYNCHRONOUS, error = %error, "Failed to set SQLite synchronous pragma");
        }

        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        schema::init_schema(&conn).await?;
        Ok(())
    }

    /// Cheap round trip used by the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        let conn = self.connect()?;
        let mut rows = conn.query("SELECT 1", ()).await?;
        rows.next().await?;
        Ok(())
    }

    pub async fn sync(&self) -> Result<()> {
        if let Ok(sync) = self.db.sync().await {
            tracing::info!("Database synced: {:?}", sync);
        }
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            shared: self.shared.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }
}

/// Strip credentials and query strings before a URL reaches the logs.
fn redact_url(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    match without_query.split_once('@') {
        Some((scheme_and_user, host)) => {
            let scheme = scheme_and_user
                .split_once("://")
                .map(|(s, _)| s)
                .unwrap_or("");
            format!("{scheme}://***@{host}")
        }
        None => without_query.to_string(),
    }
}

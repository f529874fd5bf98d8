use async_trait::async_trait;
use burrow_core::repository::{InsertOutcome, Repository, Result};
use burrow_core::{ShortCode, StorageError};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::{debug, trace};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL implementation of the repository contract.
///
/// Expects the `url_mapping (short_url PRIMARY KEY, original_url)` table to
/// exist; the schema is owned by the migration tooling. A unique index on
/// `md5(original_url)` makes concurrent inserts of one URL resolve to a
/// single code; without it the reuse check is best effort.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Creates a repository from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Checks that the database answers a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT original_url
            FROM url_mapping
            WHERE short_url = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| row.try_get("original_url"))
            .transpose()
            .map_err(map_sqlx_error)
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<ShortCode>> {
        let row = sqlx::query(
            r#"
            SELECT short_url
            FROM url_mapping
            WHERE md5(original_url) = md5($1) AND original_url = $1
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let short_url: String = row.try_get("short_url").map_err(map_sqlx_error)?;
        Ok(Some(ShortCode::new_unchecked(short_url)))
    }

    async fn insert_if_absent(
        &self,
        code: &ShortCode,
        original_url: &str,
    ) -> Result<InsertOutcome> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO url_mapping (short_url, original_url)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            RETURNING short_url
            "#,
        )
        .bind(code.as_str())
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if inserted.is_some() {
            trace!(code = %code, "stored mapping");
            return Ok(InsertOutcome::Inserted);
        }

        // Nothing was written: either the URL is already mapped or the code
        // belongs to another URL.
        match self.find_by_original_url(original_url).await? {
            Some(existing) => {
                debug!(code = %existing, "original url already mapped");
                Ok(InsertOutcome::Existing(existing))
            }
            None => Err(StorageError::Conflict(code.to_string())),
        }
    }

    async fn len(&self) -> Result<usize> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM url_mapping")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .try_get("count")
            .map_err(map_sqlx_error)?;

        usize::try_from(count)
            .map_err(|e| StorageError::InvalidData(format!("invalid row count {count}: {e}")))
    }
}

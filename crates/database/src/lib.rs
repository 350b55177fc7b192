//! SQLite access shared by every domain crate: one pool, migrations, and a
//! unit of work that repositories borrow their connection from.

use sqlx::error::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

pub type Driver = sqlx::Sqlite;
pub type Connection = sqlx::SqliteConnection;
pub type Pool = sqlx::SqlitePool;

// SQLite extended result codes for the constraints the schema declares.
const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Infrastructure(sqlx::Error),
    #[error("Resource not found")]
    NotFound,
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),
    #[error("Stored record is invalid: {0}")]
    InvalidData(String),
}

fn constraint_violation(db_err: &(dyn DatabaseError + 'static)) -> Option<RepositoryError> {
    let message = db_err.message().to_string();
    match db_err.code()?.as_ref() {
        SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => Some(RepositoryError::UniqueViolation(message)),
        SQLITE_CONSTRAINT_CHECK => Some(RepositoryError::CheckViolation(message)),
        _ => None,
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return RepositoryError::NotFound;
        }
        err.as_database_error()
            .and_then(constraint_violation)
            .unwrap_or(RepositoryError::Infrastructure(err))
    }
}

#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    pub async fn new(url: &str) -> sqlx::Result<Self> {
        Self::connect(url, SqlitePoolOptions::new()).await
    }

    async fn connect(url: &str, pool_options: SqlitePoolOptions) -> sqlx::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = pool_options.connect_with(options).await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        let migrator = sqlx::migrate!("../../migrations");
        tracing::info!(count = migrator.iter().count(), "Applying migrations");
        migrator.run(&self.pool).await?;
        tracing::info!("Schema up to date");
        Ok(())
    }

    /// Starts a transaction. Dropping the returned unit without calling
    /// [`UnitOfWork::commit`] rolls it back.
    pub async fn begin(&self) -> Result<UnitOfWork<'_>, RepositoryError> {
        Ok(UnitOfWork {
            tx: self.pool.begin().await?,
        })
    }
}

pub struct UnitOfWork<'a> {
    tx: sqlx::Transaction<'a, Driver>,
}

impl UnitOfWork<'_> {
    pub fn connection(&mut self) -> &mut Connection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), RepositoryError> {
        Ok(self.tx.commit().await?)
    }
}

static TEST_DB_SEQ: AtomicU64 = AtomicU64::new(0);

/// A freshly migrated database in its own temp file. Public so that other
/// crates' tests can use it; it holds a single connection, so callers must
/// not keep a [`UnitOfWork`] open while calling a service.
pub async fn get_test_db() -> Database {
    let seq = TEST_DB_SEQ.fetch_add(1, Ordering::Relaxed);
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let path = std::env::temp_dir().join(format!("ledger_test_{}_{}_{}.db", std::process::id(), stamp, seq));

    let db = Database::connect(
        &format!("sqlite:{}", path.display()),
        SqlitePoolOptions::new().max_connections(1),
    )
    .await
    .expect("test database should open");
    db.run_migrations().await.expect("migrations should apply");
    db
}

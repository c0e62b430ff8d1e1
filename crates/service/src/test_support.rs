#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh migrated database for one test.
/// In-memory SQLite unless `TEST_DATABASE_URL` names a PostgreSQL database.
/// `None` when `SKIP_DB_TESTS` is set.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let mut opts = ConnectOptions::new(url);
    if opts.get_url().starts_with("sqlite") {
        // one shared connection, otherwise each pooled connection sees its own empty db
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(5).min_connections(1);
    }
    opts.sqlx_logging(false);
    let db = Database::connect(opts).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

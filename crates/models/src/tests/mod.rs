
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// In-memory SQLite by default; `TEST_DATABASE_URL` points the tests at PostgreSQL.
/// `None` when `SKIP_DB_TESTS` is set.
pub(crate) async fn test_db() -> anyhow::Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let mut opts = ConnectOptions::new(url);
    if opts.get_url().starts_with("sqlite") {
        // every pooled connection would otherwise get its own empty memory db
        opts.max_connections(1).min_connections(1);
    }
    opts.sqlx_logging(false);
    let db = Database::connect(opts).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

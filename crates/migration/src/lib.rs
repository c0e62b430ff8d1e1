//! Migrator for the subscription schema.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

use sea_orm_migration::sea_orm::DatabaseConnection;
use tracing::{debug, info};

mod m20240101_000001_create_subscription;
mod m20240101_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_subscription::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000002_add_indexes::Migration),
        ]
    }
}

/// Result of [`apply_pending`]; a real failure is the `Err` side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    NoChange,
    Applied(usize),
}

/// Apply every pending migration once, before the store is used.
pub async fn apply_pending(db: &DatabaseConnection) -> Result<MigrationOutcome, DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?.len();
    if pending == 0 {
        debug!(event = "migrations", "no migrations to apply");
        return Ok(MigrationOutcome::NoChange);
    }
    Migrator::up(db, None).await?;
    info!(event = "migrations", applied = pending, "migrations applied");
    Ok(MigrationOutcome::Applied(pending))
}

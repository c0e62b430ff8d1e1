use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_subscription::Subscription;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One subscription per (user_id, service_name); duplicates surface as a unique violation
        manager
            .create_index(
                Index::create()
                    .name("uniq_subscription_user_service")
                    .table(Subscription::Table)
                    .col(Subscription::UserId)
                    .col(Subscription::ServiceName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Period aggregation scans by start date
        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_start_date")
                    .table(Subscription::Table)
                    .col(Subscription::StartDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_subscription_user_service").table(Subscription::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_subscription_start_date").table(Subscription::Table).to_owned())
            .await
    }
}

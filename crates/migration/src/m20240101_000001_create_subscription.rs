//! Create `subscription` table.
//! One row per billing record; `end_date` is NULL for open-ended subscriptions.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(uuid(Subscription::Id).primary_key())
                    .col(integer(Subscription::UserId).not_null())
                    .col(string_len(Subscription::ServiceName, 255).not_null())
                    .col(integer(Subscription::Price).not_null())
                    .col(date(Subscription::StartDate).not_null())
                    .col(date_null(Subscription::EndDate))
                    .check(Expr::col(Subscription::Price).gt(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscription::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Subscription {
    Table,
    Id,
    UserId,
    ServiceName,
    Price,
    StartDate,
    EndDate,
}

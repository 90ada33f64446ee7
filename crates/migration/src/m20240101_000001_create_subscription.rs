//! Create `subscriptions` table.
//! Ids default to `uuid_generate_v4()`, so the `uuid-ossp` extension is ensured first.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(
                        uuid(Subscription::Id)
                            .primary_key()
                            .default(Expr::cust("uuid_generate_v4()")),
                    )
                    .col(uuid(Subscription::UserId).not_null())
                    .col(string(Subscription::ServiceName).not_null())
                    .col(big_integer(Subscription::Price).not_null())
                    .col(timestamp_with_time_zone(Subscription::StartDate).not_null())
                    .col(timestamp_with_time_zone_null(Subscription::EndDate))
                    .col(timestamp_with_time_zone(Subscription::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Subscription::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscription::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscription {
    #[sea_orm(iden = "subscriptions")]
    Table,
    Id,
    UserId,
    ServiceName,
    Price,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Filters used by the price total: user, service name, start date range
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_user")
                    .table(Subscription::Table)
                    .col(Subscription::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_service_name")
                    .table(Subscription::Table)
                    .col(Subscription::ServiceName)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_start_date")
                    .table(Subscription::Table)
                    .col(Subscription::StartDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_subscriptions_start_date",
            "idx_subscriptions_service_name",
            "idx_subscriptions_user",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Subscription::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subscription {
    #[sea_orm(iden = "subscriptions")]
    Table,
    UserId,
    ServiceName,
    StartDate,
}

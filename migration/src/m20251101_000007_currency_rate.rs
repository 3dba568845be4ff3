use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CurrencyRate::Table)
                    .if_not_exists()
                    .col(string_len(CurrencyRate::Code, 10).primary_key())
                    .col(double(CurrencyRate::RateToUsd))
                    .col(timestamp(CurrencyRate::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SystemSetting::Table)
                    .if_not_exists()
                    .col(string(SystemSetting::Key).primary_key())
                    .col(text(SystemSetting::Value))
                    .col(timestamp(SystemSetting::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemSetting::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CurrencyRate::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum CurrencyRate {
    #[sea_orm(iden = "currency_rates")]
    Table,
    Code,
    RateToUsd,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SystemSetting {
    #[sea_orm(iden = "system_settings")]
    Table,
    Key,
    Value,
    UpdatedAt,
}

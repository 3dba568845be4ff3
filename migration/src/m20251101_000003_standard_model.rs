use sea_orm_migration::{prelude::*, schema::*};

static IDX_STANDARD_MODEL_NAME: &str = "idx-standard_models-name";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StandardModel::Table)
                    .if_not_exists()
                    .col(pk_auto(StandardModel::Id))
                    .col(string(StandardModel::Name))
                    .col(string_null(StandardModel::Vendor))
                    .col(double_null(StandardModel::OfficialInputPrice))
                    .col(double_null(StandardModel::OfficialOutputPrice))
                    .col(string_len(StandardModel::OfficialCurrency, 10).default("USD"))
                    .col(boolean(StandardModel::IsFeatured).default(false))
                    .col(integer(StandardModel::RankHint).default(100))
                    .col(double(StandardModel::PopularityScore).default(0.0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_STANDARD_MODEL_NAME)
                    .table(StandardModel::Table)
                    .col(StandardModel::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_STANDARD_MODEL_NAME)
                    .table(StandardModel::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(StandardModel::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum StandardModel {
    #[sea_orm(iden = "standard_models")]
    Table,
    Id,
    Name,
    Vendor,
    OfficialInputPrice,
    OfficialOutputPrice,
    OfficialCurrency,
    IsFeatured,
    RankHint,
    PopularityScore,
}

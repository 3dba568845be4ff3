use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20251101_000001_user::User, m20251101_000002_provider::Provider,
    m20251101_000003_standard_model::StandardModel,
};

static IDX_MODEL_PRICE_STANDARD_MODEL_ID: &str = "idx-model_prices-standard_model_id";
static IDX_MODEL_PRICE_STATUS: &str = "idx-model_prices-status";
static FK_MODEL_PRICE_PROVIDER_ID: &str = "fk-model_prices-provider_id";
static FK_MODEL_PRICE_STANDARD_MODEL_ID: &str = "fk-model_prices-standard_model_id";
static FK_MODEL_PRICE_SUBMITTER_ID: &str = "fk-model_prices-submitter_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModelPrice::Table)
                    .if_not_exists()
                    .col(pk_auto(ModelPrice::Id))
                    .col(integer(ModelPrice::ProviderId))
                    .col(integer(ModelPrice::StandardModelId))
                    .col(integer_null(ModelPrice::SubmitterId))
                    .col(string_null(ModelPrice::ProviderModelName))
                    .col(string_len(ModelPrice::Currency, 10).default("USD"))
                    .col(double(ModelPrice::InputPrice))
                    .col(double(ModelPrice::OutputPrice))
                    .col(double_null(ModelPrice::CacheHitInputPrice))
                    .col(double_null(ModelPrice::CacheHitOutputPrice))
                    .col(string_null(ModelPrice::ProofType))
                    .col(text_null(ModelPrice::ProofContent))
                    .col(string_null(ModelPrice::ProofImgPath))
                    .col(string_len(ModelPrice::Status, 20).default("pending"))
                    .col(timestamp_null(ModelPrice::VerifiedAt))
                    .col(timestamp(ModelPrice::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MODEL_PRICE_PROVIDER_ID)
                            .from(ModelPrice::Table, ModelPrice::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MODEL_PRICE_STANDARD_MODEL_ID)
                            .from(ModelPrice::Table, ModelPrice::StandardModelId)
                            .to(StandardModel::Table, StandardModel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MODEL_PRICE_SUBMITTER_ID)
                            .from(ModelPrice::Table, ModelPrice::SubmitterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MODEL_PRICE_STANDARD_MODEL_ID)
                    .table(ModelPrice::Table)
                    .col(ModelPrice::StandardModelId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MODEL_PRICE_STATUS)
                    .table(ModelPrice::Table)
                    .col(ModelPrice::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MODEL_PRICE_STATUS)
                    .table(ModelPrice::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MODEL_PRICE_STANDARD_MODEL_ID)
                    .table(ModelPrice::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ModelPrice::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ModelPrice {
    #[sea_orm(iden = "model_prices")]
    Table,
    Id,
    ProviderId,
    StandardModelId,
    SubmitterId,
    ProviderModelName,
    Currency,
    InputPrice,
    OutputPrice,
    CacheHitInputPrice,
    CacheHitOutputPrice,
    ProofType,
    ProofContent,
    ProofImgPath,
    Status,
    VerifiedAt,
    CreatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_user::User;

static IDX_PROVIDER_STATUS: &str = "idx-providers-status";
static FK_PROVIDER_OWNER_ID: &str = "fk-providers-owner_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Provider::Table)
                    .if_not_exists()
                    .col(pk_auto(Provider::Id))
                    .col(string(Provider::Name))
                    .col(string_null(Provider::Website))
                    .col(boolean(Provider::IsOfficial).default(false))
                    .col(integer_null(Provider::OwnerId))
                    .col(string_len(Provider::Status, 20).default("pending"))
                    .col(string_null(Provider::OpenaiBaseUrl))
                    .col(string_null(Provider::GeminiBaseUrl))
                    .col(string_null(Provider::ClaudeBaseUrl))
                    .col(string_null(Provider::ProofType))
                    .col(text_null(Provider::ProofContent))
                    .col(double(Provider::AvgScore).default(0.0))
                    .col(double(Provider::UptimeRate).default(100.0))
                    .col(timestamp(Provider::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PROVIDER_OWNER_ID)
                            .from(Provider::Table, Provider::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PROVIDER_STATUS)
                    .table(Provider::Table)
                    .col(Provider::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PROVIDER_STATUS)
                    .table(Provider::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Provider::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Provider {
    #[sea_orm(iden = "providers")]
    Table,
    Id,
    Name,
    Website,
    IsOfficial,
    OwnerId,
    Status,
    OpenaiBaseUrl,
    GeminiBaseUrl,
    ClaudeBaseUrl,
    ProofType,
    ProofContent,
    AvgScore,
    UptimeRate,
    CreatedAt,
}

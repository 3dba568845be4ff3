use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_user::User;

static FK_MODEL_REQUEST_REQUESTER_ID: &str = "fk-standard_model_requests-requester_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StandardModelRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(StandardModelRequest::Id))
                    .col(string(StandardModelRequest::RequestedName))
                    .col(string_null(StandardModelRequest::Vendor))
                    .col(integer(StandardModelRequest::RequesterId))
                    .col(string_len(StandardModelRequest::Status, 20).default("pending"))
                    .col(text_null(StandardModelRequest::AdminNotes))
                    .col(timestamp(StandardModelRequest::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MODEL_REQUEST_REQUESTER_ID)
                            .from(StandardModelRequest::Table, StandardModelRequest::RequesterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StandardModelRequest::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum StandardModelRequest {
    #[sea_orm(iden = "standard_model_requests")]
    Table,
    Id,
    RequestedName,
    Vendor,
    RequesterId,
    Status,
    AdminNotes,
    CreatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000001_user::User, m20251101_000002_provider::Provider};

static IDX_REVIEW_PROVIDER_ID: &str = "idx-reviews-provider_id";
static FK_REVIEW_PROVIDER_ID: &str = "fk-reviews-provider_id";
static FK_REVIEW_USER_ID: &str = "fk-reviews-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(pk_auto(Review::Id))
                    .col(integer(Review::ProviderId))
                    .col(integer_null(Review::UserId))
                    .col(integer(Review::Rating))
                    .col(text_null(Review::Comment))
                    .col(timestamp(Review::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REVIEW_PROVIDER_ID)
                            .from(Review::Table, Review::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REVIEW_USER_ID)
                            .from(Review::Table, Review::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_REVIEW_PROVIDER_ID)
                    .table(Review::Table)
                    .col(Review::ProviderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_REVIEW_PROVIDER_ID)
                    .table(Review::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Review {
    #[sea_orm(iden = "reviews")]
    Table,
    Id,
    ProviderId,
    UserId,
    Rating,
    Comment,
    CreatedAt,
}

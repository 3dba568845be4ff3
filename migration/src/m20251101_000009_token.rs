use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_user::User;

static IDX_ACTION_TOKEN_USER_ID: &str = "idx-user_action_tokens-user_id";
static FK_VERIFICATION_TOKEN_USER_ID: &str = "fk-email_verification_tokens-user_id";
static FK_ACTION_TOKEN_USER_ID: &str = "fk-user_action_tokens-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmailVerificationToken::Table)
                    .if_not_exists()
                    .col(string_len(EmailVerificationToken::Token, 64).primary_key())
                    .col(integer(EmailVerificationToken::UserId))
                    .col(timestamp(EmailVerificationToken::ExpiresAt))
                    .col(boolean(EmailVerificationToken::Used).default(false))
                    .col(timestamp(EmailVerificationToken::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_VERIFICATION_TOKEN_USER_ID)
                            .from(EmailVerificationToken::Table, EmailVerificationToken::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserActionToken::Table)
                    .if_not_exists()
                    .col(string_len(UserActionToken::Token, 16).primary_key())
                    .col(integer(UserActionToken::UserId))
                    .col(string_len(UserActionToken::Action, 20))
                    .col(string_null(UserActionToken::NewEmail))
                    .col(timestamp(UserActionToken::ExpiresAt))
                    .col(boolean(UserActionToken::Used).default(false))
                    .col(timestamp(UserActionToken::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ACTION_TOKEN_USER_ID)
                            .from(UserActionToken::Table, UserActionToken::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ACTION_TOKEN_USER_ID)
                    .table(UserActionToken::Table)
                    .col(UserActionToken::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ACTION_TOKEN_USER_ID)
                    .table(UserActionToken::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserActionToken::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EmailVerificationToken::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum EmailVerificationToken {
    #[sea_orm(iden = "email_verification_tokens")]
    Table,
    Token,
    UserId,
    ExpiresAt,
    Used,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserActionToken {
    #[sea_orm(iden = "user_action_tokens")]
    Table,
    Token,
    UserId,
    Action,
    NewEmail,
    ExpiresAt,
    Used,
    CreatedAt,
}

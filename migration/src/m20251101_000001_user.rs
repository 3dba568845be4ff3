use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len_uniq(User::Email, 255))
                    .col(string(User::PasswordHash))
                    .col(string_len(User::Role, 20).default("user"))
                    .col(boolean(User::IsActive).default(true))
                    .col(boolean(User::EmailVerified).default(false))
                    .col(boolean(User::TotpEnabled).default(false))
                    .col(string_null(User::TotpSecret))
                    .col(text_null(User::TotpBackupCodes))
                    .col(string_null(User::TotpTempSecret))
                    .col(timestamp(User::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    IsActive,
    EmailVerified,
    TotpEnabled,
    TotpSecret,
    TotpBackupCodes,
    TotpTempSecret,
    CreatedAt,
}

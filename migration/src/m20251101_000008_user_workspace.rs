use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000001_user::User, m20251101_000002_provider::Provider};

static IDX_USER_API_KEY_USER_ID: &str = "idx-user_api_keys-user_id";
static FK_USER_SETTINGS_USER_ID: &str = "fk-user_settings-user_id";
static FK_USER_API_KEY_USER_ID: &str = "fk-user_api_keys-user_id";
static FK_USER_API_KEY_PROVIDER_ID: &str = "fk-user_api_keys-provider_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSettings::Table)
                    .if_not_exists()
                    .col(integer(UserSettings::UserId).primary_key())
                    .col(boolean(UserSettings::E2eeEnabled).default(false))
                    .col(string_null(UserSettings::E2eeSalt))
                    .col(text_null(UserSettings::E2eeVerification))
                    .col(text_null(UserSettings::PreferredCurrencies))
                    .col(string_len_null(UserSettings::DefaultCurrency, 10))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_USER_SETTINGS_USER_ID)
                            .from(UserSettings::Table, UserSettings::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserApiKey::Table)
                    .if_not_exists()
                    .col(pk_auto(UserApiKey::Id))
                    .col(integer(UserApiKey::UserId))
                    .col(integer(UserApiKey::ProviderId))
                    .col(text(UserApiKey::ApiKey))
                    .col(boolean(UserApiKey::IsEncrypted).default(false))
                    .col(string_null(UserApiKey::Note))
                    .col(timestamp(UserApiKey::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_USER_API_KEY_USER_ID)
                            .from(UserApiKey::Table, UserApiKey::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_USER_API_KEY_PROVIDER_ID)
                            .from(UserApiKey::Table, UserApiKey::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_USER_API_KEY_USER_ID)
                    .table(UserApiKey::Table)
                    .col(UserApiKey::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_USER_API_KEY_USER_ID)
                    .table(UserApiKey::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserApiKey::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UserSettings::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserSettings {
    Table,
    UserId,
    E2eeEnabled,
    E2eeSalt,
    E2eeVerification,
    PreferredCurrencies,
    DefaultCurrency,
}

#[derive(DeriveIden)]
enum UserApiKey {
    #[sea_orm(iden = "user_api_keys")]
    Table,
    Id,
    UserId,
    ProviderId,
    ApiKey,
    IsEncrypted,
    Note,
    CreatedAt,
}

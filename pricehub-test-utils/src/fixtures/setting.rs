use chrono::Utc;
use sea_orm::{sea_query::OnConflict, ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn setting(&self) -> SettingFixtures<'_> {
        SettingFixtures { setup: self }
    }
}

pub struct SettingFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> SettingFixtures<'a> {
    /// Insert or overwrite a system setting
    pub async fn insert_setting(&self, key: &str, value: &str) -> Result<(), TestError> {
        entity::prelude::SystemSetting::insert(entity::system_setting::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
        })
        .on_conflict(
            OnConflict::column(entity::system_setting::Column::Key)
                .update_columns([
                    entity::system_setting::Column::Value,
                    entity::system_setting::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.setup.db)
        .await?;

        Ok(())
    }

    /// Configure SMTP settings pointing at an unreachable local port
    pub async fn insert_unreachable_smtp(&self) -> Result<(), TestError> {
        self.insert_setting("smtp_host", "127.0.0.1").await?;
        self.insert_setting("smtp_port", "1").await?;
        self.insert_setting("smtp_sender", "noreply@example.com")
            .await?;
        self.insert_setting("smtp_use_tls", "false").await?;

        Ok(())
    }
}

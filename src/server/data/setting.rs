use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{sea_query::OnConflict, ActiveValue, ConnectionTrait, DbErr, EntityTrait};

pub struct SettingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SettingRepository<'a, C> {
    /// Creates a new instance of [`SettingRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, DbErr> {
        Ok(entity::prelude::SystemSetting::find_by_id(key.to_string())
            .one(self.db)
            .await?
            .map(|setting| setting.value))
    }

    /// Every setting keyed by name
    pub async fn all(&self) -> Result<HashMap<String, String>, DbErr> {
        Ok(entity::prelude::SystemSetting::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(|setting| (setting.key, setting.value))
            .collect())
    }

    pub async fn upsert_many(&self, settings: &[(String, String)]) -> Result<(), DbErr> {
        if settings.is_empty() {
            return Ok(());
        }

        let now = Utc::now().naive_utc();
        let models = settings
            .iter()
            .map(|(key, value)| entity::system_setting::ActiveModel {
                key: ActiveValue::Set(key.clone()),
                value: ActiveValue::Set(value.clone()),
                updated_at: ActiveValue::Set(now),
            });

        entity::prelude::SystemSetting::insert_many(models)
            .on_conflict(
                OnConflict::column(entity::system_setting::Column::Key)
                    .update_columns([
                        entity::system_setting::Column::Value,
                        entity::system_setting::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }
}

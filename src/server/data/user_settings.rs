use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait};

pub struct UserSettingsRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserSettingsRepository<'a, C> {
    /// Creates a new instance of [`UserSettingsRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, user_id: i32) -> Result<Option<entity::user_settings::Model>, DbErr> {
        entity::prelude::UserSettings::find_by_id(user_id)
            .one(self.db)
            .await
    }

    /// Returns the settings row of a user, inserting defaults on first access
    pub async fn get_or_create(&self, user_id: i32) -> Result<entity::user_settings::Model, DbErr> {
        if let Some(settings) = self.get(user_id).await? {
            return Ok(settings);
        }

        entity::user_settings::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            e2ee_enabled: ActiveValue::Set(false),
            e2ee_salt: ActiveValue::Set(None),
            e2ee_verification: ActiveValue::Set(None),
            preferred_currencies: ActiveValue::Set(None),
            default_currency: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }

    /// Stores currency preferences, `None` leaves a column untouched
    pub async fn update_preferences(
        &self,
        user_id: i32,
        preferred_currencies: Option<String>,
        default_currency: Option<String>,
    ) -> Result<entity::user_settings::Model, DbErr> {
        let existing = self.get_or_create(user_id).await?;

        let mut settings = entity::user_settings::ActiveModel {
            user_id: ActiveValue::Unchanged(user_id),
            ..Default::default()
        };
        if let Some(preferred_currencies) = preferred_currencies {
            settings.preferred_currencies = ActiveValue::Set(Some(preferred_currencies));
        }
        if let Some(default_currency) = default_currency {
            settings.default_currency = ActiveValue::Set(Some(default_currency));
        }

        if !settings.is_changed() {
            return Ok(existing);
        }

        settings.update(self.db).await
    }

    pub async fn enable_e2ee(
        &self,
        user_id: i32,
        salt: String,
        verification: String,
    ) -> Result<entity::user_settings::Model, DbErr> {
        self.get_or_create(user_id).await?;

        entity::user_settings::ActiveModel {
            user_id: ActiveValue::Unchanged(user_id),
            e2ee_enabled: ActiveValue::Set(true),
            e2ee_salt: ActiveValue::Set(Some(salt)),
            e2ee_verification: ActiveValue::Set(Some(verification)),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn disable_e2ee(&self, user_id: i32) -> Result<entity::user_settings::Model, DbErr> {
        self.get_or_create(user_id).await?;

        entity::user_settings::ActiveModel {
            user_id: ActiveValue::Unchanged(user_id),
            e2ee_enabled: ActiveValue::Set(false),
            e2ee_salt: ActiveValue::Set(None),
            e2ee_verification: ActiveValue::Set(None),
            ..Default::default()
        }
        .update(self.db)
        .await
    }
}

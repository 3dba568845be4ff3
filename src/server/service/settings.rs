use std::collections::HashMap;

use sea_orm::DatabaseConnection;

use crate::{
    model::{
        provider::ProviderDto,
        settings::{CurrencyDto, CurrencyRateDto, UpdateUserPreferencesDto, UserPreferencesDto},
    },
    server::{
        data::{
            currency_rate::CurrencyRateRepository, provider::ProviderRepository,
            setting::SettingRepository, user_settings::UserSettingsRepository,
        },
        error::{price::PriceError, Error},
        util::currency::{currency_flag, is_common},
    },
};

/// Settings anyone may read without logging in
pub const PUBLIC_SETTING_KEYS: [&str; 3] =
    ["site_name", "home_display_mode", "force_email_verification"];

fn to_preferences(settings: entity::user_settings::Model) -> UserPreferencesDto {
    let preferred_currencies = match settings.preferred_currencies.as_deref() {
        Some(stored) => serde_json::from_str(stored).unwrap_or_else(|e| {
            tracing::warn!(
                "Ignoring unreadable preferred currencies of user ID {}: {}",
                settings.user_id,
                e
            );
            Vec::new()
        }),
        None => Vec::new(),
    };

    UserPreferencesDto {
        user_id: settings.user_id,
        preferred_currencies,
        default_currency: settings.default_currency,
    }
}

pub struct SettingsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingsService<'a> {
    /// Creates a new instance of [`SettingsService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn rates(&self) -> Result<Vec<CurrencyRateDto>, Error> {
        Ok(CurrencyRateRepository::new(self.db)
            .list()
            .await?
            .into_iter()
            .map(CurrencyRateDto::from)
            .collect())
    }

    /// Stored currencies with display hints
    pub async fn currencies(&self) -> Result<Vec<CurrencyDto>, Error> {
        Ok(CurrencyRateRepository::new(self.db)
            .list()
            .await?
            .into_iter()
            .map(|rate| CurrencyDto {
                is_common: is_common(&rate.code),
                flag: currency_flag(&rate.code),
                code: rate.code,
                rate_to_usd: rate.rate_to_usd,
                updated_at: rate.updated_at,
            })
            .collect())
    }

    pub async fn approved_providers(&self) -> Result<Vec<ProviderDto>, Error> {
        Ok(ProviderRepository::new(self.db)
            .list_approved()
            .await?
            .into_iter()
            .map(ProviderDto::from)
            .collect())
    }

    /// The subset of system settings exposed to anonymous clients
    pub async fn public_settings(&self) -> Result<HashMap<String, String>, Error> {
        let mut settings = SettingRepository::new(self.db).all().await?;
        settings.retain(|key, _| PUBLIC_SETTING_KEYS.contains(&key.as_str()));

        Ok(settings)
    }

    pub async fn user_preferences(&self, user_id: i32) -> Result<UserPreferencesDto, Error> {
        let settings = UserSettingsRepository::new(self.db)
            .get_or_create(user_id)
            .await?;

        Ok(to_preferences(settings))
    }

    /// Stores currency preferences; the default currency must be USD or a stored rate
    pub async fn update_user_preferences(
        &self,
        user_id: i32,
        changes: UpdateUserPreferencesDto,
    ) -> Result<UserPreferencesDto, Error> {
        let default_currency = match changes.default_currency {
            Some(code) => {
                let code = code.trim().to_uppercase();
                if code != "USD"
                    && CurrencyRateRepository::new(self.db)
                        .get(&code)
                        .await?
                        .is_none()
                {
                    return Err(PriceError::UnknownCurrency(code).into());
                }
                Some(code)
            }
            None => None,
        };

        let preferred_currencies = changes
            .preferred_currencies
            .map(|codes| {
                let codes: Vec<String> = codes
                    .iter()
                    .map(|code| code.trim().to_uppercase())
                    .filter(|code| !code.is_empty())
                    .collect();
                serde_json::to_string(&codes)
            })
            .transpose()?;

        let settings = UserSettingsRepository::new(self.db)
            .update_preferences(user_id, preferred_currencies, default_currency)
            .await?;

        Ok(to_preferences(settings))
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CurrencyRateDto {
    pub code: String,
    /// Units of this currency per US dollar
    pub rate_to_usd: f64,
    pub updated_at: NaiveDateTime,
}

impl From<entity::currency_rate::Model> for CurrencyRateDto {
    fn from(rate: entity::currency_rate::Model) -> Self {
        Self {
            code: rate.code,
            rate_to_usd: rate.rate_to_usd,
            updated_at: rate.updated_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CurrencyDto {
    pub code: String,
    pub rate_to_usd: f64,
    pub updated_at: NaiveDateTime,
    /// USD, CNY and EUR are listed first by clients
    pub is_common: bool,
    /// Emoji flag, empty when unknown
    pub flag: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserPreferencesDto {
    pub user_id: i32,
    pub preferred_currencies: Vec<String>,
    pub default_currency: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserPreferencesDto {
    #[serde(default)]
    pub preferred_currencies: Option<Vec<String>>,
    #[serde(default)]
    pub default_currency: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct E2eeSettingsDto {
    pub e2ee_enabled: bool,
    pub e2ee_salt: Option<String>,
    pub e2ee_verification: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct E2eeSetupDto {
    pub salt: String,
    pub verification: String,
}

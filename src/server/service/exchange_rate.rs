//! Currency rates refresh from a public exchange rate API.
//!
//! Rates are stored as units of the currency per US dollar. The API endpoint, key and refresh
//! interval are system settings:
//!
//! - `exchange_rate_url`: full URL, `{KEY}` is replaced by `exchange_rate_key`
//! - `exchange_rate_interval_minutes`: refresh interval, at least 5 minutes

use std::collections::HashMap;

use reqwest::StatusCode;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{currency_rate::CurrencyRateRepository, setting::SettingRepository},
    error::Error,
    service::retry::RetryContext,
};

pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
pub const EXCHANGE_RATE_URL_KEY: &str = "exchange_rate_url";
pub const EXCHANGE_RATE_API_KEY: &str = "exchange_rate_key";
pub const EXCHANGE_RATE_INTERVAL_KEY: &str = "exchange_rate_interval_minutes";

pub const DEFAULT_INTERVAL_MINUTES: u64 = 240;
pub const MIN_INTERVAL_MINUTES: u64 = 5;

const MAX_CODE_LEN: usize = 10;

/// Refresh interval from the stored setting, default 240, never below 5
pub fn interval_from_setting(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_INTERVAL_MINUTES)
        .max(MIN_INTERVAL_MINUTES)
}

/// Substitutes the API key into a `{KEY}` placeholder, if both are present
pub fn resolve_url(url: Option<String>, api_key: Option<String>) -> String {
    let url = url
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EXCHANGE_RATE_URL.to_string());

    match api_key.filter(|k| !k.is_empty()) {
        Some(key) if url.contains("{KEY}") => url.replace("{KEY}", &key),
        _ => url,
    }
}

/// Extracts per-USD rates from an API payload.
///
/// Accepts `rates` or `conversion_rates` with the base in `base` or `base_code`. Rates of a
/// non-USD base are divided by the USD rate. Codes over 10 characters and non-numeric rates
/// are dropped.
pub fn normalize_rates(payload: &serde_json::Value) -> Vec<(String, f64)> {
    let Some(raw) = payload
        .get("rates")
        .or_else(|| payload.get("conversion_rates"))
        .and_then(serde_json::Value::as_object)
    else {
        return Vec::new();
    };

    let base = payload
        .get("base")
        .or_else(|| payload.get("base_code"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("USD");

    let mut rates: HashMap<String, f64> = raw
        .iter()
        .filter_map(|(code, rate)| Some((code.clone(), rate.as_f64()?)))
        .collect();

    if base != "USD" {
        if let Some(usd_rate) = rates.get("USD").copied().filter(|rate| *rate != 0.0) {
            for rate in rates.values_mut() {
                *rate /= usd_rate;
            }
            rates.insert("USD".to_string(), 1.0);
        }
    }

    let mut rates: Vec<(String, f64)> = rates
        .into_iter()
        .filter(|(code, _)| code.len() <= MAX_CODE_LEN)
        .collect();
    rates.sort_by(|a, b| a.0.cmp(&b.0));

    rates
}

pub struct ExchangeRateService<'a> {
    db: &'a DatabaseConnection,
    http_client: &'a reqwest::Client,
}

impl<'a> ExchangeRateService<'a> {
    /// Creates a new instance of [`ExchangeRateService`]
    pub fn new(db: &'a DatabaseConnection, http_client: &'a reqwest::Client) -> Self {
        Self { db, http_client }
    }

    pub async fn interval_minutes(&self) -> Result<u64, Error> {
        let value = SettingRepository::new(self.db)
            .get(EXCHANGE_RATE_INTERVAL_KEY)
            .await?;

        Ok(interval_from_setting(value.as_deref()))
    }

    /// Fetches and stores the latest rates, returning how many were stored.
    ///
    /// A response other than 200 stores nothing; server errors and network failures are
    /// retried first. Fetched rates are kept between attempts so a failed store does not
    /// refetch.
    pub async fn refresh(&self) -> Result<usize, Error> {
        let settings = SettingRepository::new(self.db);
        let url = resolve_url(
            settings.get(EXCHANGE_RATE_URL_KEY).await?,
            settings.get(EXCHANGE_RATE_API_KEY).await?,
        );

        let mut ctx: RetryContext<Option<Vec<(String, f64)>>> = RetryContext::new();
        let db = self.db.clone();
        let http_client = self.http_client.clone();

        ctx.execute_with_retry("exchange rate refresh", |cache| {
            let db = db.clone();
            let http_client = http_client.clone();
            let url = url.clone();

            Box::pin(async move {
                if cache.is_none() {
                    let response = http_client.get(&url).send().await?;
                    let status = response.status();

                    if status.is_server_error() {
                        response.error_for_status()?;
                    } else if status != StatusCode::OK {
                        tracing::error!("Exchange rate API returned {}", status);

                        return Ok(0);
                    } else {
                        let payload: serde_json::Value = response.json().await?;
                        *cache = Some(normalize_rates(&payload));
                    }
                }

                let rates = cache.clone().unwrap_or_default();
                CurrencyRateRepository::new(&db).upsert_many(&rates).await?;

                Ok(rates.len())
            })
        })
        .await
    }
}

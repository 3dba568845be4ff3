//! Functions run by the scheduler, each returning how many rows it touched.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error,
    service::{
        exchange_rate::ExchangeRateService, expiry::PriceExpiryService, uptime::UptimeService,
    },
};

/// Fetches the latest exchange rates and upserts them
pub async fn refresh_exchange_rates(
    db: DatabaseConnection,
    http_client: reqwest::Client,
) -> Result<usize, Error> {
    ExchangeRateService::new(&db, &http_client).refresh().await
}

/// Expires active prices not verified within the last week
pub async fn expire_prices(
    db: DatabaseConnection,
    _http_client: reqwest::Client,
) -> Result<usize, Error> {
    let expired = PriceExpiryService::new(&db)
        .expire_stale(Utc::now().naive_utc())
        .await?;

    Ok(expired as usize)
}

/// Probes provider websites and updates their uptime average
pub async fn check_provider_uptime(
    db: DatabaseConnection,
    http_client: reqwest::Client,
) -> Result<usize, Error> {
    UptimeService::new(&db, &http_client).check_all().await
}

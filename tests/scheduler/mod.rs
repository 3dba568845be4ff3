//! Scheduled job functions run against the test database and mock server.

use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::PriceStatus;
use pricehub::server::scheduler::job::{
    check_provider_uptime, expire_prices, refresh_exchange_rates,
};
use pricehub_test_utils::prelude::*;
use sea_orm::EntityTrait;

#[tokio::test]
/// Expect prices verified over a week ago to expire and recent ones to stay active
async fn expires_stale_prices() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let provider = test.provider().insert_approved("Relay").await?;
    let model = test.standard_model().insert_model("gpt-4o").await?;
    let stale = test
        .price()
        .insert_verified_at(provider.id, model.id, Utc::now().naive_utc() - Duration::days(8))
        .await?;
    let fresh = test
        .price()
        .insert_verified_at(provider.id, model.id, Utc::now().naive_utc() - Duration::days(1))
        .await?;

    let expired = expire_prices(test.db.clone(), test.http_client.clone())
        .await
        .unwrap();
    assert_eq!(expired, 1);

    let stale = entity::prelude::ModelPrice::find_by_id(stale.id)
        .one(&test.db)
        .await
        .unwrap()
        .unwrap();
    let fresh = entity::prelude::ModelPrice::find_by_id(fresh.id)
        .one(&test.db)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stale.status, PriceStatus::Expired);
    assert_eq!(fresh.status, PriceStatus::Active);

    Ok(())
}

#[tokio::test]
/// Expect fetched rates to be stored per USD
async fn refreshes_exchange_rates() -> Result<(), TestError> {
    let body = serde_json::json!({
        "base": "USD",
        "rates": { "USD": 1.0, "EUR": 0.9, "CNY": 7.2 }
    })
    .to_string();
    let test = TestBuilder::new()
        .with_all_tables()
        .with_exchange_rate_endpoint(200, body, 1)
        .build()
        .await?;

    let stored = refresh_exchange_rates(test.db.clone(), test.http_client.clone())
        .await
        .unwrap();
    assert_eq!(stored, 3);

    let eur = entity::prelude::CurrencyRate::find_by_id("EUR".to_string())
        .one(&test.db)
        .await
        .unwrap()
        .unwrap();
    assert!((eur.rate_to_usd - 0.9).abs() < 1e-9);

    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect an unreachable website to pull the uptime average down
async fn records_provider_downtime() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;

    let url = test.server_url();
    let mock = test
        .server()
        .mock("GET", "/")
        .with_status(503)
        .create_async()
        .await;
    let provider = test.provider().insert_with_website("Flaky", &url).await?;

    let checked = check_provider_uptime(test.db.clone(), test.http_client.clone())
        .await
        .unwrap();
    assert_eq!(checked, 1);

    let provider = entity::prelude::Provider::find_by_id(provider.id)
        .one(&test.db)
        .await
        .unwrap()
        .unwrap();
    assert!(provider.uptime_rate < 100.0);

    mock.assert_async().await;

    Ok(())
}

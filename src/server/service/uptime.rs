//! Provider website availability, tracked as an exponential moving average.

use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::server::{data::provider::ProviderRepository, error::Error};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Weight of the newest probe in the moving average
const SMOOTHING: f64 = 0.1;

/// Websites without a scheme are probed over https
pub fn probe_url(website: &str) -> String {
    let website = website.trim();

    if website.starts_with("http") {
        website.to_string()
    } else {
        format!("https://{}", website)
    }
}

pub fn next_uptime(current: f64, is_up: bool) -> f64 {
    let sample = if is_up { 100.0 } else { 0.0 };

    current * (1.0 - SMOOTHING) + sample * SMOOTHING
}

pub struct UptimeService<'a> {
    db: &'a DatabaseConnection,
    http_client: &'a reqwest::Client,
}

impl<'a> UptimeService<'a> {
    /// Creates a new instance of [`UptimeService`]
    pub fn new(db: &'a DatabaseConnection, http_client: &'a reqwest::Client) -> Self {
        Self { db, http_client }
    }

    /// Any response below 400 within 5 seconds counts as up
    async fn probe(&self, website: &str) -> bool {
        let url = probe_url(website);

        match self
            .http_client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().as_u16() < 400,
            Err(e) => {
                tracing::debug!("Uptime probe of {} failed: {}", url, e);

                false
            }
        }
    }

    /// Probes every provider with a website, returning how many were probed
    pub async fn check_all(&self) -> Result<usize, Error> {
        let provider_repo = ProviderRepository::new(self.db);
        let providers = provider_repo.list_with_website().await?;

        let mut checked = 0;
        for provider in providers {
            let Some(website) = provider.website.as_deref() else {
                continue;
            };

            let is_up = self.probe(website).await;
            provider_repo
                .update_uptime(provider.id, next_uptime(provider.uptime_rate, is_up))
                .await?;

            checked += 1;
        }

        Ok(checked)
    }
}

#[cfg(test)]
mod tests {
    mod helpers {
        use crate::server::service::uptime::{next_uptime, probe_url};

        /// Expect https to be assumed only when no scheme is given
        #[test]
        fn adds_scheme() {
            assert_eq!(probe_url("example.com"), "https://example.com");
            assert_eq!(probe_url("http://example.com"), "http://example.com");
        }

        /// Expect a tenth of the newest sample in the average
        #[test]
        fn moving_average() {
            assert!((next_uptime(100.0, false) - 90.0).abs() < f64::EPSILON);
            assert!((next_uptime(50.0, true) - 55.0).abs() < f64::EPSILON);
        }
    }

    mod check_all {
        use pricehub_test_utils::prelude::*;

        use crate::server::{data::provider::ProviderRepository, service::uptime::UptimeService};

        /// Expect reachable sites to keep full uptime and failing ones to drop
        #[tokio::test]
        async fn updates_uptime() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_all_tables()
                .with_mock_endpoint(|server| {
                    server.mock("GET", "/up").with_status(200).create()
                })
                .with_mock_endpoint(|server| {
                    server.mock("GET", "/down").with_status(503).create()
                })
                .build()
                .await?;
            let up = test
                .provider()
                .insert_with_website("Up", &format!("{}/up", test.server_url()))
                .await?;
            let down = test
                .provider()
                .insert_with_website("Down", &format!("{}/down", test.server_url()))
                .await?;
            test.provider().insert_approved("No Website").await?;

            let result = UptimeService::new(&test.db, &test.http_client)
                .check_all()
                .await;

            assert!(result.is_ok());
            assert_eq!(result.unwrap(), 2);

            let provider_repo = ProviderRepository::new(&test.db);
            let up = provider_repo.get(up.id).await?.unwrap();
            let down = provider_repo.get(down.id).await?.unwrap();
            assert_eq!(up.uptime_rate, 100.0);
            assert_eq!(down.uptime_rate, 90.0);

            Ok(())
        }
    }
}

//! Declarative test setup.
//!
//! The builder queues tables, fixtures and mock endpoints; everything is executed in
//! `build()`.

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{constant::EXCHANGE_RATE_PATH, error::TestError, TestContext};

/// Builder for declarative test initialization.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_all_tables: bool,

    currency_rates: Vec<(String, f64)>,
    settings: Vec<(String, String)>,

    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,
    exchange_rate_endpoints: Vec<(u16, String, usize)>,
}

impl TestBuilder {
    /// Create an empty builder with no tables, fixtures, or mock endpoints.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_all_tables: false,
            currency_rates: Vec::new(),
            settings: Vec::new(),
            mock_builders: Vec::new(),
            exchange_rate_endpoints: Vec::new(),
        }
    }

    /// Create every table of the schema.
    pub fn with_all_tables(mut self) -> Self {
        self.include_all_tables = true;
        self
    }

    /// Add a single entity table to the test database.
    ///
    /// ```no_run
    /// use pricehub_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), pricehub_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(User)
    ///     .with_table(Provider)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Insert a currency rate row (units per USD).
    pub fn with_currency_rate(mut self, code: &str, rate_to_usd: f64) -> Self {
        self.currency_rates.push((code.to_string(), rate_to_usd));
        self
    }

    /// Insert a system setting row.
    pub fn with_setting(mut self, key: &str, value: &str) -> Self {
        self.settings.push((key.to_string(), value.to_string()));
        self
    }

    /// Mock the exchange rate API and point the `exchange_rate_url` setting at it.
    ///
    /// # Arguments
    /// - `status` - HTTP status returned by the mock
    /// - `body` - Response body
    /// - `expected_requests` - Number of times the endpoint should be called
    pub fn with_exchange_rate_endpoint(
        mut self,
        status: u16,
        body: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.exchange_rate_endpoints
            .push((status, body.into(), expected_requests));
        self
    }

    /// Add a custom mock endpoint with full access to the mock server.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Create the configured tables, fixtures, and mock endpoints.
    ///
    /// Execution order:
    /// 1. Tables
    /// 2. Fixtures (currency rates, settings)
    /// 3. Mock endpoints
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        let mut all_tables = Vec::new();

        if self.include_all_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend(vec![
                schema.create_table_from_entity(entity::prelude::User),
                schema.create_table_from_entity(entity::prelude::Provider),
                schema.create_table_from_entity(entity::prelude::StandardModel),
                schema.create_table_from_entity(entity::prelude::StandardModelRequest),
                schema.create_table_from_entity(entity::prelude::ModelPrice),
                schema.create_table_from_entity(entity::prelude::Review),
                schema.create_table_from_entity(entity::prelude::CurrencyRate),
                schema.create_table_from_entity(entity::prelude::SystemSetting),
                schema.create_table_from_entity(entity::prelude::UserSettings),
                schema.create_table_from_entity(entity::prelude::UserApiKey),
                schema.create_table_from_entity(entity::prelude::EmailVerificationToken),
                schema.create_table_from_entity(entity::prelude::UserActionToken),
            ]);
        }

        all_tables.extend(self.tables);
        setup.with_tables(all_tables).await?;

        for (code, rate) in self.currency_rates {
            setup.currency().insert_rate(&code, rate).await?;
        }

        for (key, value) in self.settings {
            setup.setting().insert_setting(&key, &value).await?;
        }

        // Custom endpoints first so tests can stack an error mock ahead of a success mock
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for (status, body, expected) in self.exchange_rate_endpoints {
            let url = format!("{}{}", setup.server.url(), EXCHANGE_RATE_PATH);
            setup
                .setting()
                .insert_setting("exchange_rate_url", &url)
                .await?;

            mocks.push(
                setup
                    .server
                    .mock("GET", EXCHANGE_RATE_PATH)
                    .with_status(status as usize)
                    .with_header("content-type", "application/json")
                    .with_body(body)
                    .expect(expected)
                    .create(),
            );
        }

        setup.mocks = mocks;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_all_tables() {
        let result = TestBuilder::new().with_all_tables().build().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn chains_fixtures() {
        let result = TestBuilder::new()
            .with_all_tables()
            .with_currency_rate("EUR", 0.9)
            .with_setting("site_name", "Test Hub")
            .build()
            .await;
        assert!(result.is_ok());
    }
}

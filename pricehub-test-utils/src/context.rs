//! Test context returned by [`TestBuilder`](crate::TestBuilder).

use std::sync::Arc;

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use tower_sessions::{MemoryStore, Session};

use crate::error::TestError;

/// Live test environment.
///
/// Holds an in-memory SQLite database, an HTTP client, a session backed by a memory store,
/// and a mock HTTP server standing in for remote services (exchange rate API, provider
/// websites).
///
/// ```ignore
/// let test = TestBuilder::new().with_all_tables().build().await?;
///
/// let user = test.user().insert_user("alice@example.com").await?;
/// let state: AppState = test.to_app_state();
///
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Connection to the in-memory SQLite database
    pub db: DatabaseConnection,
    /// HTTP client used by services under test
    pub http_client: reqwest::Client,
    /// Session for authentication flows
    pub session: Session,

    pub(crate) server: ServerGuard,
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    /// Convert the database connection and HTTP client into any type constructible from them
    ///
    /// Lets integration tests build the application state without the test utilities
    /// depending on the main crate.
    pub fn to_app_state<T>(&self) -> T
    where
        T: From<(DatabaseConnection, reqwest::Client)>,
    {
        T::from((self.db.clone(), self.http_client.clone()))
    }

    /// Base URL of the mock HTTP server
    pub fn server_url(&self) -> String {
        self.server.url()
    }

    /// Mutable access to the mock server for tests registering mocks after `build()`
    pub fn server(&mut self) -> &mut ServerGuard {
        &mut self.server
    }

    pub(crate) async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            db,
            http_client: reqwest::Client::new(),
            session,
            server,
            mocks: Vec::new(),
        })
    }

    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Assert every mock registered through the builder was hit the expected number of times
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called as expected
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}

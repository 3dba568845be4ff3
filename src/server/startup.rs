use std::time::Duration;

use axum::http::{HeaderValue, Method};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_sessions::SessionManagerLayer;
use tower_sessions_redis_store::RedisStore;
use tracing_subscriber::EnvFilter;

use crate::server::{config::Config, error::Error};

const DB_CONNECT_ATTEMPTS: u32 = 5;
const DB_CONNECT_DELAY: Duration = Duration::from_secs(2);

/// Install the global tracing subscriber, `RUST_LOG` overrides the default level
pub fn init_tracing(config: &Config) {
    let default_level = if config.production { "info" } else { "debug" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connect to the database and run migrations
///
/// The connection is attempted 5 times, 2 seconds apart, since the database container may
/// still be starting.
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut attempt = 1;
    let db = loop {
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.sqlx_logging(false);

        match Database::connect(opt).await {
            Ok(db) => break db,
            Err(e) if attempt < DB_CONNECT_ATTEMPTS => {
                tracing::warn!(
                    "Database connection attempt {}/{} failed: {}",
                    attempt,
                    DB_CONNECT_ATTEMPTS,
                    e
                );
                attempt += 1;
                tokio::time::sleep(DB_CONNECT_DELAY).await;
            }
            Err(e) => return Err(e.into()),
        }
    };

    Migrator::up(&db, None).await?;

    tracing::info!("Database initialized");

    Ok(db)
}

/// Connect to Valkey/Redis and configure session management
pub async fn connect_to_session(
    config: &Config,
) -> Result<SessionManagerLayer<RedisStore<tower_sessions_redis_store::fred::prelude::Pool>>, Error>
{
    use time::Duration;
    use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
    use tower_sessions_redis_store::fred::prelude::*;

    let config = Config::from_url(&config.valkey_url)?;
    let pool = Pool::new(config, None, None, None, 6)?;

    pool.connect();
    pool.wait_for_connect().await?;

    // Plain http cookies only for local debug builds
    let session = SessionManagerLayer::new(RedisStore::new(pool))
        .with_secure(!cfg!(debug_assertions))
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)));

    Ok(session)
}

/// CORS for the configured browser origins, with credentials so the session cookie is sent
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid allowed origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Shared HTTP client for the exchange rate API and provider uptime probes
pub fn build_http_client() -> Result<reqwest::Client, Error> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("pricehub/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?;

    Ok(client)
}

use pricehub::server::{
    config::Config, error::Error, model::app::AppState, router, scheduler::Scheduler, startup,
};
use tower_http::services::ServeDir;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    startup::init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let http_client = startup::build_http_client()?;
    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&config).await?;
    let cors = startup::cors_layer(&config);

    tokio::fs::create_dir_all(config.static_dir.join("uploads")).await?;

    let scheduler = Scheduler::new(db.clone(), http_client.clone()).await?;
    scheduler.start().await?;

    let state = AppState {
        db,
        http_client,
        static_dir: config.static_dir.clone(),
        scheduler: Some(scheduler.clone()),
    };

    let app = router::routes()
        .with_state(state)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(session)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    tracing::info!("Shutting down scheduler");
    scheduler.shutdown().await?;

    Ok(())
}

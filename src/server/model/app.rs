use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::server::scheduler::Scheduler;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http_client: reqwest::Client,
    /// Root of the static file tree, proof uploads go to `uploads/` below it
    pub static_dir: PathBuf,
    /// Running job scheduler, `None` in tests
    pub scheduler: Option<Scheduler>,
}

impl From<(DatabaseConnection, reqwest::Client)> for AppState {
    fn from((db, http_client): (DatabaseConnection, reqwest::Client)) -> Self {
        Self {
            db,
            http_client,
            static_dir: PathBuf::from("static"),
            scheduler: None,
        }
    }
}

pub use sea_orm_migration::prelude::*;

mod m20251101_000001_user;
mod m20251101_000002_provider;
mod m20251101_000003_standard_model;
mod m20251101_000004_standard_model_request;
mod m20251101_000005_model_price;
mod m20251101_000006_review;
mod m20251101_000007_currency_rate;
mod m20251101_000008_user_workspace;
mod m20251101_000009_token;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_user::Migration),
            Box::new(m20251101_000002_provider::Migration),
            Box::new(m20251101_000003_standard_model::Migration),
            Box::new(m20251101_000004_standard_model_request::Migration),
            Box::new(m20251101_000005_model_price::Migration),
            Box::new(m20251101_000006_review::Migration),
            Box::new(m20251101_000007_currency_rate::Migration),
            Box::new(m20251101_000008_user_workspace::Migration),
            Box::new(m20251101_000009_token::Migration),
        ]
    }
}

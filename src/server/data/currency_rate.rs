use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveValue, ConnectionTrait, DbErr, EntityTrait, QueryOrder,
};

pub struct CurrencyRateRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CurrencyRateRepository<'a, C> {
    /// Creates a new instance of [`CurrencyRateRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<entity::currency_rate::Model>, DbErr> {
        entity::prelude::CurrencyRate::find()
            .order_by_asc(entity::currency_rate::Column::Code)
            .all(self.db)
            .await
    }

    pub async fn get(&self, code: &str) -> Result<Option<entity::currency_rate::Model>, DbErr> {
        entity::prelude::CurrencyRate::find_by_id(code.to_string())
            .one(self.db)
            .await
    }

    /// Inserts or updates rates (units per USD), stamping them with the current time
    pub async fn upsert_many(&self, rates: &[(String, f64)]) -> Result<(), DbErr> {
        if rates.is_empty() {
            return Ok(());
        }

        let now = Utc::now().naive_utc();
        let models = rates
            .iter()
            .map(|(code, rate)| entity::currency_rate::ActiveModel {
                code: ActiveValue::Set(code.clone()),
                rate_to_usd: ActiveValue::Set(*rate),
                updated_at: ActiveValue::Set(now),
            });

        entity::prelude::CurrencyRate::insert_many(models)
            .on_conflict(
                OnConflict::column(entity::currency_rate::Column::Code)
                    .update_columns([
                        entity::currency_rate::Column::RateToUsd,
                        entity::currency_rate::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    mod upsert_many {
        use pricehub_test_utils::prelude::*;

        use crate::server::data::currency_rate::CurrencyRateRepository;

        /// Expect existing rates to be overwritten and new ones inserted
        #[tokio::test]
        async fn inserts_and_updates() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_all_tables()
                .with_currency_rate("EUR", 0.5)
                .build()
                .await?;

            let rate_repo = CurrencyRateRepository::new(&test.db);
            rate_repo
                .upsert_many(&[("EUR".to_string(), 0.9), ("JPY".to_string(), 150.0)])
                .await?;

            let rates = rate_repo.list().await?;
            let pairs: Vec<(String, f64)> =
                rates.into_iter().map(|r| (r.code, r.rate_to_usd)).collect();

            assert_eq!(
                pairs,
                vec![("EUR".to_string(), 0.9), ("JPY".to_string(), 150.0)]
            );

            Ok(())
        }

        /// Expect an empty batch to be a no-op
        #[tokio::test]
        async fn accepts_empty_batch() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;

            let rate_repo = CurrencyRateRepository::new(&test.db);
            let result = rate_repo.upsert_many(&[]).await;

            assert!(result.is_ok());

            Ok(())
        }
    }
}

use chrono::{Duration, NaiveDateTime};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::price::PriceRepository, error::Error, service::retry::RetryContext,
};

/// Active prices older than this since their last verification expire
pub const PRICE_MAX_AGE_DAYS: i64 = 7;

pub struct PriceExpiryService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PriceExpiryService<'a> {
    /// Creates a new instance of [`PriceExpiryService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Marks active prices verified before `now - 7 days` as expired, returning the count
    pub async fn expire_stale(&self, now: NaiveDateTime) -> Result<u64, Error> {
        let cutoff = now - Duration::days(PRICE_MAX_AGE_DAYS);

        let mut ctx: RetryContext<()> = RetryContext::new();
        let db = self.db.clone();

        ctx.execute_with_retry("price expiry", |_| {
            let db = db.clone();

            Box::pin(async move {
                Ok(PriceRepository::new(&db)
                    .expire_verified_before(cutoff)
                    .await?)
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    mod expire_stale {
        use chrono::{Duration, Utc};
        use entity::sea_orm_active_enums::PriceStatus;
        use pricehub_test_utils::prelude::*;

        use crate::server::{data::price::PriceRepository, service::expiry::PriceExpiryService};

        /// Expect only prices verified more than a week ago to expire
        #[tokio::test]
        async fn expires_old_prices() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let provider = test.provider().insert_approved("Relay").await?;
            let model = test.standard_model().insert_model("gpt-4o").await?;
            let now = Utc::now().naive_utc();

            let stale = test
                .price()
                .insert_verified_at(provider.id, model.id, now - Duration::days(8))
                .await?;
            let fresh = test
                .price()
                .insert_verified_at(provider.id, model.id, now - Duration::days(6))
                .await?;

            let result = PriceExpiryService::new(&test.db).expire_stale(now).await;

            assert!(result.is_ok());
            assert_eq!(result.unwrap(), 1);

            let price_repo = PriceRepository::new(&test.db);
            let stale = price_repo.get(stale.id).await?.unwrap();
            let fresh = price_repo.get(fresh.id).await?.unwrap();
            assert_eq!(stale.status, PriceStatus::Expired);
            assert_eq!(fresh.status, PriceStatus::Active);

            Ok(())
        }
    }
}

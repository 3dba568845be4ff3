use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn currency(&self) -> CurrencyFixtures<'_> {
        CurrencyFixtures { setup: self }
    }
}

pub struct CurrencyFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> CurrencyFixtures<'a> {
    pub async fn insert_rate(
        &self,
        code: &str,
        rate_to_usd: f64,
    ) -> Result<entity::currency_rate::Model, TestError> {
        Ok(
            entity::prelude::CurrencyRate::insert(entity::currency_rate::ActiveModel {
                code: ActiveValue::Set(code.to_string()),
                rate_to_usd: ActiveValue::Set(rate_to_usd),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}

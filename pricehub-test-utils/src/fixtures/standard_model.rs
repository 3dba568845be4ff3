use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn standard_model(&self) -> StandardModelFixtures<'_> {
        StandardModelFixtures { setup: self }
    }
}

pub struct StandardModelFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> StandardModelFixtures<'a> {
    /// Insert a standard model without official pricing
    pub async fn insert_model(
        &self,
        name: &str,
    ) -> Result<entity::standard_model::Model, TestError> {
        self.insert_ranked(name, false, 100, 0.0).await
    }

    /// Insert a standard model with explicit highlight ordering fields
    pub async fn insert_ranked(
        &self,
        name: &str,
        is_featured: bool,
        rank_hint: i32,
        popularity_score: f64,
    ) -> Result<entity::standard_model::Model, TestError> {
        Ok(
            entity::prelude::StandardModel::insert(entity::standard_model::ActiveModel {
                name: ActiveValue::Set(name.to_string()),
                vendor: ActiveValue::Set(Some("TestVendor".to_string())),
                official_input_price: ActiveValue::Set(None),
                official_output_price: ActiveValue::Set(None),
                official_currency: ActiveValue::Set("USD".to_string()),
                is_featured: ActiveValue::Set(is_featured),
                rank_hint: ActiveValue::Set(rank_hint),
                popularity_score: ActiveValue::Set(popularity_score),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert a featured standard model with an official price
    pub async fn insert_with_official_price(
        &self,
        name: &str,
        input_price: f64,
        output_price: f64,
        currency: &str,
    ) -> Result<entity::standard_model::Model, TestError> {
        Ok(
            entity::prelude::StandardModel::insert(entity::standard_model::ActiveModel {
                name: ActiveValue::Set(name.to_string()),
                vendor: ActiveValue::Set(Some("TestVendor".to_string())),
                official_input_price: ActiveValue::Set(Some(input_price)),
                official_output_price: ActiveValue::Set(Some(output_price)),
                official_currency: ActiveValue::Set(currency.to_string()),
                is_featured: ActiveValue::Set(true),
                rank_hint: ActiveValue::Set(100),
                popularity_score: ActiveValue::Set(0.0),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}

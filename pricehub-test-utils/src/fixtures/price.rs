use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::PriceStatus;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn price(&self) -> PriceFixtures<'_> {
        PriceFixtures { setup: self }
    }
}

pub struct PriceFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> PriceFixtures<'a> {
    /// Insert a price; active prices are stamped as verified now
    pub async fn insert_price(
        &self,
        provider_id: i32,
        standard_model_id: i32,
        input_price: f64,
        output_price: f64,
        currency: &str,
        status: PriceStatus,
    ) -> Result<entity::model_price::Model, TestError> {
        let verified_at = match status {
            PriceStatus::Active => Some(Utc::now().naive_utc()),
            _ => None,
        };

        self.insert(
            provider_id,
            standard_model_id,
            None,
            input_price,
            output_price,
            currency,
            status,
            verified_at,
        )
        .await
    }

    /// Insert an active price verified at the given time
    pub async fn insert_verified_at(
        &self,
        provider_id: i32,
        standard_model_id: i32,
        verified_at: NaiveDateTime,
    ) -> Result<entity::model_price::Model, TestError> {
        self.insert(
            provider_id,
            standard_model_id,
            None,
            1.0,
            2.0,
            "USD",
            PriceStatus::Active,
            Some(verified_at),
        )
        .await
    }

    /// Insert a pending price submitted by `submitter_id`
    pub async fn insert_submitted(
        &self,
        provider_id: i32,
        standard_model_id: i32,
        submitter_id: i32,
    ) -> Result<entity::model_price::Model, TestError> {
        self.insert(
            provider_id,
            standard_model_id,
            Some(submitter_id),
            1.0,
            2.0,
            "USD",
            PriceStatus::Pending,
            None,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert(
        &self,
        provider_id: i32,
        standard_model_id: i32,
        submitter_id: Option<i32>,
        input_price: f64,
        output_price: f64,
        currency: &str,
        status: PriceStatus,
        verified_at: Option<NaiveDateTime>,
    ) -> Result<entity::model_price::Model, TestError> {
        Ok(
            entity::prelude::ModelPrice::insert(entity::model_price::ActiveModel {
                provider_id: ActiveValue::Set(provider_id),
                standard_model_id: ActiveValue::Set(standard_model_id),
                submitter_id: ActiveValue::Set(submitter_id),
                provider_model_name: ActiveValue::Set(None),
                currency: ActiveValue::Set(currency.to_string()),
                input_price: ActiveValue::Set(input_price),
                output_price: ActiveValue::Set(output_price),
                cache_hit_input_price: ActiveValue::Set(None),
                cache_hit_output_price: ActiveValue::Set(None),
                proof_type: ActiveValue::Set(Some("text".to_string())),
                proof_content: ActiveValue::Set(Some("pricing page".to_string())),
                proof_img_path: ActiveValue::Set(None),
                status: ActiveValue::Set(status),
                verified_at: ActiveValue::Set(verified_at),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}

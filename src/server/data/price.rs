use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::{PriceStatus, ProviderStatus};
use sea_orm::{
    sea_query::Expr, ActiveEnum, ActiveModelTrait, ActiveValue, ColumnTrait, Condition,
    ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

/// Fields of a submitted price; every submission starts out `pending`
#[derive(Clone, Debug, Default)]
pub struct NewPrice {
    pub provider_id: i32,
    pub standard_model_id: i32,
    pub submitter_id: Option<i32>,
    pub provider_model_name: Option<String>,
    pub currency: String,
    pub input_price: f64,
    pub output_price: f64,
    pub cache_hit_input_price: Option<f64>,
    pub cache_hit_output_price: Option<f64>,
    pub proof_type: Option<String>,
    pub proof_content: Option<String>,
    pub proof_img_path: Option<String>,
}

/// Pending price with the names moderators need to review it
pub struct PendingPrice {
    pub price: entity::model_price::Model,
    pub provider_name: String,
    pub model_name: String,
}

pub struct PriceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PriceRepository<'a, C> {
    /// Creates a new instance of [`PriceRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, price: NewPrice) -> Result<entity::model_price::Model, DbErr> {
        entity::model_price::ActiveModel {
            provider_id: ActiveValue::Set(price.provider_id),
            standard_model_id: ActiveValue::Set(price.standard_model_id),
            submitter_id: ActiveValue::Set(price.submitter_id),
            provider_model_name: ActiveValue::Set(price.provider_model_name),
            currency: ActiveValue::Set(price.currency),
            input_price: ActiveValue::Set(price.input_price),
            output_price: ActiveValue::Set(price.output_price),
            cache_hit_input_price: ActiveValue::Set(price.cache_hit_input_price),
            cache_hit_output_price: ActiveValue::Set(price.cache_hit_output_price),
            proof_type: ActiveValue::Set(price.proof_type),
            proof_content: ActiveValue::Set(price.proof_content),
            proof_img_path: ActiveValue::Set(price.proof_img_path),
            status: ActiveValue::Set(PriceStatus::Pending),
            verified_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, price_id: i32) -> Result<Option<entity::model_price::Model>, DbErr> {
        entity::prelude::ModelPrice::find_by_id(price_id)
            .one(self.db)
            .await
    }

    /// Active prices of a model whose provider is approved or official, in id order
    pub async fn list_visible_for_model(
        &self,
        standard_model_id: i32,
    ) -> Result<Vec<(entity::model_price::Model, entity::provider::Model)>, DbErr> {
        let rows = entity::prelude::ModelPrice::find()
            .find_also_related(entity::prelude::Provider)
            .filter(entity::model_price::Column::StandardModelId.eq(standard_model_id))
            .filter(entity::model_price::Column::Status.eq(PriceStatus::Active))
            .filter(
                Condition::any()
                    .add(entity::provider::Column::Status.eq(ProviderStatus::Approved))
                    .add(entity::provider::Column::IsOfficial.eq(true)),
            )
            .order_by_asc(entity::model_price::Column::Id)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(price, provider)| provider.map(|provider| (price, provider)))
            .collect())
    }

    pub async fn list_pending(&self) -> Result<Vec<PendingPrice>, DbErr> {
        let prices = entity::prelude::ModelPrice::find()
            .filter(entity::model_price::Column::Status.eq(PriceStatus::Pending))
            .order_by_asc(entity::model_price::Column::Id)
            .all(self.db)
            .await?;

        let provider_ids: Vec<i32> = prices.iter().map(|p| p.provider_id).collect();
        let model_ids: Vec<i32> = prices.iter().map(|p| p.standard_model_id).collect();

        let provider_names: HashMap<i32, String> = entity::prelude::Provider::find()
            .filter(entity::provider::Column::Id.is_in(provider_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let model_names: HashMap<i32, String> = entity::prelude::StandardModel::find()
            .filter(entity::standard_model::Column::Id.is_in(model_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        Ok(prices
            .into_iter()
            .filter_map(|price| {
                let provider_name = provider_names.get(&price.provider_id)?.clone();
                let model_name = model_names.get(&price.standard_model_id)?.clone();

                Some(PendingPrice {
                    price,
                    provider_name,
                    model_name,
                })
            })
            .collect())
    }

    pub async fn update_status(
        &self,
        price_id: i32,
        status: PriceStatus,
        verified_at: Option<NaiveDateTime>,
    ) -> Result<entity::model_price::Model, DbErr> {
        entity::model_price::ActiveModel {
            id: ActiveValue::Unchanged(price_id),
            status: ActiveValue::Set(status),
            verified_at: match verified_at {
                Some(at) => ActiveValue::Set(Some(at)),
                None => ActiveValue::NotSet,
            },
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Partial update, `None` leaves the column untouched
    pub async fn update_amounts(
        &self,
        price_id: i32,
        input_price: Option<f64>,
        output_price: Option<f64>,
        currency: Option<String>,
    ) -> Result<entity::model_price::Model, DbErr> {
        let mut price = entity::model_price::ActiveModel {
            id: ActiveValue::Unchanged(price_id),
            ..Default::default()
        };

        if let Some(input_price) = input_price {
            price.input_price = ActiveValue::Set(input_price);
        }
        if let Some(output_price) = output_price {
            price.output_price = ActiveValue::Set(output_price);
        }
        if let Some(currency) = currency {
            price.currency = ActiveValue::Set(currency);
        }

        if !price.is_changed() {
            return self
                .get(price_id)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound(format!("model price {}", price_id)));
        }

        price.update(self.db).await
    }

    /// Marks active prices verified before `cutoff` as expired, returning how many changed
    pub async fn expire_verified_before(&self, cutoff: NaiveDateTime) -> Result<u64, DbErr> {
        let result = entity::prelude::ModelPrice::update_many()
            .col_expr(
                entity::model_price::Column::Status,
                Expr::value(PriceStatus::Expired.to_value()),
            )
            .filter(entity::model_price::Column::Status.eq(PriceStatus::Active))
            .filter(entity::model_price::Column::VerifiedAt.lt(cutoff))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    mod list_visible_for_model {
        use entity::sea_orm_active_enums::{PriceStatus, ProviderStatus};
        use pricehub_test_utils::prelude::*;

        use crate::server::data::price::PriceRepository;

        /// Expect only active prices from approved or official providers
        #[tokio::test]
        async fn filters_by_moderation_status() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let model = test.standard_model().insert_model("gpt-4o").await?;
            let approved = test.provider().insert_approved("Approved").await?;
            let official = test.provider().insert_official("Official").await?;
            let pending = test
                .provider()
                .insert_provider("Pending", ProviderStatus::Pending, None)
                .await?;

            let visible = test
                .price()
                .insert_price(approved.id, model.id, 1.0, 2.0, "USD", PriceStatus::Active)
                .await?;
            let from_official = test
                .price()
                .insert_price(official.id, model.id, 1.5, 2.5, "USD", PriceStatus::Active)
                .await?;
            test.price()
                .insert_price(pending.id, model.id, 0.5, 1.0, "USD", PriceStatus::Active)
                .await?;
            test.price()
                .insert_price(approved.id, model.id, 0.1, 0.2, "USD", PriceStatus::Pending)
                .await?;

            let price_repo = PriceRepository::new(&test.db);
            let rows = price_repo.list_visible_for_model(model.id).await?;

            let ids: Vec<i32> = rows.iter().map(|(price, _)| price.id).collect();
            assert_eq!(ids, vec![visible.id, from_official.id]);

            Ok(())
        }
    }

    mod expire_verified_before {
        use chrono::{Duration, Utc};
        use entity::sea_orm_active_enums::PriceStatus;
        use pricehub_test_utils::prelude::*;

        use crate::server::data::price::PriceRepository;

        /// Expect only stale active prices to expire
        #[tokio::test]
        async fn expires_stale_prices() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let model = test.standard_model().insert_model("gpt-4o").await?;
            let provider = test.provider().insert_approved("Acme").await?;

            let now = Utc::now().naive_utc();
            let stale = test
                .price()
                .insert_verified_at(provider.id, model.id, now - Duration::days(8))
                .await?;
            let fresh = test
                .price()
                .insert_verified_at(provider.id, model.id, now - Duration::days(1))
                .await?;

            let price_repo = PriceRepository::new(&test.db);
            let expired = price_repo
                .expire_verified_before(now - Duration::days(7))
                .await?;

            assert_eq!(expired, 1);
            let stale = price_repo.get(stale.id).await?.unwrap();
            let fresh = price_repo.get(fresh.id).await?.unwrap();
            assert_eq!(stale.status, PriceStatus::Expired);
            assert_eq!(fresh.status, PriceStatus::Active);

            Ok(())
        }
    }

    mod update_amounts {
        use entity::sea_orm_active_enums::PriceStatus;
        use pricehub_test_utils::prelude::*;

        use crate::server::data::price::PriceRepository;

        /// Expect omitted fields to keep their values
        #[tokio::test]
        async fn updates_only_given_fields() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let model = test.standard_model().insert_model("gpt-4o").await?;
            let provider = test.provider().insert_approved("Acme").await?;
            let price = test
                .price()
                .insert_price(provider.id, model.id, 1.0, 2.0, "USD", PriceStatus::Pending)
                .await?;

            let price_repo = PriceRepository::new(&test.db);
            let updated = price_repo
                .update_amounts(price.id, Some(3.0), None, Some("EUR".to_string()))
                .await?;

            assert_eq!(updated.input_price, 3.0);
            assert_eq!(updated.output_price, 2.0);
            assert_eq!(updated.currency, "EUR");

            Ok(())
        }
    }
}

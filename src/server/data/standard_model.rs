use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::model::standard_model::{CreateStandardModelDto, UpdateStandardModelDto};

pub struct StandardModelRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StandardModelRepository<'a, C> {
    /// Creates a new instance of [`StandardModelRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a standard model, filling omitted display fields with the column defaults
    pub async fn create(
        &self,
        model: CreateStandardModelDto,
    ) -> Result<entity::standard_model::Model, DbErr> {
        entity::standard_model::ActiveModel {
            name: ActiveValue::Set(model.name),
            vendor: ActiveValue::Set(model.vendor),
            official_input_price: ActiveValue::Set(model.official_input_price),
            official_output_price: ActiveValue::Set(model.official_output_price),
            official_currency: ActiveValue::Set(
                model.official_currency.unwrap_or_else(|| "USD".to_string()),
            ),
            is_featured: ActiveValue::Set(model.is_featured.unwrap_or(false)),
            rank_hint: ActiveValue::Set(model.rank_hint.unwrap_or(100)),
            popularity_score: ActiveValue::Set(model.popularity_score.unwrap_or(0.0)),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Creates a model from just a name and vendor
    pub async fn create_named(
        &self,
        name: String,
        vendor: Option<String>,
    ) -> Result<entity::standard_model::Model, DbErr> {
        self.create(CreateStandardModelDto {
            name,
            vendor,
            official_input_price: None,
            official_output_price: None,
            official_currency: None,
            is_featured: None,
            rank_hint: None,
            popularity_score: None,
        })
        .await
    }

    pub async fn get(
        &self,
        model_id: i32,
    ) -> Result<Option<entity::standard_model::Model>, DbErr> {
        entity::prelude::StandardModel::find_by_id(model_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<entity::standard_model::Model>, DbErr> {
        entity::prelude::StandardModel::find()
            .filter(entity::standard_model::Column::Name.eq(name))
            .order_by_asc(entity::standard_model::Column::Id)
            .one(self.db)
            .await
    }

    pub async fn list(&self) -> Result<Vec<entity::standard_model::Model>, DbErr> {
        entity::prelude::StandardModel::find()
            .order_by_asc(entity::standard_model::Column::Id)
            .all(self.db)
            .await
    }

    /// Models for the home page: featured first, then by rank hint, popularity and id
    pub async fn list_highlighted(
        &self,
        limit: u64,
    ) -> Result<Vec<entity::standard_model::Model>, DbErr> {
        entity::prelude::StandardModel::find()
            .order_by_desc(entity::standard_model::Column::IsFeatured)
            .order_by_asc(entity::standard_model::Column::RankHint)
            .order_by_desc(entity::standard_model::Column::PopularityScore)
            .order_by_asc(entity::standard_model::Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// Applies the present fields of `changes`
    ///
    /// Returns `None` if the model does not exist.
    pub async fn update(
        &self,
        model_id: i32,
        changes: UpdateStandardModelDto,
    ) -> Result<Option<entity::standard_model::Model>, DbErr> {
        let Some(existing) = self.get(model_id).await? else {
            return Ok(None);
        };

        let mut model: entity::standard_model::ActiveModel = existing.clone().into();

        if let Some(name) = changes.name {
            model.name = ActiveValue::Set(name);
        }
        if let Some(vendor) = changes.vendor {
            model.vendor = ActiveValue::Set(Some(vendor));
        }
        if let Some(price) = changes.official_input_price {
            model.official_input_price = ActiveValue::Set(Some(price));
        }
        if let Some(price) = changes.official_output_price {
            model.official_output_price = ActiveValue::Set(Some(price));
        }
        if let Some(currency) = changes.official_currency {
            model.official_currency = ActiveValue::Set(currency);
        }
        if let Some(is_featured) = changes.is_featured {
            model.is_featured = ActiveValue::Set(is_featured);
        }
        if let Some(rank_hint) = changes.rank_hint {
            model.rank_hint = ActiveValue::Set(rank_hint);
        }
        if let Some(score) = changes.popularity_score {
            model.popularity_score = ActiveValue::Set(score);
        }

        if !model.is_changed() {
            return Ok(Some(existing));
        }

        Ok(Some(model.update(self.db).await?))
    }
}

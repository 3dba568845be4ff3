use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

pub struct ReviewRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ReviewRepository<'a, C> {
    /// Creates a new instance of [`ReviewRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        provider_id: i32,
        user_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<entity::review::Model, DbErr> {
        entity::review::ActiveModel {
            provider_id: ActiveValue::Set(provider_id),
            user_id: ActiveValue::Set(Some(user_id)),
            rating: ActiveValue::Set(rating),
            comment: ActiveValue::Set(comment),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Reviews of a provider, newest first
    pub async fn list_by_provider(
        &self,
        provider_id: i32,
    ) -> Result<Vec<entity::review::Model>, DbErr> {
        entity::prelude::Review::find()
            .filter(entity::review::Column::ProviderId.eq(provider_id))
            .order_by_desc(entity::review::Column::CreatedAt)
            .order_by_desc(entity::review::Column::Id)
            .all(self.db)
            .await
    }
}

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct ApiKeyRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ApiKeyRepository<'a, C> {
    /// Creates a new instance of [`ApiKeyRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        provider_id: i32,
        api_key: String,
        is_encrypted: bool,
        note: Option<String>,
    ) -> Result<entity::user_api_key::Model, DbErr> {
        entity::user_api_key::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            provider_id: ActiveValue::Set(provider_id),
            api_key: ActiveValue::Set(api_key),
            is_encrypted: ActiveValue::Set(is_encrypted),
            note: ActiveValue::Set(note),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Keys of a user joined with their provider
    pub async fn list_by_user_with_provider(
        &self,
        user_id: i32,
    ) -> Result<Vec<(entity::user_api_key::Model, Option<entity::provider::Model>)>, DbErr> {
        entity::prelude::UserApiKey::find()
            .find_also_related(entity::prelude::Provider)
            .filter(entity::user_api_key::Column::UserId.eq(user_id))
            .order_by_asc(entity::user_api_key::Column::Id)
            .all(self.db)
            .await
    }

    /// A key only when it belongs to `user_id`
    pub async fn get_owned(
        &self,
        key_id: i32,
        user_id: i32,
    ) -> Result<Option<entity::user_api_key::Model>, DbErr> {
        entity::prelude::UserApiKey::find_by_id(key_id)
            .filter(entity::user_api_key::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn delete(&self, key_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::UserApiKey::delete_by_id(key_id)
            .exec(self.db)
            .await
    }

    pub async fn exists_for_provider(&self, provider_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::UserApiKey::find()
            .filter(entity::user_api_key::Column::ProviderId.eq(provider_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }
}

use chrono::Utc;
use entity::sea_orm_active_enums::ProviderStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, QueryFilter, QueryOrder,
};

/// Fields of a provider created by a user
#[derive(Clone, Debug, Default)]
pub struct NewProvider {
    pub name: String,
    pub website: Option<String>,
    pub owner_id: Option<i32>,
    pub openai_base_url: Option<String>,
    pub gemini_base_url: Option<String>,
    pub claude_base_url: Option<String>,
    pub proof_type: Option<String>,
    pub proof_content: Option<String>,
}

/// Fields an owner may change, `None` leaves the column untouched
#[derive(Clone, Debug, Default)]
pub struct ProviderChanges {
    pub name: Option<String>,
    pub website: Option<String>,
    pub openai_base_url: Option<String>,
    pub gemini_base_url: Option<String>,
    pub claude_base_url: Option<String>,
}

fn set_if_some<T>(value: Option<T>) -> ActiveValue<T>
where
    T: Into<sea_orm::Value>,
{
    match value {
        Some(v) => ActiveValue::Set(v),
        None => ActiveValue::NotSet,
    }
}

pub struct ProviderRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProviderRepository<'a, C> {
    /// Creates a new instance of [`ProviderRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a non-official provider with full uptime and no score
    pub async fn create(
        &self,
        provider: NewProvider,
        status: ProviderStatus,
    ) -> Result<entity::provider::Model, DbErr> {
        entity::provider::ActiveModel {
            name: ActiveValue::Set(provider.name),
            website: ActiveValue::Set(provider.website),
            is_official: ActiveValue::Set(false),
            owner_id: ActiveValue::Set(provider.owner_id),
            status: ActiveValue::Set(status),
            openai_base_url: ActiveValue::Set(provider.openai_base_url),
            gemini_base_url: ActiveValue::Set(provider.gemini_base_url),
            claude_base_url: ActiveValue::Set(provider.claude_base_url),
            proof_type: ActiveValue::Set(provider.proof_type),
            proof_content: ActiveValue::Set(provider.proof_content),
            avg_score: ActiveValue::Set(0.0),
            uptime_rate: ActiveValue::Set(100.0),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, provider_id: i32) -> Result<Option<entity::provider::Model>, DbErr> {
        entity::prelude::Provider::find_by_id(provider_id)
            .one(self.db)
            .await
    }

    pub async fn find_approved_by_name(
        &self,
        name: &str,
    ) -> Result<Option<entity::provider::Model>, DbErr> {
        entity::prelude::Provider::find()
            .filter(entity::provider::Column::Name.eq(name))
            .filter(entity::provider::Column::Status.eq(ProviderStatus::Approved))
            .order_by_asc(entity::provider::Column::Id)
            .one(self.db)
            .await
    }

    pub async fn list_approved(&self) -> Result<Vec<entity::provider::Model>, DbErr> {
        entity::prelude::Provider::find()
            .filter(entity::provider::Column::Status.eq(ProviderStatus::Approved))
            .order_by_asc(entity::provider::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn list_by_owner(
        &self,
        owner_id: i32,
    ) -> Result<Vec<entity::provider::Model>, DbErr> {
        entity::prelude::Provider::find()
            .filter(entity::provider::Column::OwnerId.eq(owner_id))
            .order_by_asc(entity::provider::Column::Id)
            .all(self.db)
            .await
    }

    /// Pending providers with their submitting user, if still present
    pub async fn list_pending_with_owner(
        &self,
    ) -> Result<Vec<(entity::provider::Model, Option<entity::user::Model>)>, DbErr> {
        entity::prelude::Provider::find()
            .find_also_related(entity::prelude::User)
            .filter(entity::provider::Column::Status.eq(ProviderStatus::Pending))
            .order_by_asc(entity::provider::Column::Id)
            .all(self.db)
            .await
    }

    /// Providers with a website to probe for uptime
    pub async fn list_with_website(&self) -> Result<Vec<entity::provider::Model>, DbErr> {
        entity::prelude::Provider::find()
            .filter(entity::provider::Column::Website.is_not_null())
            .filter(entity::provider::Column::Website.ne(""))
            .order_by_asc(entity::provider::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn update_status(
        &self,
        provider_id: i32,
        status: ProviderStatus,
    ) -> Result<entity::provider::Model, DbErr> {
        entity::provider::ActiveModel {
            id: ActiveValue::Unchanged(provider_id),
            status: ActiveValue::Set(status),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn update_details(
        &self,
        provider_id: i32,
        changes: ProviderChanges,
    ) -> Result<entity::provider::Model, DbErr> {
        entity::provider::ActiveModel {
            id: ActiveValue::Unchanged(provider_id),
            name: set_if_some(changes.name),
            website: set_if_some(changes.website.map(Some)),
            openai_base_url: set_if_some(changes.openai_base_url.map(Some)),
            gemini_base_url: set_if_some(changes.gemini_base_url.map(Some)),
            claude_base_url: set_if_some(changes.claude_base_url.map(Some)),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Moves the provider to `pending` with the given proof
    pub async fn submit_for_review(
        &self,
        provider_id: i32,
        proof_type: String,
        proof_content: String,
    ) -> Result<entity::provider::Model, DbErr> {
        entity::provider::ActiveModel {
            id: ActiveValue::Unchanged(provider_id),
            status: ActiveValue::Set(ProviderStatus::Pending),
            proof_type: ActiveValue::Set(Some(proof_type)),
            proof_content: ActiveValue::Set(Some(proof_content)),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn update_uptime(
        &self,
        provider_id: i32,
        uptime_rate: f64,
    ) -> Result<entity::provider::Model, DbErr> {
        entity::provider::ActiveModel {
            id: ActiveValue::Unchanged(provider_id),
            uptime_rate: ActiveValue::Set(uptime_rate),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn update_avg_score(
        &self,
        provider_id: i32,
        avg_score: f64,
    ) -> Result<entity::provider::Model, DbErr> {
        entity::provider::ActiveModel {
            id: ActiveValue::Unchanged(provider_id),
            avg_score: ActiveValue::Set(avg_score),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Deletes a provider, its prices and reviews cascade
    pub async fn delete(&self, provider_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Provider::delete_by_id(provider_id)
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    mod find_approved_by_name {
        use entity::sea_orm_active_enums::ProviderStatus;
        use pricehub_test_utils::prelude::*;

        use crate::server::data::provider::ProviderRepository;

        /// Expect only approved providers to match
        #[tokio::test]
        async fn ignores_unapproved_providers() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            test.provider()
                .insert_provider("Acme", ProviderStatus::Pending, None)
                .await?;

            let provider_repo = ProviderRepository::new(&test.db);

            assert!(provider_repo.find_approved_by_name("Acme").await?.is_none());

            let approved = test.provider().insert_approved("Acme").await?;
            let found = provider_repo.find_approved_by_name("Acme").await?;

            assert_eq!(found.map(|p| p.id), Some(approved.id));

            Ok(())
        }
    }

    mod list_pending_with_owner {
        use entity::sea_orm_active_enums::ProviderStatus;
        use pricehub_test_utils::prelude::*;

        use crate::server::data::provider::ProviderRepository;

        /// Expect pending providers to be returned with their owner
        #[tokio::test]
        async fn joins_owner() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let owner = test.user().insert_user("owner@example.com").await?;
            test.provider()
                .insert_provider("Pending", ProviderStatus::Pending, Some(owner.id))
                .await?;
            test.provider()
                .insert_provider("Private", ProviderStatus::Private, Some(owner.id))
                .await?;

            let provider_repo = ProviderRepository::new(&test.db);
            let pending = provider_repo.list_pending_with_owner().await?;

            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].0.name, "Pending");
            assert_eq!(
                pending[0].1.as_ref().map(|u| u.email.as_str()),
                Some("owner@example.com")
            );

            Ok(())
        }
    }

    mod update_details {
        use entity::sea_orm_active_enums::ProviderStatus;
        use pricehub_test_utils::prelude::*;

        use crate::server::data::provider::{ProviderChanges, ProviderRepository};

        /// Expect only the provided fields to change
        #[tokio::test]
        async fn keeps_omitted_fields() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let provider = test
                .provider()
                .insert_provider("Acme", ProviderStatus::Private, None)
                .await?;

            let provider_repo = ProviderRepository::new(&test.db);
            let updated = provider_repo
                .update_details(
                    provider.id,
                    ProviderChanges {
                        website: Some("https://acme.example".to_string()),
                        ..Default::default()
                    },
                )
                .await?;

            assert_eq!(updated.name, "Acme");
            assert_eq!(updated.website.as_deref(), Some("https://acme.example"));
            assert_eq!(updated.openai_base_url, provider.openai_base_url);

            Ok(())
        }
    }
}

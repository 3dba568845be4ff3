use chrono::Utc;
use entity::sea_orm_active_enums::ProviderStatus;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn provider(&self) -> ProviderFixtures<'_> {
        ProviderFixtures { setup: self }
    }
}

pub struct ProviderFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> ProviderFixtures<'a> {
    /// Insert a provider with the given moderation status and optional owner
    pub async fn insert_provider(
        &self,
        name: &str,
        status: ProviderStatus,
        owner_id: Option<i32>,
    ) -> Result<entity::provider::Model, TestError> {
        self.insert(name, status, owner_id, false, None).await
    }

    /// Insert an approved provider without owner
    pub async fn insert_approved(&self, name: &str) -> Result<entity::provider::Model, TestError> {
        self.insert(name, ProviderStatus::Approved, None, false, None)
            .await
    }

    /// Insert an official provider, visible regardless of moderation status
    pub async fn insert_official(&self, name: &str) -> Result<entity::provider::Model, TestError> {
        self.insert(name, ProviderStatus::Private, None, true, None)
            .await
    }

    /// Insert an approved provider whose website points at `website`
    pub async fn insert_with_website(
        &self,
        name: &str,
        website: &str,
    ) -> Result<entity::provider::Model, TestError> {
        self.insert(
            name,
            ProviderStatus::Approved,
            None,
            false,
            Some(website.to_string()),
        )
        .await
    }

    async fn insert(
        &self,
        name: &str,
        status: ProviderStatus,
        owner_id: Option<i32>,
        is_official: bool,
        website: Option<String>,
    ) -> Result<entity::provider::Model, TestError> {
        Ok(entity::prelude::Provider::insert(entity::provider::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            website: ActiveValue::Set(website),
            is_official: ActiveValue::Set(is_official),
            owner_id: ActiveValue::Set(owner_id),
            status: ActiveValue::Set(status),
            openai_base_url: ActiveValue::Set(Some(format!(
                "https://{}.example.com/v1",
                name.to_lowercase().replace(' ', "-")
            ))),
            gemini_base_url: ActiveValue::Set(None),
            claude_base_url: ActiveValue::Set(None),
            proof_type: ActiveValue::Set(None),
            proof_content: ActiveValue::Set(None),
            avg_score: ActiveValue::Set(0.0),
            uptime_rate: ActiveValue::Set(100.0),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }
}

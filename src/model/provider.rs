use chrono::NaiveDateTime;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};

/// Public view of a provider
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProviderDto {
    pub id: i32,
    pub name: String,
    pub website: Option<String>,
    pub is_official: bool,
    /// `private`, `pending`, `approved` or `rejected`
    pub status: String,
    pub openai_base_url: Option<String>,
    pub gemini_base_url: Option<String>,
    pub claude_base_url: Option<String>,
    pub avg_score: f64,
    pub uptime_rate: f64,
    pub created_at: NaiveDateTime,
}

impl From<entity::provider::Model> for ProviderDto {
    fn from(provider: entity::provider::Model) -> Self {
        Self {
            id: provider.id,
            name: provider.name,
            website: provider.website,
            is_official: provider.is_official,
            status: provider.status.to_value(),
            openai_base_url: provider.openai_base_url,
            gemini_base_url: provider.gemini_base_url,
            claude_base_url: provider.claude_base_url,
            avg_score: provider.avg_score,
            uptime_rate: provider.uptime_rate,
            created_at: provider.created_at,
        }
    }
}

/// Provider as listed in its owner's workspace
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OwnedProviderDto {
    pub id: i32,
    pub name: String,
    pub website: Option<String>,
    pub status: String,
    pub openai_base_url: Option<String>,
    pub gemini_base_url: Option<String>,
    pub claude_base_url: Option<String>,
}

impl From<entity::provider::Model> for OwnedProviderDto {
    fn from(provider: entity::provider::Model) -> Self {
        Self {
            id: provider.id,
            name: provider.name,
            website: provider.website,
            status: provider.status.to_value(),
            openai_base_url: provider.openai_base_url,
            gemini_base_url: provider.gemini_base_url,
            claude_base_url: provider.claude_base_url,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateProviderDto {
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub openai_base_url: Option<String>,
    #[serde(default)]
    pub gemini_base_url: Option<String>,
    #[serde(default)]
    pub claude_base_url: Option<String>,
    /// Submit straight to moderation instead of keeping the provider private
    #[serde(default)]
    pub submit_for_review: bool,
    #[serde(default)]
    pub proof_type: Option<String>,
    #[serde(default)]
    pub proof_content: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateProviderDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub openai_base_url: Option<String>,
    #[serde(default)]
    pub gemini_base_url: Option<String>,
    #[serde(default)]
    pub claude_base_url: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProviderProofDto {
    pub proof_type: String,
    pub proof_content: String,
}

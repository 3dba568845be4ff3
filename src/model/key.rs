use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiKeyDto {
    pub id: i32,
    pub provider_id: i32,
    pub provider_name: String,
    /// Ciphertext when `is_encrypted`, the raw key otherwise
    pub api_key: String,
    pub is_encrypted: bool,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
    pub openai_base_url: Option<String>,
    pub gemini_base_url: Option<String>,
    pub claude_base_url: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AddApiKeyDto {
    pub provider_id: i32,
    pub api_key: String,
    pub is_encrypted: bool,
    #[serde(default)]
    pub note: Option<String>,
}

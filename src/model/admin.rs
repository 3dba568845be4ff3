use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PendingPriceDto {
    pub id: i32,
    pub provider_name: String,
    pub model_name: String,
    pub provider_model_name: Option<String>,
    pub input_price: f64,
    pub output_price: f64,
    pub currency: String,
    pub proof_type: Option<String>,
    pub proof_content: Option<String>,
    pub proof_img_path: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PendingProviderDto {
    pub id: i32,
    pub name: String,
    pub website: Option<String>,
    pub openai_base_url: Option<String>,
    pub gemini_base_url: Option<String>,
    pub claude_base_url: Option<String>,
    pub proof_type: Option<String>,
    pub proof_content: Option<String>,
    pub submitter_email: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PendingModelRequestDto {
    pub id: i32,
    pub requested_name: String,
    pub vendor: Option<String>,
    pub requester_email: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Optional overrides applied when turning a request into a standard model
#[derive(Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApproveModelRequestDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModelApprovedDto {
    pub message: String,
    pub model_id: i32,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RoleUpdateDto {
    pub role: String,
}

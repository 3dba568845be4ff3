use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Raw file part of a multipart submission
#[derive(Clone, Debug, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Multipart form of `POST /api/prices/submit`
///
/// Either `provider_id` or `provider_name` selects the provider, and either
/// `standard_model_id` or `new_model_name` selects the model.
#[derive(Clone, Debug, Default, utoipa::ToSchema)]
pub struct SubmitPriceDto {
    pub provider_id: Option<i32>,
    pub provider_name: Option<String>,
    pub provider_website: Option<String>,
    pub openai_base_url: Option<String>,
    pub gemini_base_url: Option<String>,
    pub claude_base_url: Option<String>,
    pub submit_provider_for_review: bool,
    pub provider_proof_type: Option<String>,
    pub provider_proof_content: Option<String>,

    pub standard_model_id: Option<i32>,
    pub new_model_name: Option<String>,
    pub new_model_vendor: Option<String>,
    pub provider_model_name: Option<String>,

    pub price_in: Option<f64>,
    pub price_out: Option<f64>,
    /// Defaults to `USD`
    pub currency: Option<String>,

    /// `image`, `text` or `url`
    pub proof_type: Option<String>,
    pub proof_content: Option<String>,
    /// Proof image, stored when `proof_type` is `image`
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<UploadedFile>,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SubmittedPriceDto {
    pub message: String,
    pub id: i32,
    pub provider_id: i32,
    pub provider_status: String,
}

/// Returned with `202 Accepted` when the submission named an unknown model
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModelRequestedDto {
    pub message: String,
    pub request_id: i32,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PriceEntryDto {
    #[serde(default)]
    pub standard_model_id: Option<i32>,
    #[serde(default)]
    pub new_model_name: Option<String>,
    #[serde(default)]
    pub new_model_vendor: Option<String>,
    #[serde(default)]
    pub provider_model_name: Option<String>,

    pub price_in: f64,
    pub price_out: f64,
    #[serde(default)]
    pub cache_hit_input_price: Option<f64>,
    #[serde(default)]
    pub cache_hit_output_price: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub proof_type: Option<String>,
    #[serde(default)]
    pub proof_content: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BatchSubmitDto {
    #[serde(default)]
    pub provider_id: Option<i32>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub provider_website: Option<String>,
    #[serde(default)]
    pub openai_base_url: Option<String>,
    #[serde(default)]
    pub gemini_base_url: Option<String>,
    #[serde(default)]
    pub claude_base_url: Option<String>,
    #[serde(default)]
    pub submit_provider_for_review: bool,
    #[serde(default)]
    pub provider_proof_type: Option<String>,
    #[serde(default)]
    pub provider_proof_content: Option<String>,

    pub prices: Vec<PriceEntryDto>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BatchSubmittedDto {
    pub message: String,
    pub provider_id: i32,
    pub created_price_ids: Vec<i32>,
    pub provider_status: String,
}

/// One provider's offer for a standard model, converted to the requested currency
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ComparisonRowDto {
    pub price_id: i32,
    pub provider_id: i32,
    pub provider_name: String,
    pub provider_model_name: Option<String>,
    pub provider_score: f64,
    pub uptime: f64,
    pub original_currency: String,
    /// `None` when the original currency has no known rate
    pub price_in: Option<f64>,
    pub price_out: Option<f64>,
    pub cache_hit_input_price: Option<f64>,
    pub cache_hit_output_price: Option<f64>,
    pub verified_at: Option<NaiveDateTime>,
    pub proof_type: Option<String>,
    pub proof_content: Option<String>,
    /// Path of the uploaded proof image
    pub proof: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LowestPriceDto {
    pub provider_id: i32,
    pub provider_name: String,
    pub price_in: f64,
    pub price_out: f64,
    pub currency: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HighlightDto {
    pub id: i32,
    pub name: String,
    pub vendor: Option<String>,
    pub official_price_in: Option<f64>,
    pub official_price_out: Option<f64>,
    pub official_currency: String,
    pub platform_avg_in: Option<f64>,
    pub platform_avg_out: Option<f64>,
    pub lowest: Option<LowestPriceDto>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::IntoParams)]
pub struct CompareQuery {
    #[serde(default)]
    pub target_currency: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::IntoParams)]
pub struct HighlightsQuery {
    /// Number of models, 1 to 50 (default 8)
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub target_currency: Option<String>,
}

/// Partial update of a submitted price
#[derive(Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdatePriceDto {
    #[serde(default)]
    pub input_price: Option<f64>,
    #[serde(default)]
    pub output_price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Form body of `POST /api/prices/models/request`
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModelRequestFormDto {
    pub name: String,
    #[serde(default)]
    pub vendor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModelRequestResultDto {
    pub message: String,
    /// Set when the model already exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<i32>,
    /// Set when a request was created or one is already pending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i32>,
}

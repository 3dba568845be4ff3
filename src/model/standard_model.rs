use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StandardModelDto {
    pub id: i32,
    pub name: String,
    pub vendor: Option<String>,
    pub official_input_price: Option<f64>,
    pub official_output_price: Option<f64>,
    pub official_currency: String,
    pub is_featured: bool,
    pub rank_hint: i32,
    pub popularity_score: f64,
}

impl From<entity::standard_model::Model> for StandardModelDto {
    fn from(model: entity::standard_model::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            vendor: model.vendor,
            official_input_price: model.official_input_price,
            official_output_price: model.official_output_price,
            official_currency: model.official_currency,
            is_featured: model.is_featured,
            rank_hint: model.rank_hint,
            popularity_score: model.popularity_score,
        }
    }
}

/// Body of `POST /api/models`; omitted display fields take the column defaults
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateStandardModelDto {
    pub name: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub official_input_price: Option<f64>,
    #[serde(default)]
    pub official_output_price: Option<f64>,
    #[serde(default)]
    pub official_currency: Option<String>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub rank_hint: Option<i32>,
    #[serde(default)]
    pub popularity_score: Option<f64>,
}

/// Body of `PUT /api/models/{model_id}`; only present fields change
#[derive(Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateStandardModelDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub official_input_price: Option<f64>,
    #[serde(default)]
    pub official_output_price: Option<f64>,
    #[serde(default)]
    pub official_currency: Option<String>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub rank_hint: Option<i32>,
    #[serde(default)]
    pub popularity_score: Option<f64>,
}

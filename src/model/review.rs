use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReviewDto {
    pub id: i32,
    pub provider_id: i32,
    pub user_id: Option<i32>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<entity::review::Model> for ReviewDto {
    fn from(review: entity::review::Model) -> Self {
        Self {
            id: review.id,
            provider_id: review.provider_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateReviewDto {
    /// 1 to 5
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReviewCreatedDto {
    pub message: String,
    pub id: i32,
    /// Provider score after this review
    pub avg_score: f64,
}

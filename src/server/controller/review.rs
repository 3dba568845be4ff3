use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        review::{CreateReviewDto, ReviewCreatedDto, ReviewDto},
    },
    server::{
        controller::util::get_user::get_active_user, error::Error, model::app::AppState,
        service::review::ReviewService,
    },
};

pub static REVIEW_TAG: &str = "reviews";

/// List the reviews of a provider, newest first
#[utoipa::path(
    get,
    path = "/api/providers/{provider_id}/reviews",
    tag = REVIEW_TAG,
    params(("provider_id" = i32, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Reviews", body = Vec<ReviewDto>),
        (status = 404, description = "Provider not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(provider_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let reviews = ReviewService::new(&state.db).list(provider_id).await?;

    Ok((StatusCode::OK, Json(reviews)))
}

/// Rate a provider from 1 to 5
#[utoipa::path(
    post,
    path = "/api/providers/{provider_id}/reviews",
    tag = REVIEW_TAG,
    params(("provider_id" = i32, Path, description = "Provider ID")),
    request_body = CreateReviewDto,
    responses(
        (status = 200, description = "Review stored, provider score recomputed", body = ReviewCreatedDto),
        (status = 400, description = "Rating out of range", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Private provider", body = ErrorDto),
        (status = 404, description = "Provider not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_review(
    State(state): State<AppState>,
    session: Session,
    Path(provider_id): Path<i32>,
    Json(review): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let created = ReviewService::new(&state.db)
        .create(user.id, provider_id, review)
        .await?;

    Ok((StatusCode::OK, Json(created)))
}

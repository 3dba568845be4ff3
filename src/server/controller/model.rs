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
        standard_model::{CreateStandardModelDto, StandardModelDto, UpdateStandardModelDto},
    },
    server::{
        controller::util::get_user::get_admin, error::Error, model::app::AppState,
        service::standard_model::StandardModelService,
    },
};

pub static MODEL_TAG: &str = "models";

/// List all standard models
#[utoipa::path(
    get,
    path = "/api/models",
    tag = MODEL_TAG,
    responses(
        (status = 200, description = "Standard models", body = Vec<StandardModelDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_models(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let models = StandardModelService::new(&state.db).list().await?;

    Ok((StatusCode::OK, Json(models)))
}

/// Create a standard model
#[utoipa::path(
    post,
    path = "/api/models",
    tag = MODEL_TAG,
    request_body = CreateStandardModelDto,
    responses(
        (status = 200, description = "Created model", body = StandardModelDto),
        (status = 400, description = "Missing name", body = ErrorDto),
        (status = 403, description = "Admin privileges required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_model(
    State(state): State<AppState>,
    session: Session,
    Json(model): Json<CreateStandardModelDto>,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    let model = StandardModelService::new(&state.db).create(model).await?;

    Ok((StatusCode::OK, Json(model)))
}

/// Update fields of a standard model
#[utoipa::path(
    put,
    path = "/api/models/{model_id}",
    tag = MODEL_TAG,
    params(("model_id" = i32, Path, description = "Standard model ID")),
    request_body = UpdateStandardModelDto,
    responses(
        (status = 200, description = "Updated model", body = StandardModelDto),
        (status = 403, description = "Admin privileges required", body = ErrorDto),
        (status = 404, description = "Model not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_model(
    State(state): State<AppState>,
    session: Session,
    Path(model_id): Path<i32>,
    Json(changes): Json<UpdateStandardModelDto>,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    let model = StandardModelService::new(&state.db)
        .update(model_id, changes)
        .await?;

    Ok((StatusCode::OK, Json(model)))
}

//! Moderation queues, user management and system settings.
//!
//! Everything below `/api/admin` requires an admin; changing roles and settings requires a
//! super admin.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        admin::{
            ApproveModelRequestDto, ModelApprovedDto, PendingModelRequestDto, PendingPriceDto,
            PendingProviderDto, RoleUpdateDto,
        },
        api::{ErrorDto, MessageDto},
        user::UserDto,
    },
    server::{
        controller::util::get_user::{get_admin, get_super_admin},
        error::Error,
        model::app::AppState,
        service::moderation::ModerationService,
    },
};

pub static ADMIN_TAG: &str = "admin";

/// List prices waiting for moderation
#[utoipa::path(
    get,
    path = "/api/admin/pending",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Pending prices, oldest first", body = Vec<PendingPriceDto>),
        (status = 403, description = "Admin privileges required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn pending_prices(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    let prices = ModerationService::new(&state.db).pending_prices().await?;

    Ok((StatusCode::OK, Json(prices)))
}

/// Publish a price, marking it verified now
#[utoipa::path(
    post,
    path = "/api/admin/approve/{price_id}",
    tag = ADMIN_TAG,
    params(("price_id" = i32, Path, description = "Price ID")),
    responses(
        (status = 200, description = "Price approved", body = MessageDto),
        (status = 404, description = "Price not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_price(
    State(state): State<AppState>,
    session: Session,
    Path(price_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    ModerationService::new(&state.db)
        .approve_price(price_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Price approved"))))
}

#[utoipa::path(
    post,
    path = "/api/admin/reject/{price_id}",
    tag = ADMIN_TAG,
    params(("price_id" = i32, Path, description = "Price ID")),
    responses(
        (status = 200, description = "Price rejected", body = MessageDto),
        (status = 404, description = "Price not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_price(
    State(state): State<AppState>,
    session: Session,
    Path(price_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    ModerationService::new(&state.db)
        .reject_price(price_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Price rejected"))))
}

/// List providers submitted for public review
#[utoipa::path(
    get,
    path = "/api/admin/providers/pending",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Pending providers with submitter email", body = Vec<PendingProviderDto>),
        (status = 403, description = "Admin privileges required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn pending_providers(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    let providers = ModerationService::new(&state.db).pending_providers().await?;

    Ok((StatusCode::OK, Json(providers)))
}

#[utoipa::path(
    post,
    path = "/api/admin/providers/{provider_id}/approve",
    tag = ADMIN_TAG,
    params(("provider_id" = i32, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider approved", body = MessageDto),
        (status = 400, description = "Provider is not pending", body = ErrorDto),
        (status = 404, description = "Provider not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_provider(
    State(state): State<AppState>,
    session: Session,
    Path(provider_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    ModerationService::new(&state.db)
        .approve_provider(provider_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Provider approved"))))
}

#[utoipa::path(
    post,
    path = "/api/admin/providers/{provider_id}/reject",
    tag = ADMIN_TAG,
    params(("provider_id" = i32, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider rejected", body = MessageDto),
        (status = 400, description = "Provider is not pending", body = ErrorDto),
        (status = 404, description = "Provider not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_provider(
    State(state): State<AppState>,
    session: Session,
    Path(provider_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    ModerationService::new(&state.db)
        .reject_provider(provider_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Provider rejected"))))
}

/// List requests for new standard models
#[utoipa::path(
    get,
    path = "/api/admin/models/pending",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Pending model requests with requester email", body = Vec<PendingModelRequestDto>),
        (status = 403, description = "Admin privileges required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn pending_model_requests(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    let requests = ModerationService::new(&state.db)
        .pending_model_requests()
        .await?;

    Ok((StatusCode::OK, Json(requests)))
}

/// Create the requested standard model, optionally under another name or vendor
#[utoipa::path(
    post,
    path = "/api/admin/models/{request_id}/approve",
    tag = ADMIN_TAG,
    params(("request_id" = i32, Path, description = "Model request ID")),
    request_body(content = ApproveModelRequestDto, description = "Optional name and vendor override"),
    responses(
        (status = 200, description = "Model created", body = ModelApprovedDto),
        (status = 400, description = "Request is not pending", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_model_request(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
    overrides: Option<Json<ApproveModelRequestDto>>,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    let overrides = overrides.map(|Json(o)| o).unwrap_or_default();
    let model = ModerationService::new(&state.db)
        .approve_model_request(request_id, overrides)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ModelApprovedDto {
            message: "Model request approved".to_string(),
            model_id: model.id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/models/{request_id}/reject",
    tag = ADMIN_TAG,
    params(("request_id" = i32, Path, description = "Model request ID")),
    responses(
        (status = 200, description = "Request rejected", body = MessageDto),
        (status = 400, description = "Request is not pending", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_model_request(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    ModerationService::new(&state.db)
        .reject_model_request(request_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Model request rejected"))))
}

/// List all accounts
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "All users", body = Vec<UserDto>),
        (status = 403, description = "Admin privileges required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    let users = ModerationService::new(&state.db).list_users().await?;

    Ok((StatusCode::OK, Json(users)))
}

/// Change the role of a user
#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/role",
    tag = ADMIN_TAG,
    params(("user_id" = i32, Path, description = "User ID")),
    request_body = RoleUpdateDto,
    responses(
        (status = 200, description = "Role updated", body = MessageDto),
        (status = 400, description = "Invalid role", body = ErrorDto),
        (status = 403, description = "Super admin privileges required", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(update): Json<RoleUpdateDto>,
) -> Result<impl IntoResponse, Error> {
    let admin = get_super_admin(&state, &session).await?;

    let user = ModerationService::new(&state.db)
        .update_user_role(user_id, &update.role)
        .await?;

    tracing::info!(
        "User ID {} set the role of user ID {} to {}",
        admin.id,
        user.id,
        user.role
    );

    Ok((StatusCode::OK, Json(MessageDto::new("User role updated"))))
}

/// Get every system setting
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Settings by key", body = HashMap<String, String>),
        (status = 403, description = "Admin privileges required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_settings(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_admin(&state, &session).await?;

    let settings = ModerationService::new(&state.db).settings().await?;

    Ok((StatusCode::OK, Json(settings)))
}

/// Upsert system settings
///
/// Values may be any JSON scalar and are stored as strings. Changing
/// `exchange_rate_interval_minutes` reschedules the exchange rate refresh.
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    tag = ADMIN_TAG,
    request_body = HashMap<String, serde_json::Value>,
    responses(
        (status = 200, description = "Settings updated", body = MessageDto),
        (status = 400, description = "Invalid home_display_mode", body = ErrorDto),
        (status = 403, description = "Super admin privileges required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_settings(
    State(state): State<AppState>,
    session: Session,
    Json(settings): Json<HashMap<String, serde_json::Value>>,
) -> Result<impl IntoResponse, Error> {
    get_super_admin(&state, &session).await?;

    let reschedule = ModerationService::new(&state.db)
        .update_settings(settings)
        .await?;

    if reschedule {
        if let Some(scheduler) = &state.scheduler {
            // Settings are already stored, a failed reschedule keeps the previous interval
            if let Err(e) = scheduler.reschedule_exchange_rates().await {
                tracing::error!("Failed to reschedule exchange rate refresh: {}", e);
            }
        }
    }

    Ok((StatusCode::OK, Json(MessageDto::new("Settings updated"))))
}

//! Personal workspace of the logged in user: E2EE settings, stored API keys and own providers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{CreatedDto, ErrorDto, MessageDto},
        key::{AddApiKeyDto, ApiKeyDto},
        provider::{CreateProviderDto, OwnedProviderDto, ProviderProofDto, UpdateProviderDto},
        settings::{E2eeSettingsDto, E2eeSetupDto},
    },
    server::{
        controller::util::get_user::get_active_user, error::Error, model::app::AppState,
        service::workspace::WorkspaceService,
    },
};

pub static USER_TAG: &str = "user";

/// Get the E2EE settings, created on first access
#[utoipa::path(
    get,
    path = "/api/user/settings",
    tag = USER_TAG,
    responses(
        (status = 200, description = "E2EE flag, salt and verification blob", body = E2eeSettingsDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_e2ee_settings(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let settings = WorkspaceService::new(&state.db)
        .e2ee_settings(user.id)
        .await?;

    Ok((StatusCode::OK, Json(settings)))
}

/// Turn on client side encryption of stored API keys
#[utoipa::path(
    post,
    path = "/api/user/settings/e2ee",
    tag = USER_TAG,
    request_body = E2eeSetupDto,
    responses(
        (status = 200, description = "E2EE enabled", body = MessageDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn enable_e2ee(
    State(state): State<AppState>,
    session: Session,
    Json(setup): Json<E2eeSetupDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    WorkspaceService::new(&state.db)
        .enable_e2ee(user.id, setup)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("E2EE enabled"))))
}

#[utoipa::path(
    delete,
    path = "/api/user/settings/e2ee",
    tag = USER_TAG,
    responses(
        (status = 200, description = "E2EE disabled", body = MessageDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn disable_e2ee(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    WorkspaceService::new(&state.db).disable_e2ee(user.id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("E2EE disabled"))))
}

/// List stored API keys with their provider's name and base URLs
#[utoipa::path(
    get,
    path = "/api/user/keys",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Stored API keys", body = Vec<ApiKeyDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_api_keys(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let keys = WorkspaceService::new(&state.db).api_keys(user.id).await?;

    Ok((StatusCode::OK, Json(keys)))
}

/// Store an API key for an accessible provider
#[utoipa::path(
    post,
    path = "/api/user/keys",
    tag = USER_TAG,
    request_body = AddApiKeyDto,
    responses(
        (status = 200, description = "Key stored", body = CreatedDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Private provider of another user", body = ErrorDto),
        (status = 404, description = "Provider not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_api_key(
    State(state): State<AppState>,
    session: Session,
    Json(key): Json<AddApiKeyDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let id = WorkspaceService::new(&state.db)
        .add_api_key(user.id, key)
        .await?;

    Ok((
        StatusCode::OK,
        Json(CreatedDto {
            message: "API key added".to_string(),
            id,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/user/keys/{key_id}",
    tag = USER_TAG,
    params(("key_id" = i32, Path, description = "API key ID")),
    responses(
        (status = 200, description = "Key deleted", body = MessageDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Key not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_api_key(
    State(state): State<AppState>,
    session: Session,
    Path(key_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    WorkspaceService::new(&state.db)
        .delete_api_key(user.id, key_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("API key deleted"))))
}

/// List providers owned by the logged in user
#[utoipa::path(
    get,
    path = "/api/user/providers",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Own providers", body = Vec<OwnedProviderDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_providers(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let providers = WorkspaceService::new(&state.db).providers(user.id).await?;

    Ok((StatusCode::OK, Json(providers)))
}

/// Create a private provider, or submit it for public review with proof
#[utoipa::path(
    post,
    path = "/api/user/providers",
    tag = USER_TAG,
    request_body = CreateProviderDto,
    responses(
        (status = 200, description = "Provider created", body = CreatedDto),
        (status = 400, description = "Missing name or proof", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_provider(
    State(state): State<AppState>,
    session: Session,
    Json(provider): Json<CreateProviderDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let created = WorkspaceService::new(&state.db)
        .create_provider(user.id, provider)
        .await?;

    Ok((StatusCode::OK, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/user/providers/{provider_id}",
    tag = USER_TAG,
    params(("provider_id" = i32, Path, description = "Provider ID")),
    request_body = UpdateProviderDto,
    responses(
        (status = 200, description = "Updated provider", body = OwnedProviderDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Provider not found or not owned", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_provider(
    State(state): State<AppState>,
    session: Session,
    Path(provider_id): Path<i32>,
    Json(changes): Json<UpdateProviderDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let provider = WorkspaceService::new(&state.db)
        .update_provider(user.id, provider_id, changes)
        .await?;

    Ok((StatusCode::OK, Json(provider)))
}

/// Submit a private provider for public review
#[utoipa::path(
    post,
    path = "/api/user/providers/{provider_id}/submit",
    tag = USER_TAG,
    params(("provider_id" = i32, Path, description = "Provider ID")),
    request_body = ProviderProofDto,
    responses(
        (status = 200, description = "Provider pending review", body = OwnedProviderDto),
        (status = 400, description = "Already submitted or missing proof", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Provider not found or not owned", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_provider(
    State(state): State<AppState>,
    session: Session,
    Path(provider_id): Path<i32>,
    Json(proof): Json<ProviderProofDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let provider = WorkspaceService::new(&state.db)
        .submit_provider(user.id, provider_id, proof)
        .await?;

    Ok((StatusCode::OK, Json(provider)))
}

/// Delete an own provider that no stored API key references
#[utoipa::path(
    delete,
    path = "/api/user/providers/{provider_id}",
    tag = USER_TAG,
    params(("provider_id" = i32, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider deleted", body = MessageDto),
        (status = 400, description = "Provider still has API keys", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Provider not found or not owned", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_provider(
    State(state): State<AppState>,
    session: Session,
    Path(provider_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    WorkspaceService::new(&state.db)
        .delete_provider(user.id, provider_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Provider deleted"))))
}

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        account::{ActionCodeRequestDto, EmailChangeDto, EmailChangedDto, PasswordResetDto},
        api::{ErrorDto, MessageDto},
    },
    server::{
        controller::util::get_user::get_active_user, error::Error, model::app::AppState,
        service::account::AccountService,
    },
};

pub static ACCOUNT_TAG: &str = "account";

/// Mail a 6-digit code for `password_reset` or `email_change`
///
/// Earlier unused codes for the same action stop working. Errors are reported as upper-case
/// codes such as `EMAIL_TAKEN` or `EMAIL_NOT_CONFIGURED`.
#[utoipa::path(
    post,
    path = "/api/account/request-code",
    tag = ACCOUNT_TAG,
    request_body = ActionCodeRequestDto,
    responses(
        (status = 200, description = "Code sent", body = MessageDto),
        (status = 400, description = "Invalid action or new email", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Mail not configured or internal error", body = ErrorDto)
    ),
)]
pub async fn request_code(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<ActionCodeRequestDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    AccountService::new(&state.db)
        .request_code(&user, request)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Verification code sent"))))
}

/// Set a new password, confirmed by TOTP, a backup code or a mailed code
#[utoipa::path(
    post,
    path = "/api/account/reset-password",
    tag = ACCOUNT_TAG,
    request_body = PasswordResetDto,
    responses(
        (status = 200, description = "Password updated", body = MessageDto),
        (status = 400, description = "Short password or failed verification", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reset_password(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<PasswordResetDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    AccountService::new(&state.db)
        .reset_password(&user, request)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Password updated"))))
}

/// Move the account to a new email address
#[utoipa::path(
    post,
    path = "/api/account/change-email",
    tag = ACCOUNT_TAG,
    request_body = EmailChangeDto,
    responses(
        (status = 200, description = "Email updated", body = EmailChangedDto),
        (status = 400, description = "Email unchanged, taken or failed verification", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn change_email(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<EmailChangeDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let changed = AccountService::new(&state.db)
        .change_email(&user, request)
        .await?;

    Ok((StatusCode::OK, Json(changed)))
}

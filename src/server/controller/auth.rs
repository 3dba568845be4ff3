use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        user::{
            BackupCodesDto, LoginDto, RegisterDto, TotpCodeDto, TotpSetupDto, UserDto,
            VerifyEmailQuery,
        },
    },
    server::{
        controller::util::get_user::get_user_from_session,
        error::Error,
        model::{app::AppState, session::user::SessionUserId},
        service::auth::{totp::TotpService, verification::VerificationService, AuthService},
    },
};

pub static AUTH_TAG: &str = "auth";

/// Create an account
///
/// The first account created becomes `super_admin`. A verification mail is sent when SMTP is
/// configured.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 200, description = "Account created", body = UserDto),
        (status = 400, description = "Invalid email, short password or email taken", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    Json(registration): Json<RegisterDto>,
) -> Result<impl IntoResponse, Error> {
    let user = AuthService::new(&state.db).register(registration).await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Log in with email, password and, once enabled, a TOTP or backup code
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = UserDto),
        (status = 401, description = "Wrong credentials or TOTP code", body = ErrorDto),
        (status = 403, description = "Account disabled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<LoginDto>,
) -> Result<impl IntoResponse, Error> {
    let user = AuthService::new(&state.db).login(credentials).await?;

    // New session id on privilege change
    session.cycle_id().await?;
    SessionUserId::insert(&session, user.id).await?;

    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

/// Log out by clearing the session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged out", body = MessageDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, Error> {
    // Clearing a session that was never stored fails, so only clear a logged in one
    if SessionUserId::get(&session).await?.is_some() {
        session.clear().await;
    }

    Ok((StatusCode::OK, Json(MessageDto::new("Logged out"))))
}

/// Get the logged in user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged in user", body = UserDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn me(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

/// Start TOTP setup, returning a secret to confirm with `/api/auth/totp/enable`
#[utoipa::path(
    post,
    path = "/api/auth/totp/setup",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Temporary secret and provisioning URL", body = TotpSetupDto),
        (status = 400, description = "TOTP already enabled", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn totp_setup(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let setup = TotpService::new(&state.db).setup(&user).await?;

    Ok((StatusCode::OK, Json(setup)))
}

/// Confirm TOTP setup with a code from the authenticator app
#[utoipa::path(
    post,
    path = "/api/auth/totp/enable",
    tag = AUTH_TAG,
    request_body = TotpCodeDto,
    responses(
        (status = 200, description = "TOTP enabled, backup codes returned once", body = BackupCodesDto),
        (status = 400, description = "Setup not started", body = ErrorDto),
        (status = 401, description = "Not logged in or invalid code", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn totp_enable(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<TotpCodeDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let backup_codes = TotpService::new(&state.db)
        .enable(&user, &payload.code)
        .await?;

    Ok((StatusCode::OK, Json(backup_codes)))
}

/// Turn off TOTP, requires a current code or a backup code
#[utoipa::path(
    post,
    path = "/api/auth/totp/disable",
    tag = AUTH_TAG,
    request_body = TotpCodeDto,
    responses(
        (status = 200, description = "TOTP disabled", body = MessageDto),
        (status = 400, description = "TOTP not enabled", body = ErrorDto),
        (status = 401, description = "Not logged in or invalid code", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn totp_disable(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<TotpCodeDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    TotpService::new(&state.db)
        .disable(&user, &payload.code)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("TOTP disabled"))))
}

/// Verify an email address with the token from the verification mail
#[utoipa::path(
    get,
    path = "/api/auth/verify-email",
    tag = AUTH_TAG,
    params(VerifyEmailQuery),
    responses(
        (status = 200, description = "Email verified", body = UserDto),
        (status = 400, description = "Invalid, used or expired token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = VerificationService::new(&state.db).verify(&query.token).await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Send a new verification mail to the logged in user
#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Verification mail sent", body = MessageDto),
        (status = 400, description = "Email already verified", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Mail not configured or internal error", body = ErrorDto)
    ),
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    VerificationService::new(&state.db).resend(&user).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Verification email sent"))))
}

use chrono::NaiveDateTime;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};

/// Account as exposed over the API; never carries credentials or TOTP secrets
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    /// One of `user`, `admin`, `super_admin`
    pub role: String,
    pub is_active: bool,
    pub email_verified: bool,
    pub totp_enabled: bool,
    pub created_at: NaiveDateTime,
}

impl From<entity::user::Model> for UserDto {
    fn from(user: entity::user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role.to_value(),
            is_active: user.is_active,
            email_verified: user.email_verified,
            totp_enabled: user.totp_enabled,
            created_at: user.created_at,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegisterDto {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
    /// Current TOTP code or an unused backup code, required once TOTP is enabled
    #[serde(default)]
    pub totp_code: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TotpSetupDto {
    /// Base32 secret to enter manually in an authenticator app
    pub secret: String,
    /// `otpauth://` provisioning URL, usually rendered as a QR code
    pub otpauth_url: String,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TotpCodeDto {
    pub code: String,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BackupCodesDto {
    pub message: String,
    /// Single-use recovery codes, only shown once
    pub backup_codes: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct VerifyEmailQuery {
    pub token: String,
}

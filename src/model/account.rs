use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ActionCodeRequestDto {
    /// `password_reset` or `email_change`
    pub action: String,
    /// Target address, required for `email_change`
    #[serde(default)]
    pub new_email: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PasswordResetDto {
    pub new_password: String,
    /// Emailed 6-digit code
    #[serde(default)]
    pub code: Option<String>,
    /// TOTP or backup code, checked before `code`
    #[serde(default)]
    pub totp_code: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EmailChangeDto {
    pub new_email: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub totp_code: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EmailChangedDto {
    pub message: String,
    pub email_verified: bool,
}

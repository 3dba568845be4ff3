//! Authentication service layer.
//!
//! Email and password accounts with optional TOTP as a second factor. The logged in user is
//! tracked in the session by the controllers; services only validate credentials and manage
//! the account records.

pub mod password;
pub mod totp;
pub mod verification;

use entity::sea_orm_active_enums::UserRole;
use sea_orm::DatabaseConnection;

use crate::{
    model::user::{LoginDto, RegisterDto, UserDto},
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, Error},
        service::{
            auth::{
                password::{hash_password, is_long_enough, verify_password},
                totp::verify_code_or_backup,
                verification::VerificationService,
            },
            email::EmailService,
        },
    },
};

/// Loose shape check, delivery of the verification mail is the real test
pub fn is_plausible_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    /// Creates a new instance of [`AuthService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account; the very first account becomes `super_admin`.
    ///
    /// When SMTP is configured a verification mail is sent.
    pub async fn register(&self, registration: RegisterDto) -> Result<UserDto, Error> {
        let email = registration.email.trim().to_lowercase();

        if !is_plausible_email(&email) {
            return Err(AuthError::InvalidEmail.into());
        }

        if !is_long_enough(&registration.password) {
            return Err(AuthError::PasswordTooShort.into());
        }

        let user_repo = UserRepository::new(self.db);

        if user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken.into());
        }

        let role = if user_repo.count().await? == 0 {
            UserRole::SuperAdmin
        } else {
            UserRole::User
        };

        let password_hash = hash_password(&registration.password)?;
        let user = user_repo.create(&email, password_hash, role).await?;

        tracing::info!("Registered user ID {} as {:?}", user.id, user.role);

        if EmailService::new(self.db).smtp_settings().await?.is_some() {
            let sent = VerificationService::new(self.db)
                .send_verification_email(&user)
                .await?;

            if !sent {
                tracing::warn!("Verification mail to user ID {} was not delivered", user.id);
            }
        }

        Ok(user.into())
    }

    /// Checks credentials and the second factor, returning the user to store in the session
    pub async fn login(&self, credentials: LoginDto) -> Result<entity::user::Model, Error> {
        let user = UserRepository::new(self.db)
            .find_by_email(credentials.email.trim())
            .await?;

        let Some(user) = user.filter(|user| verify_password(&credentials.password, &user.password_hash))
        else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if !user.is_active {
            return Err(AuthError::InactiveUser.into());
        }

        if user.totp_enabled {
            let Some(code) = credentials.totp_code.filter(|code| !code.trim().is_empty()) else {
                return Err(AuthError::TotpRequired.into());
            };

            if !verify_code_or_backup(self.db, &user, &code).await? {
                return Err(AuthError::InvalidTotp.into());
            }
        }

        tracing::debug!("User ID {} logged in", user.id);

        Ok(user)
    }
}

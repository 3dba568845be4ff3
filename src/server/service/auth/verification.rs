use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::user::UserDto,
    server::{
        data::{token::TokenRepository, user::UserRepository},
        error::{account::AccountError, auth::AuthError, Error},
        service::email::EmailService,
    },
};

pub const VERIFICATION_TOKEN_HOURS: i64 = 24;

pub struct VerificationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VerificationService<'a> {
    /// Creates a new instance of [`VerificationService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a fresh token for `user` and mails the verification link.
    ///
    /// Returns whether the mail went out.
    pub async fn send_verification_email(&self, user: &entity::user::Model) -> Result<bool, Error> {
        let token = Uuid::new_v4().simple().to_string();

        TokenRepository::new(self.db)
            .create_verification_token(
                user.id,
                token.clone(),
                Duration::hours(VERIFICATION_TOKEN_HOURS),
            )
            .await?;

        let email_service = EmailService::new(self.db);
        let site_name = email_service.site_name().await?;
        let body = format!(
            "Hi,\n\nPlease verify your email for {site_name} by visiting: /verify-email?token={token}\n\
             This link expires in {VERIFICATION_TOKEN_HOURS} hours."
        );

        email_service
            .send(
                &user.email,
                &format!("Verify your email for {site_name}"),
                &body,
            )
            .await
    }

    /// Consumes a token and marks its user verified
    pub async fn verify(&self, token: &str) -> Result<UserDto, Error> {
        let txn = self.db.begin().await?;

        let token_repo = TokenRepository::new(&txn);
        let record = match token_repo.get_verification_token(token).await? {
            Some(record) if !record.used && record.expires_at > Utc::now().naive_utc() => record,
            _ => return Err(AuthError::InvalidVerificationToken.into()),
        };

        token_repo.mark_verification_token_used(&record.token).await?;
        let user = UserRepository::new(&txn)
            .mark_email_verified(record.user_id)
            .await?;

        txn.commit().await?;

        tracing::info!("User ID {} verified their email", user.id);

        Ok(user.into())
    }

    pub async fn resend(&self, user: &entity::user::Model) -> Result<(), Error> {
        if user.email_verified {
            return Err(AuthError::EmailAlreadyVerified.into());
        }

        if !self.send_verification_email(user).await? {
            return Err(AccountError::EmailNotConfigured.into());
        }

        Ok(())
    }
}

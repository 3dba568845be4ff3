//! Password reset and email change for logged in users.
//!
//! Both changes need a second proof of identity: either a TOTP or backup code, or a 6-digit
//! code mailed to the user (to the new address for email changes).

use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::TokenAction;
use sea_orm::DatabaseConnection;

use crate::{
    model::account::{ActionCodeRequestDto, EmailChangeDto, EmailChangedDto, PasswordResetDto},
    server::{
        data::{token::TokenRepository, user::UserRepository},
        error::{account::AccountError, auth::AuthError, Error},
        service::{
            auth::{
                is_plausible_email,
                password::{hash_password, is_long_enough},
                totp::verify_code_or_backup,
                verification::VerificationService,
            },
            email::EmailService,
        },
    },
};

pub const CODE_TTL_MINUTES: i64 = 15;

/// Codes are primary keys, a collision with any stored code means drawing again
const CODE_ATTEMPTS: usize = 5;

fn parse_action(action: &str) -> Result<TokenAction, Error> {
    match action {
        "password_reset" => Ok(TokenAction::PasswordReset),
        "email_change" => Ok(TokenAction::EmailChange),
        _ => Err(AccountError::InvalidAction.into()),
    }
}

fn generate_code() -> String {
    format!("{:06}", rand::random_range(0..1_000_000u32))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub struct AccountService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AccountService<'a> {
    /// Creates a new instance of [`AccountService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// The new address must differ from the current one and be unused
    async fn check_new_email(
        &self,
        user: &entity::user::Model,
        new_email: &str,
    ) -> Result<String, Error> {
        let new_email = new_email.trim().to_lowercase();

        if !is_plausible_email(&new_email) {
            return Err(AuthError::InvalidEmail.into());
        }

        if new_email == user.email {
            return Err(AccountError::EmailUnchanged.into());
        }

        if UserRepository::new(self.db)
            .find_by_email(&new_email)
            .await?
            .is_some()
        {
            return Err(AccountError::EmailTaken.into());
        }

        Ok(new_email)
    }

    /// Replaces any unused code for the action with a new one valid for 15 minutes
    async fn issue_code(
        &self,
        user_id: i32,
        action: TokenAction,
        new_email: Option<String>,
    ) -> Result<String, Error> {
        let token_repo = TokenRepository::new(self.db);

        let invalidated = token_repo
            .invalidate_unused_action_codes(user_id, action)
            .await?;
        if invalidated > 0 {
            tracing::debug!(
                "Invalidated {} previous {:?} codes of user ID {}",
                invalidated,
                action,
                user_id
            );
        }

        for _ in 0..CODE_ATTEMPTS {
            let code = generate_code();

            if token_repo.get_action_code(&code).await?.is_some() {
                continue;
            }

            token_repo
                .create_action_code(
                    user_id,
                    code.clone(),
                    action,
                    new_email,
                    Duration::minutes(CODE_TTL_MINUTES),
                )
                .await?;

            return Ok(code);
        }

        Err(Error::InternalError(format!(
            "No free verification code after {} attempts",
            CODE_ATTEMPTS
        )))
    }

    /// Checks and consumes a mailed code.
    ///
    /// An expired code is consumed as well; a code issued for another address is left usable.
    async fn consume_code(
        &self,
        user_id: i32,
        action: TokenAction,
        code: &str,
        expected_email: Option<&str>,
    ) -> Result<(), Error> {
        let token_repo = TokenRepository::new(self.db);

        let Some(record) = token_repo
            .find_unused_action_code(user_id, code, action)
            .await?
        else {
            return Err(AccountError::InvalidCode.into());
        };

        if record.expires_at < Utc::now().naive_utc() {
            token_repo.mark_action_code_used(&record.token).await?;

            return Err(AccountError::CodeExpired.into());
        }

        if let (Some(expected), Some(issued_for)) = (expected_email, record.new_email.as_deref()) {
            if !issued_for.eq_ignore_ascii_case(expected) {
                return Err(AccountError::CodeEmailMismatch.into());
            }
        }

        token_repo.mark_action_code_used(&record.token).await?;

        Ok(())
    }

    /// Mails a verification code for `password_reset` or `email_change`
    pub async fn request_code(
        &self,
        user: &entity::user::Model,
        request: ActionCodeRequestDto,
    ) -> Result<(), Error> {
        let action = parse_action(&request.action)?;

        let new_email = match action {
            TokenAction::EmailChange => {
                let Some(new_email) = non_blank(&request.new_email) else {
                    return Err(AccountError::NewEmailRequired.into());
                };

                Some(self.check_new_email(user, new_email).await?)
            }
            TokenAction::PasswordReset => None,
        };

        let email_service = EmailService::new(self.db);
        if email_service.smtp_settings().await?.is_none() {
            return Err(AccountError::EmailNotConfigured.into());
        }

        let target = new_email.clone().unwrap_or_else(|| user.email.clone());
        let code = self.issue_code(user.id, action, new_email).await?;

        let site_name = email_service.site_name().await?;
        let action_label = match action {
            TokenAction::PasswordReset => "Reset your password",
            TokenAction::EmailChange => "Confirm your new email",
        };
        let body = format!(
            "{action_label} for {site_name}\n\n\
             Use this code within {CODE_TTL_MINUTES} minutes: {code}\n\
             If you did not request this, please ignore it."
        );

        let sent = email_service
            .send(&target, &format!("{site_name} verification code"), &body)
            .await?;
        if !sent {
            return Err(AccountError::EmailNotConfigured.into());
        }

        Ok(())
    }

    pub async fn reset_password(
        &self,
        user: &entity::user::Model,
        request: PasswordResetDto,
    ) -> Result<(), Error> {
        if !is_long_enough(&request.new_password) {
            return Err(AccountError::PasswordTooShort.into());
        }

        if let Some(totp_code) = non_blank(&request.totp_code) {
            if !verify_code_or_backup(self.db, user, totp_code).await? {
                return Err(AccountError::InvalidTotp.into());
            }
        } else if let Some(code) = non_blank(&request.code) {
            self.consume_code(user.id, TokenAction::PasswordReset, code, None)
                .await?;
        } else {
            return Err(AccountError::VerificationRequired.into());
        }

        UserRepository::new(self.db)
            .update_password(user.id, hash_password(&request.new_password)?)
            .await?;

        tracing::info!("User ID {} changed their password", user.id);

        Ok(())
    }

    /// Moves the account to a new address.
    ///
    /// Confirmed through a mailed code the new address counts as verified; confirmed through
    /// TOTP it is unverified and a verification mail is sent to it.
    pub async fn change_email(
        &self,
        user: &entity::user::Model,
        request: EmailChangeDto,
    ) -> Result<EmailChangedDto, Error> {
        let new_email = self.check_new_email(user, &request.new_email).await?;

        let verified_via_email = if let Some(totp_code) = non_blank(&request.totp_code) {
            if !verify_code_or_backup(self.db, user, totp_code).await? {
                return Err(AccountError::InvalidTotp.into());
            }
            false
        } else if let Some(code) = non_blank(&request.code) {
            self.consume_code(user.id, TokenAction::EmailChange, code, Some(&new_email))
                .await?;
            true
        } else {
            return Err(AccountError::VerificationRequired.into());
        };

        let updated = UserRepository::new(self.db)
            .update_email(user.id, &new_email, verified_via_email)
            .await?;

        tracing::info!("User ID {} changed their email", user.id);

        if !verified_via_email
            && !VerificationService::new(self.db)
                .send_verification_email(&updated)
                .await?
        {
            tracing::warn!(
                "Verification mail for the new address of user ID {} was not delivered",
                updated.id
            );
        }

        Ok(EmailChangedDto {
            message: "Email updated".to_string(),
            email_verified: updated.email_verified,
        })
    }
}

#[cfg(test)]
mod tests {
    mod request_code {
        use pricehub_test_utils::prelude::*;

        use crate::{
            model::account::ActionCodeRequestDto,
            server::{
                error::{account::AccountError, Error},
                service::account::AccountService,
            },
        };

        fn request(action: &str, new_email: Option<&str>) -> ActionCodeRequestDto {
            ActionCodeRequestDto {
                action: action.to_string(),
                new_email: new_email.map(str::to_string),
            }
        }

        /// Expect unknown actions to be rejected
        #[tokio::test]
        async fn rejects_unknown_action() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;

            let result = AccountService::new(&test.db)
                .request_code(&user, request("delete_account", None))
                .await;

            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::InvalidAction))
            ));

            Ok(())
        }

        /// Expect email changes to validate the target address
        #[tokio::test]
        async fn validates_new_email() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;
            test.user().insert_user("other@example.com").await?;

            let account_service = AccountService::new(&test.db);

            let result = account_service
                .request_code(&user, request("email_change", None))
                .await;
            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::NewEmailRequired))
            ));

            let result = account_service
                .request_code(&user, request("email_change", Some("USER@example.com")))
                .await;
            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::EmailUnchanged))
            ));

            let result = account_service
                .request_code(&user, request("email_change", Some("other@example.com")))
                .await;
            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::EmailTaken))
            ));

            Ok(())
        }

        /// Expect an error when mail is not configured
        #[tokio::test]
        async fn mail_not_configured() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;

            let result = AccountService::new(&test.db)
                .request_code(&user, request("password_reset", None))
                .await;

            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::EmailNotConfigured))
            ));

            Ok(())
        }

        /// Expect a delivery failure to invalidate older codes and report not configured
        #[tokio::test]
        async fn invalidates_previous_codes() -> Result<(), TestError> {
            use chrono::Duration;
            use entity::sea_orm_active_enums::TokenAction;

            use crate::server::data::token::TokenRepository;

            let test = TestBuilder::new().with_all_tables().build().await?;
            test.setting().insert_unreachable_smtp().await?;
            let user = test.user().insert_user("user@example.com").await?;
            test.token()
                .insert_action_code(
                    user.id,
                    "111111",
                    TokenAction::PasswordReset,
                    None,
                    Duration::minutes(15),
                )
                .await?;

            let result = AccountService::new(&test.db)
                .request_code(&user, request("password_reset", None))
                .await;

            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::EmailNotConfigured))
            ));
            let old = TokenRepository::new(&test.db)
                .get_action_code("111111")
                .await?
                .unwrap();
            assert!(old.used);

            Ok(())
        }
    }

    mod reset_password {
        use chrono::Duration;
        use entity::sea_orm_active_enums::TokenAction;
        use pricehub_test_utils::prelude::*;

        use crate::{
            model::account::PasswordResetDto,
            server::{
                data::user::UserRepository,
                error::{account::AccountError, Error},
                service::{account::AccountService, auth::password::verify_password},
            },
        };

        fn reset(code: Option<&str>, totp_code: Option<&str>) -> PasswordResetDto {
            PasswordResetDto {
                new_password: "brand-new-password".to_string(),
                code: code.map(str::to_string),
                totp_code: totp_code.map(str::to_string),
            }
        }

        /// Expect a valid mailed code to change the password and be consumed
        #[tokio::test]
        async fn resets_with_code() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;
            test.token()
                .insert_action_code(
                    user.id,
                    "123456",
                    TokenAction::PasswordReset,
                    None,
                    Duration::minutes(15),
                )
                .await?;

            let account_service = AccountService::new(&test.db);

            let result = account_service
                .reset_password(&user, reset(Some("123456"), None))
                .await;
            assert!(result.is_ok());

            let updated = UserRepository::new(&test.db).get(user.id).await?.unwrap();
            assert!(verify_password("brand-new-password", &updated.password_hash));

            let result = account_service
                .reset_password(&user, reset(Some("123456"), None))
                .await;
            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::InvalidCode))
            ));

            Ok(())
        }

        /// Expect expired codes to be reported and consumed
        #[tokio::test]
        async fn rejects_expired_code() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;
            test.token()
                .insert_action_code(
                    user.id,
                    "654321",
                    TokenAction::PasswordReset,
                    None,
                    Duration::minutes(-1),
                )
                .await?;

            let account_service = AccountService::new(&test.db);

            let result = account_service
                .reset_password(&user, reset(Some("654321"), None))
                .await;
            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::CodeExpired))
            ));

            let result = account_service
                .reset_password(&user, reset(Some("654321"), None))
                .await;
            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::InvalidCode))
            ));

            Ok(())
        }

        /// Expect a code for another action to be rejected
        #[tokio::test]
        async fn rejects_code_of_other_action() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;
            test.token()
                .insert_action_code(
                    user.id,
                    "222222",
                    TokenAction::EmailChange,
                    Some("new@example.com"),
                    Duration::minutes(15),
                )
                .await?;

            let result = AccountService::new(&test.db)
                .reset_password(&user, reset(Some("222222"), None))
                .await;

            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::InvalidCode))
            ));

            Ok(())
        }

        /// Expect short passwords, missing proof and bad TOTP codes to be rejected
        #[tokio::test]
        async fn validates_request() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;

            let account_service = AccountService::new(&test.db);

            let result = account_service
                .reset_password(
                    &user,
                    PasswordResetDto {
                        new_password: "short".to_string(),
                        code: None,
                        totp_code: None,
                    },
                )
                .await;
            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::PasswordTooShort))
            ));

            let result = account_service.reset_password(&user, reset(None, None)).await;
            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::VerificationRequired))
            ));

            let result = account_service
                .reset_password(&user, reset(None, Some("123456")))
                .await;
            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::InvalidTotp))
            ));

            Ok(())
        }
    }

    mod change_email {
        use chrono::Duration;
        use entity::sea_orm_active_enums::TokenAction;
        use pricehub_test_utils::prelude::*;

        use crate::{
            model::account::EmailChangeDto,
            server::{
                error::{account::AccountError, Error},
                service::account::AccountService,
            },
        };

        fn change(new_email: &str, code: Option<&str>, totp_code: Option<&str>) -> EmailChangeDto {
            EmailChangeDto {
                new_email: new_email.to_string(),
                code: code.map(str::to_string),
                totp_code: totp_code.map(str::to_string),
            }
        }

        /// Expect a mailed code to move the account and keep it verified
        #[tokio::test]
        async fn changes_with_code() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("old@example.com").await?;
            test.token()
                .insert_action_code(
                    user.id,
                    "333333",
                    TokenAction::EmailChange,
                    Some("new@example.com"),
                    Duration::minutes(15),
                )
                .await?;

            let result = AccountService::new(&test.db)
                .change_email(&user, change("New@Example.com", Some("333333"), None))
                .await;

            assert!(result.is_ok());
            assert!(result.unwrap().email_verified);

            Ok(())
        }

        /// Expect a code issued for another address to be refused
        #[tokio::test]
        async fn rejects_mismatched_address() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("old@example.com").await?;
            test.token()
                .insert_action_code(
                    user.id,
                    "444444",
                    TokenAction::EmailChange,
                    Some("new@example.com"),
                    Duration::minutes(15),
                )
                .await?;

            let result = AccountService::new(&test.db)
                .change_email(&user, change("other@example.com", Some("444444"), None))
                .await;

            assert!(matches!(
                result,
                Err(Error::AccountError(AccountError::CodeEmailMismatch))
            ));

            Ok(())
        }

        /// Expect a TOTP backup code to change the address and leave it unverified
        #[tokio::test]
        async fn changes_with_totp() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("old@example.com").await?;
            let user = test
                .user()
                .enable_totp(user, "JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXP", &["feedbeef"])
                .await?;

            let result = AccountService::new(&test.db)
                .change_email(&user, change("new@example.com", None, Some("feedbeef")))
                .await;

            assert!(result.is_ok());
            assert!(!result.unwrap().email_verified);

            Ok(())
        }
    }
}

//! Time-based one-time passwords and their single-use backup codes.

use sea_orm::{ConnectionTrait, DatabaseConnection};
use totp_rs::{Algorithm, Secret, TOTP};

use crate::{
    model::user::{BackupCodesDto, TotpSetupDto},
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, Error},
        service::email::EmailService,
    },
};

pub const BACKUP_CODE_COUNT: usize = 8;

const SECRET_BYTES: usize = 20;

/// Builds the authenticator for a base32 secret, 6 digits every 30s, one step of skew
pub fn build_totp(secret: &str, account: &str, issuer: &str) -> Result<TOTP, Error> {
    let secret = Secret::Encoded(secret.to_string()).to_bytes()?;

    Ok(TOTP::new(
        Algorithm::SHA1,
        6,
        1,
        30,
        secret,
        Some(issuer.replace(':', " ")),
        account.to_string(),
    )?)
}

/// Eight codes of eight lowercase hex characters
pub fn generate_backup_codes() -> Vec<String> {
    (0..BACKUP_CODE_COUNT)
        .map(|_| format!("{:08x}", rand::random::<u32>()))
        .collect()
}

fn parse_backup_codes(user: &entity::user::Model) -> Vec<String> {
    user.totp_backup_codes
        .as_deref()
        .and_then(|stored| serde_json::from_str(stored).ok())
        .unwrap_or_default()
}

/// Accepts a current TOTP code, or an unused backup code which is consumed.
///
/// Always `false` for users without TOTP enabled.
pub async fn verify_code_or_backup<C: ConnectionTrait>(
    db: &C,
    user: &entity::user::Model,
    code: &str,
) -> Result<bool, Error> {
    let Some(secret) = user.totp_secret.as_deref().filter(|_| user.totp_enabled) else {
        return Ok(false);
    };
    let code = code.trim();

    let totp = build_totp(secret, &user.email, "pricehub")?;
    if totp.check_current(code)? {
        return Ok(true);
    }

    let mut backup_codes = parse_backup_codes(user);
    let Some(position) = backup_codes.iter().position(|backup| backup == code) else {
        return Ok(false);
    };

    backup_codes.remove(position);
    UserRepository::new(db)
        .update_backup_codes(user.id, serde_json::to_string(&backup_codes)?)
        .await?;

    tracing::info!(
        "User ID {} used a TOTP backup code, {} left",
        user.id,
        backup_codes.len()
    );

    Ok(true)
}

pub struct TotpService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TotpService<'a> {
    /// Creates a new instance of [`TotpService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issues a fresh secret to confirm with [`Self::enable`]
    pub async fn setup(&self, user: &entity::user::Model) -> Result<TotpSetupDto, Error> {
        if user.totp_enabled {
            return Err(AuthError::TotpAlreadyEnabled.into());
        }

        let issuer = EmailService::new(self.db).site_name().await?;
        let totp = TOTP::new(
            Algorithm::SHA1,
            6,
            1,
            30,
            rand::random::<[u8; SECRET_BYTES]>().to_vec(),
            Some(issuer.replace(':', " ")),
            user.email.clone(),
        )?;
        let secret = totp.get_secret_base32();

        UserRepository::new(self.db)
            .set_totp_temp_secret(user.id, Some(secret.clone()))
            .await?;

        Ok(TotpSetupDto {
            secret,
            otpauth_url: totp.get_url(),
        })
    }

    /// Confirms the pending secret with a code and returns the backup codes
    pub async fn enable(
        &self,
        user: &entity::user::Model,
        code: &str,
    ) -> Result<BackupCodesDto, Error> {
        if user.totp_enabled {
            return Err(AuthError::TotpAlreadyEnabled.into());
        }

        let Some(secret) = user.totp_temp_secret.clone() else {
            return Err(AuthError::TotpNotSetUp.into());
        };

        let totp = build_totp(&secret, &user.email, "pricehub")?;
        if !totp.check_current(code.trim())? {
            return Err(AuthError::InvalidTotp.into());
        }

        let backup_codes = generate_backup_codes();
        UserRepository::new(self.db)
            .enable_totp(user.id, secret, serde_json::to_string(&backup_codes)?)
            .await?;

        tracing::info!("User ID {} enabled TOTP", user.id);

        Ok(BackupCodesDto {
            message: "TOTP enabled".to_string(),
            backup_codes,
        })
    }

    pub async fn disable(&self, user: &entity::user::Model, code: &str) -> Result<(), Error> {
        if !user.totp_enabled {
            return Err(AuthError::TotpNotEnabled.into());
        }

        if !verify_code_or_backup(self.db, user, code).await? {
            return Err(AuthError::InvalidTotp.into());
        }

        UserRepository::new(self.db).disable_totp(user.id).await?;

        tracing::info!("User ID {} disabled TOTP", user.id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    /// Base32 of a 20 byte secret
    pub const SECRET: &str = "JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXP";

    pub fn current_code(secret: &str) -> String {
        crate::server::service::auth::totp::build_totp(secret, "test@example.com", "test")
            .unwrap()
            .generate_current()
            .unwrap()
    }

    mod verify_code_or_backup {
        use pricehub_test_utils::prelude::*;

        use crate::server::{
            data::user::UserRepository,
            service::auth::totp::{
                tests::{current_code, SECRET},
                verify_code_or_backup,
            },
        };

        /// Expect the current code to be accepted
        #[tokio::test]
        async fn accepts_current_code() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("totp@example.com").await?;
            let user = test.user().enable_totp(user, SECRET, &["aaaa1111"]).await?;

            let result = verify_code_or_backup(&test.db, &user, &current_code(SECRET)).await;

            assert!(matches!(result, Ok(true)));

            Ok(())
        }

        /// Expect a backup code to work exactly once
        #[tokio::test]
        async fn consumes_backup_code() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("totp@example.com").await?;
            let user = test
                .user()
                .enable_totp(user, SECRET, &["aaaa1111", "bbbb2222"])
                .await?;

            let result = verify_code_or_backup(&test.db, &user, "aaaa1111").await;
            assert!(matches!(result, Ok(true)));

            let user = UserRepository::new(&test.db).get(user.id).await?.unwrap();
            let result = verify_code_or_backup(&test.db, &user, "aaaa1111").await;
            assert!(matches!(result, Ok(false)));
            assert_eq!(user.totp_backup_codes.as_deref(), Some("[\"bbbb2222\"]"));

            Ok(())
        }

        /// Expect `false` when TOTP is not enabled
        #[tokio::test]
        async fn rejects_without_totp() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("plain@example.com").await?;

            let result = verify_code_or_backup(&test.db, &user, "123456").await;

            assert!(matches!(result, Ok(false)));

            Ok(())
        }
    }

    mod enable {
        use pricehub_test_utils::prelude::*;

        use crate::server::{
            data::user::UserRepository,
            error::{auth::AuthError, Error},
            service::auth::totp::{
                tests::current_code, TotpService, BACKUP_CODE_COUNT,
            },
        };

        /// Expect setup then enable to activate TOTP with backup codes
        #[tokio::test]
        async fn setup_then_enable() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("totp@example.com").await?;

            let totp_service = TotpService::new(&test.db);

            let setup = totp_service.setup(&user).await;
            assert!(setup.is_ok());
            let setup = setup.unwrap();
            assert!(setup.otpauth_url.starts_with("otpauth://totp/"));

            let user = UserRepository::new(&test.db).get(user.id).await?.unwrap();
            let result = totp_service.enable(&user, &current_code(&setup.secret)).await;

            assert!(result.is_ok());
            let codes = result.unwrap().backup_codes;
            assert_eq!(codes.len(), BACKUP_CODE_COUNT);
            assert!(codes
                .iter()
                .all(|c| c.len() == 8 && c.chars().all(|ch| ch.is_ascii_hexdigit())));

            let user = UserRepository::new(&test.db).get(user.id).await?.unwrap();
            assert!(user.totp_enabled);
            assert!(user.totp_temp_secret.is_none());
            assert_eq!(user.totp_secret, Some(setup.secret));

            Ok(())
        }

        /// Expect enable without setup to fail
        #[tokio::test]
        async fn requires_setup() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("totp@example.com").await?;

            let result = TotpService::new(&test.db).enable(&user, "123456").await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::TotpNotSetUp))
            ));

            Ok(())
        }
    }

    mod disable {
        use pricehub_test_utils::prelude::*;

        use crate::server::{
            data::user::UserRepository,
            error::{auth::AuthError, Error},
            service::auth::totp::{tests::SECRET, TotpService},
        };

        /// Expect a wrong code to keep TOTP enabled and a backup code to disable it
        #[tokio::test]
        async fn requires_valid_code() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("totp@example.com").await?;
            let user = test.user().enable_totp(user, SECRET, &["cafe0001"]).await?;

            let totp_service = TotpService::new(&test.db);

            let result = totp_service.disable(&user, "nope").await;
            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::InvalidTotp))
            ));

            let result = totp_service.disable(&user, "cafe0001").await;
            assert!(result.is_ok());

            let user = UserRepository::new(&test.db).get(user.id).await?.unwrap();
            assert!(!user.totp_enabled);
            assert!(user.totp_secret.is_none());

            Ok(())
        }
    }
}

use std::sync::OnceLock;

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use chrono::Utc;
use entity::sea_orm_active_enums::UserRole;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{constant::TEST_PASSWORD, error::TestError, TestContext};

static TEST_PASSWORD_HASH: OnceLock<String> = OnceLock::new();

/// Argon2 hash of [`TEST_PASSWORD`], computed once per test binary
pub fn test_password_hash() -> Result<String, TestError> {
    if let Some(hash) = TEST_PASSWORD_HASH.get() {
        return Ok(hash.clone());
    }

    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())?;
    let hash = Argon2::default()
        .hash_password(TEST_PASSWORD.as_bytes(), &salt)?
        .to_string();

    Ok(TEST_PASSWORD_HASH.get_or_init(|| hash).clone())
}

impl TestContext {
    pub fn user(&self) -> UserFixtures<'_> {
        UserFixtures { setup: self }
    }
}

pub struct UserFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> UserFixtures<'a> {
    /// Insert an active, verified user with the `user` role
    pub async fn insert_user(&self, email: &str) -> Result<entity::user::Model, TestError> {
        self.insert_user_with(email, UserRole::User, true, true).await
    }

    /// Insert an active, verified user with the `admin` role
    pub async fn insert_admin(&self, email: &str) -> Result<entity::user::Model, TestError> {
        self.insert_user_with(email, UserRole::Admin, true, true)
            .await
    }

    /// Insert an active, verified user with the `super_admin` role
    pub async fn insert_super_admin(
        &self,
        email: &str,
    ) -> Result<entity::user::Model, TestError> {
        self.insert_user_with(email, UserRole::SuperAdmin, true, true)
            .await
    }

    pub async fn insert_user_with(
        &self,
        email: &str,
        role: UserRole,
        is_active: bool,
        email_verified: bool,
    ) -> Result<entity::user::Model, TestError> {
        Ok(entity::prelude::User::insert(entity::user::ActiveModel {
            email: ActiveValue::Set(email.to_lowercase()),
            password_hash: ActiveValue::Set(test_password_hash()?),
            role: ActiveValue::Set(role),
            is_active: ActiveValue::Set(is_active),
            email_verified: ActiveValue::Set(email_verified),
            totp_enabled: ActiveValue::Set(false),
            totp_secret: ActiveValue::Set(None),
            totp_backup_codes: ActiveValue::Set(None),
            totp_temp_secret: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    /// Turn on TOTP for a user with the given base32 secret and backup codes
    pub async fn enable_totp(
        &self,
        user: entity::user::Model,
        secret: &str,
        backup_codes: &[&str],
    ) -> Result<entity::user::Model, TestError> {
        let backup_codes = serde_json::to_string(backup_codes)?;

        Ok(entity::prelude::User::update(entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user.id),
            totp_enabled: ActiveValue::Set(true),
            totp_secret: ActiveValue::Set(Some(secret.to_string())),
            totp_backup_codes: ActiveValue::Set(Some(backup_codes)),
            ..Default::default()
        })
        .exec(&self.setup.db)
        .await?)
    }
}

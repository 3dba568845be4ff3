use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::TokenAction;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn token(&self) -> TokenFixtures<'_> {
        TokenFixtures { setup: self }
    }
}

pub struct TokenFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> TokenFixtures<'a> {
    /// Insert an unused account action code expiring `expires_in` from now
    pub async fn insert_action_code(
        &self,
        user_id: i32,
        code: &str,
        action: TokenAction,
        new_email: Option<&str>,
        expires_in: Duration,
    ) -> Result<entity::user_action_token::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::UserActionToken::insert(entity::user_action_token::ActiveModel {
                token: ActiveValue::Set(code.to_string()),
                user_id: ActiveValue::Set(user_id),
                action: ActiveValue::Set(action),
                new_email: ActiveValue::Set(new_email.map(str::to_string)),
                expires_at: ActiveValue::Set(now + expires_in),
                used: ActiveValue::Set(false),
                created_at: ActiveValue::Set(now),
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert an unused email verification token expiring `expires_in` from now
    pub async fn insert_verification_token(
        &self,
        user_id: i32,
        token: &str,
        expires_in: Duration,
    ) -> Result<entity::email_verification_token::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::EmailVerificationToken::insert(
            entity::email_verification_token::ActiveModel {
                token: ActiveValue::Set(token.to_string()),
                user_id: ActiveValue::Set(user_id),
                expires_at: ActiveValue::Set(now + expires_in),
                used: ActiveValue::Set(false),
                created_at: ActiveValue::Set(now),
            },
        )
        .exec_with_returning(&self.setup.db)
        .await?)
    }
}

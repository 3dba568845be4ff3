use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::TokenAction;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter,
};

pub struct TokenRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TokenRepository<'a, C> {
    /// Creates a new instance of [`TokenRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create_verification_token(
        &self,
        user_id: i32,
        token: String,
        valid_for: Duration,
    ) -> Result<entity::email_verification_token::Model, DbErr> {
        let now = Utc::now().naive_utc();

        entity::email_verification_token::ActiveModel {
            token: ActiveValue::Set(token),
            user_id: ActiveValue::Set(user_id),
            expires_at: ActiveValue::Set(now + valid_for),
            used: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn get_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<entity::email_verification_token::Model>, DbErr> {
        entity::prelude::EmailVerificationToken::find_by_id(token.to_string())
            .one(self.db)
            .await
    }

    pub async fn mark_verification_token_used(
        &self,
        token: &str,
    ) -> Result<entity::email_verification_token::Model, DbErr> {
        entity::email_verification_token::ActiveModel {
            token: ActiveValue::Unchanged(token.to_string()),
            used: ActiveValue::Set(true),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn create_action_code(
        &self,
        user_id: i32,
        code: String,
        action: TokenAction,
        new_email: Option<String>,
        valid_for: Duration,
    ) -> Result<entity::user_action_token::Model, DbErr> {
        let now = Utc::now().naive_utc();

        entity::user_action_token::ActiveModel {
            token: ActiveValue::Set(code),
            user_id: ActiveValue::Set(user_id),
            action: ActiveValue::Set(action),
            new_email: ActiveValue::Set(new_email),
            expires_at: ActiveValue::Set(now + valid_for),
            used: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn get_action_code(
        &self,
        code: &str,
    ) -> Result<Option<entity::user_action_token::Model>, DbErr> {
        entity::prelude::UserActionToken::find_by_id(code.to_string())
            .one(self.db)
            .await
    }

    /// Unused code of `user_id` for `action`, if any
    pub async fn find_unused_action_code(
        &self,
        user_id: i32,
        code: &str,
        action: TokenAction,
    ) -> Result<Option<entity::user_action_token::Model>, DbErr> {
        entity::prelude::UserActionToken::find_by_id(code.to_string())
            .filter(entity::user_action_token::Column::UserId.eq(user_id))
            .filter(entity::user_action_token::Column::Action.eq(action))
            .filter(entity::user_action_token::Column::Used.eq(false))
            .one(self.db)
            .await
    }

    /// Marks every unused code of `user_id` for `action` as used
    pub async fn invalidate_unused_action_codes(
        &self,
        user_id: i32,
        action: TokenAction,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::UserActionToken::update_many()
            .col_expr(entity::user_action_token::Column::Used, Expr::value(true))
            .filter(entity::user_action_token::Column::UserId.eq(user_id))
            .filter(entity::user_action_token::Column::Action.eq(action))
            .filter(entity::user_action_token::Column::Used.eq(false))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn mark_action_code_used(
        &self,
        code: &str,
    ) -> Result<entity::user_action_token::Model, DbErr> {
        entity::user_action_token::ActiveModel {
            token: ActiveValue::Unchanged(code.to_string()),
            used: ActiveValue::Set(true),
            ..Default::default()
        }
        .update(self.db)
        .await
    }
}

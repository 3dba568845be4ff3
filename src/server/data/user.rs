use chrono::Utc;
use entity::sea_orm_active_enums::UserRole;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates an active, unverified user without TOTP
    pub async fn create(
        &self,
        email: &str,
        password_hash: String,
        role: UserRole,
    ) -> Result<entity::user::Model, DbErr> {
        let user = entity::user::ActiveModel {
            email: ActiveValue::Set(email.to_lowercase()),
            password_hash: ActiveValue::Set(password_hash),
            role: ActiveValue::Set(role),
            is_active: ActiveValue::Set(true),
            email_verified: ActiveValue::Set(false),
            totp_enabled: ActiveValue::Set(false),
            totp_secret: ActiveValue::Set(None),
            totp_backup_codes: ActiveValue::Set(None),
            totp_temp_secret: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        user.insert(self.db).await
    }

    pub async fn get(&self, user_id: i32) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find_by_id(user_id).one(self.db).await
    }

    /// Case-insensitive lookup, emails are stored lowercased
    pub async fn find_by_email(&self, email: &str) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.to_lowercase()))
            .one(self.db)
            .await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::User::find().count(self.db).await
    }

    pub async fn list(&self) -> Result<Vec<entity::user::Model>, DbErr> {
        entity::prelude::User::find()
            .order_by_asc(entity::user::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn update_password(
        &self,
        user_id: i32,
        password_hash: String,
    ) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            password_hash: ActiveValue::Set(password_hash),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn update_email(
        &self,
        user_id: i32,
        email: &str,
        email_verified: bool,
    ) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            email: ActiveValue::Set(email.to_lowercase()),
            email_verified: ActiveValue::Set(email_verified),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn mark_email_verified(&self, user_id: i32) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            email_verified: ActiveValue::Set(true),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Updates the user's role
    ///
    /// Returns `None` if the user does not exist.
    pub async fn update_role(
        &self,
        user_id: i32,
        role: UserRole,
    ) -> Result<Option<entity::user::Model>, DbErr> {
        let Some(user) = self.get(user_id).await? else {
            return Ok(None);
        };

        let mut user: entity::user::ActiveModel = user.into();
        user.role = ActiveValue::Set(role);

        Ok(Some(user.update(self.db).await?))
    }

    /// Stores a secret awaiting confirmation, replacing any previous one
    pub async fn set_totp_temp_secret(
        &self,
        user_id: i32,
        secret: Option<String>,
    ) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            totp_temp_secret: ActiveValue::Set(secret),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Promotes the confirmed secret and stores the backup codes (JSON list)
    pub async fn enable_totp(
        &self,
        user_id: i32,
        secret: String,
        backup_codes: String,
    ) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            totp_enabled: ActiveValue::Set(true),
            totp_secret: ActiveValue::Set(Some(secret)),
            totp_backup_codes: ActiveValue::Set(Some(backup_codes)),
            totp_temp_secret: ActiveValue::Set(None),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn disable_totp(&self, user_id: i32) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            totp_enabled: ActiveValue::Set(false),
            totp_secret: ActiveValue::Set(None),
            totp_backup_codes: ActiveValue::Set(None),
            totp_temp_secret: ActiveValue::Set(None),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn update_backup_codes(
        &self,
        user_id: i32,
        backup_codes: String,
    ) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            totp_backup_codes: ActiveValue::Set(Some(backup_codes)),
            ..Default::default()
        }
        .update(self.db)
        .await
    }
}

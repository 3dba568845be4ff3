//! Moderation of user submissions and administration of users and system settings.

use std::collections::HashMap;

use chrono::Utc;
use entity::sea_orm_active_enums::{PriceStatus, ProviderStatus, RequestStatus};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        admin::{
            ApproveModelRequestDto, PendingModelRequestDto, PendingPriceDto, PendingProviderDto,
        },
        user::UserDto,
    },
    server::{
        data::{
            model_request::ModelRequestRepository, price::PriceRepository,
            provider::ProviderRepository, setting::SettingRepository,
            standard_model::StandardModelRepository, user::UserRepository,
        },
        error::{admin::AdminError, price::PriceError, provider::ProviderError, Error},
        service::exchange_rate::EXCHANGE_RATE_INTERVAL_KEY,
        util::role::parse_role,
    },
};

pub const HOME_DISPLAY_MODE_KEY: &str = "home_display_mode";

const HOME_DISPLAY_MODES: [&str; 3] = ["table", "cards", "chart"];

/// Stored string form of a JSON setting value, strings are kept unquoted
pub fn setting_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub struct ModerationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ModerationService<'a> {
    /// Creates a new instance of [`ModerationService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn pending_prices(&self) -> Result<Vec<PendingPriceDto>, Error> {
        let pending = PriceRepository::new(self.db).list_pending().await?;

        Ok(pending
            .into_iter()
            .map(|row| PendingPriceDto {
                id: row.price.id,
                provider_name: row.provider_name,
                model_name: row.model_name,
                provider_model_name: row.price.provider_model_name,
                input_price: row.price.input_price,
                output_price: row.price.output_price,
                currency: row.price.currency,
                proof_type: row.price.proof_type,
                proof_content: row.price.proof_content,
                proof_img_path: row.price.proof_img_path,
                created_at: row.price.created_at,
            })
            .collect())
    }

    /// Makes a price visible and stamps it as verified now
    pub async fn approve_price(&self, price_id: i32) -> Result<(), Error> {
        self.set_price_status(price_id, PriceStatus::Active).await
    }

    pub async fn reject_price(&self, price_id: i32) -> Result<(), Error> {
        self.set_price_status(price_id, PriceStatus::Rejected).await
    }

    async fn set_price_status(&self, price_id: i32, status: PriceStatus) -> Result<(), Error> {
        let price_repo = PriceRepository::new(self.db);

        if price_repo.get(price_id).await?.is_none() {
            return Err(PriceError::PriceNotFound.into());
        }

        let verified_at = match status {
            PriceStatus::Active => Some(Utc::now().naive_utc()),
            _ => None,
        };
        price_repo
            .update_status(price_id, status, verified_at)
            .await?;

        tracing::info!("Price ID {} moderated to {:?}", price_id, status);

        Ok(())
    }

    pub async fn pending_providers(&self) -> Result<Vec<PendingProviderDto>, Error> {
        let pending = ProviderRepository::new(self.db)
            .list_pending_with_owner()
            .await?;

        Ok(pending
            .into_iter()
            .map(|(provider, owner)| PendingProviderDto {
                id: provider.id,
                name: provider.name,
                website: provider.website,
                openai_base_url: provider.openai_base_url,
                gemini_base_url: provider.gemini_base_url,
                claude_base_url: provider.claude_base_url,
                proof_type: provider.proof_type,
                proof_content: provider.proof_content,
                submitter_email: owner.map(|user| user.email),
                created_at: provider.created_at,
            })
            .collect())
    }

    pub async fn approve_provider(&self, provider_id: i32) -> Result<(), Error> {
        self.resolve_provider(provider_id, ProviderStatus::Approved)
            .await
    }

    pub async fn reject_provider(&self, provider_id: i32) -> Result<(), Error> {
        self.resolve_provider(provider_id, ProviderStatus::Rejected)
            .await
    }

    /// Moves a `pending` provider to its final status
    async fn resolve_provider(&self, provider_id: i32, status: ProviderStatus) -> Result<(), Error> {
        let provider_repo = ProviderRepository::new(self.db);

        let Some(provider) = provider_repo.get(provider_id).await? else {
            return Err(ProviderError::NotFound.into());
        };

        if provider.status != ProviderStatus::Pending {
            return Err(AdminError::ProviderNotPending.into());
        }

        provider_repo.update_status(provider.id, status).await?;

        tracing::info!("Provider {} moderated to {:?}", provider.name, status);

        Ok(())
    }

    pub async fn pending_model_requests(&self) -> Result<Vec<PendingModelRequestDto>, Error> {
        let pending = ModelRequestRepository::new(self.db)
            .list_pending_with_requester()
            .await?;

        Ok(pending
            .into_iter()
            .map(|(request, requester)| PendingModelRequestDto {
                id: request.id,
                requested_name: request.requested_name,
                vendor: request.vendor,
                requester_email: requester.map(|user| user.email),
                created_at: request.created_at,
            })
            .collect())
    }

    /// Creates the requested standard model, optionally renamed, and closes the request
    pub async fn approve_model_request(
        &self,
        request_id: i32,
        overrides: ApproveModelRequestDto,
    ) -> Result<entity::standard_model::Model, Error> {
        let txn = self.db.begin().await?;
        let request_repo = ModelRequestRepository::new(&txn);

        let Some(request) = request_repo.get(request_id).await? else {
            return Err(AdminError::RequestNotFound.into());
        };
        if request.status != RequestStatus::Pending {
            return Err(AdminError::RequestNotPending.into());
        }

        let name = overrides
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(request.requested_name);
        let vendor = overrides
            .vendor
            .filter(|vendor| !vendor.trim().is_empty())
            .or(request.vendor);

        let model = StandardModelRepository::new(&txn)
            .create_named(name, vendor)
            .await?;
        request_repo
            .update_status(request.id, RequestStatus::Approved)
            .await?;

        txn.commit().await?;

        tracing::info!(
            "Model request ID {} approved as standard model {} ({})",
            request_id,
            model.name,
            model.id
        );

        Ok(model)
    }

    pub async fn reject_model_request(&self, request_id: i32) -> Result<(), Error> {
        let request_repo = ModelRequestRepository::new(self.db);

        let Some(request) = request_repo.get(request_id).await? else {
            return Err(AdminError::RequestNotFound.into());
        };
        if request.status != RequestStatus::Pending {
            return Err(AdminError::RequestNotPending.into());
        }

        request_repo
            .update_status(request.id, RequestStatus::Rejected)
            .await?;

        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<UserDto>, Error> {
        Ok(UserRepository::new(self.db)
            .list()
            .await?
            .into_iter()
            .map(UserDto::from)
            .collect())
    }

    pub async fn update_user_role(&self, user_id: i32, role: &str) -> Result<UserDto, Error> {
        let Some(role) = parse_role(role) else {
            return Err(AdminError::InvalidRole.into());
        };

        let Some(user) = UserRepository::new(self.db)
            .update_role(user_id, role)
            .await?
        else {
            return Err(AdminError::UserNotFound.into());
        };

        tracing::info!("User ID {} role set to {:?}", user.id, role);

        Ok(user.into())
    }

    pub async fn settings(&self) -> Result<HashMap<String, String>, Error> {
        Ok(SettingRepository::new(self.db).all().await?)
    }

    /// Upserts every given setting.
    ///
    /// Returns whether the exchange-rate interval was part of the update, in which case the
    /// refresh job has to be rescheduled.
    pub async fn update_settings(
        &self,
        settings: HashMap<String, serde_json::Value>,
    ) -> Result<bool, Error> {
        let mut values = Vec::with_capacity(settings.len());
        let mut reschedule = false;

        for (key, value) in settings {
            let value = setting_value_to_string(&value);

            if key == HOME_DISPLAY_MODE_KEY && !HOME_DISPLAY_MODES.contains(&value.as_str()) {
                return Err(AdminError::InvalidDisplayMode.into());
            }
            if key == EXCHANGE_RATE_INTERVAL_KEY {
                reschedule = true;
            }

            values.push((key, value));
        }

        SettingRepository::new(self.db).upsert_many(&values).await?;

        tracing::info!("Updated {} system settings", values.len());

        Ok(reschedule)
    }
}

#[cfg(test)]
mod tests {
    mod approve_price {
        use entity::sea_orm_active_enums::PriceStatus;
        use pricehub_test_utils::prelude::*;
        use sea_orm::EntityTrait;

        use crate::server::{
            error::{price::PriceError, Error},
            service::moderation::ModerationService,
        };

        /// Expect approval to activate the price and set `verified_at`
        #[tokio::test]
        async fn activates_and_stamps() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let model = test.standard_model().insert_model("gpt-4o").await?;
            let provider = test.provider().insert_approved("Relay").await?;
            let price = test
                .price()
                .insert_price(provider.id, model.id, 1.0, 2.0, "USD", PriceStatus::Pending)
                .await?;

            let result = ModerationService::new(&test.db)
                .approve_price(price.id)
                .await;

            assert!(result.is_ok());
            let price = entity::prelude::ModelPrice::find_by_id(price.id)
                .one(&test.db)
                .await?
                .unwrap();
            assert_eq!(price.status, PriceStatus::Active);
            assert!(price.verified_at.is_some());

            Ok(())
        }

        /// Expect a missing price to be reported as not found
        #[tokio::test]
        async fn missing_price() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;

            let result = ModerationService::new(&test.db).reject_price(42).await;

            assert!(matches!(
                result,
                Err(Error::PriceError(PriceError::PriceNotFound))
            ));

            Ok(())
        }
    }

    mod approve_provider {
        use entity::sea_orm_active_enums::ProviderStatus;
        use pricehub_test_utils::prelude::*;

        use crate::server::{
            error::{admin::AdminError, Error},
            service::moderation::ModerationService,
        };

        /// Expect only pending providers to be moderated
        #[tokio::test]
        async fn requires_pending() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let owner = test.user().insert_user("owner@example.com").await?;
            let pending = test
                .provider()
                .insert_provider("Pending", ProviderStatus::Pending, Some(owner.id))
                .await?;
            let private = test
                .provider()
                .insert_provider("Private", ProviderStatus::Private, Some(owner.id))
                .await?;

            let moderation = ModerationService::new(&test.db);

            let listed = moderation.pending_providers().await;
            assert!(listed.is_ok());
            let listed = listed.unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].submitter_email.as_deref(), Some("owner@example.com"));

            assert!(moderation.approve_provider(pending.id).await.is_ok());
            assert!(matches!(
                moderation.approve_provider(private.id).await,
                Err(Error::AdminError(AdminError::ProviderNotPending))
            ));
            assert!(matches!(
                moderation.reject_provider(pending.id).await,
                Err(Error::AdminError(AdminError::ProviderNotPending))
            ));

            Ok(())
        }
    }

    mod approve_model_request {
        use entity::sea_orm_active_enums::RequestStatus;
        use pricehub_test_utils::prelude::*;
        use sea_orm::EntityTrait;

        use crate::{
            model::admin::ApproveModelRequestDto,
            server::{
                data::model_request::ModelRequestRepository,
                error::{admin::AdminError, Error},
                service::moderation::ModerationService,
            },
        };

        /// Expect the override name to win while the requested vendor is kept
        #[tokio::test]
        async fn creates_model_with_override() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("req@example.com").await?;
            let request = ModelRequestRepository::new(&test.db)
                .create("gpt4o".to_string(), Some("OpenAI".to_string()), user.id)
                .await?;

            let moderation = ModerationService::new(&test.db);
            let result = moderation
                .approve_model_request(
                    request.id,
                    ApproveModelRequestDto {
                        name: Some("gpt-4o".to_string()),
                        vendor: None,
                    },
                )
                .await;

            assert!(result.is_ok());
            let model = result.unwrap();
            assert_eq!(model.name, "gpt-4o");
            assert_eq!(model.vendor.as_deref(), Some("OpenAI"));

            let request = entity::prelude::StandardModelRequest::find_by_id(request.id)
                .one(&test.db)
                .await?
                .unwrap();
            assert_eq!(request.status, RequestStatus::Approved);

            let again = moderation.reject_model_request(request.id).await;
            assert!(matches!(
                again,
                Err(Error::AdminError(AdminError::RequestNotPending))
            ));

            Ok(())
        }
    }

    mod update_user_role {
        use entity::sea_orm_active_enums::UserRole;
        use pricehub_test_utils::prelude::*;
        use sea_orm::EntityTrait;

        use crate::server::{
            error::{admin::AdminError, Error},
            service::moderation::ModerationService,
        };

        /// Expect unknown roles and users to be rejected
        #[tokio::test]
        async fn validates_role_and_user() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;

            let moderation = ModerationService::new(&test.db);

            assert!(matches!(
                moderation.update_user_role(user.id, "root").await,
                Err(Error::AdminError(AdminError::InvalidRole))
            ));
            assert!(matches!(
                moderation.update_user_role(999, "admin").await,
                Err(Error::AdminError(AdminError::UserNotFound))
            ));

            let updated = moderation.update_user_role(user.id, "admin").await;
            assert!(updated.is_ok());
            assert_eq!(updated.unwrap().role, "admin");

            let stored = entity::prelude::User::find_by_id(user.id)
                .one(&test.db)
                .await?;
            assert_eq!(stored.map(|u| u.role), Some(UserRole::Admin));

            Ok(())
        }
    }

    mod update_settings {
        use std::collections::HashMap;

        use pricehub_test_utils::prelude::*;
        use serde_json::json;

        use crate::server::{
            error::{admin::AdminError, Error},
            service::moderation::ModerationService,
        };

        /// Expect an invalid display mode to reject the whole update
        #[tokio::test]
        async fn rejects_invalid_display_mode() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;

            let result = ModerationService::new(&test.db)
                .update_settings(HashMap::from([
                    ("site_name".to_string(), json!("Hub")),
                    ("home_display_mode".to_string(), json!("grid")),
                ]))
                .await;

            assert!(matches!(
                result,
                Err(Error::AdminError(AdminError::InvalidDisplayMode))
            ));

            Ok(())
        }

        /// Expect values to be stored as strings and the interval to request a reschedule
        #[tokio::test]
        async fn stores_and_flags_reschedule() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;

            let moderation = ModerationService::new(&test.db);
            let result = moderation
                .update_settings(HashMap::from([
                    ("exchange_rate_interval_minutes".to_string(), json!(60)),
                    ("force_email_verification".to_string(), json!(true)),
                    ("site_name".to_string(), json!("Hub")),
                ]))
                .await;

            assert!(result.is_ok());
            assert!(result.unwrap());

            let settings = moderation.settings().await;
            assert!(settings.is_ok());
            let settings = settings.unwrap();
            assert_eq!(
                settings.get("exchange_rate_interval_minutes").map(String::as_str),
                Some("60")
            );
            assert_eq!(
                settings.get("force_email_verification").map(String::as_str),
                Some("true")
            );
            assert_eq!(settings.get("site_name").map(String::as_str), Some("Hub"));

            Ok(())
        }
    }
}

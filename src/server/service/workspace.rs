//! Per-user workspace: end-to-end encryption settings, stored API keys and private providers.
//!
//! Key material arrives already encrypted by the client when E2EE is on; the server only stores
//! the salt and a verification blob so the client can check its passphrase.

use entity::sea_orm_active_enums::ProviderStatus;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::CreatedDto,
        key::{AddApiKeyDto, ApiKeyDto},
        provider::{CreateProviderDto, OwnedProviderDto, ProviderProofDto, UpdateProviderDto},
        settings::{E2eeSettingsDto, E2eeSetupDto},
    },
    server::{
        data::{
            api_key::ApiKeyRepository,
            provider::{NewProvider, ProviderChanges, ProviderRepository},
            user_settings::UserSettingsRepository,
        },
        error::{provider::ProviderError, Error},
    },
};

/// Approved and official providers are public, anything else only to its owner
pub fn is_visible_to(provider: &entity::provider::Model, user_id: i32) -> bool {
    provider.is_official
        || provider.status == ProviderStatus::Approved
        || provider.owner_id == Some(user_id)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_proof(
    proof_type: Option<String>,
    proof_content: Option<String>,
) -> Result<(String, String), Error> {
    match (non_blank(proof_type), non_blank(proof_content)) {
        (Some(proof_type), Some(proof_content)) => Ok((proof_type, proof_content)),
        _ => Err(ProviderError::ProofRequired.into()),
    }
}

pub struct WorkspaceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WorkspaceService<'a> {
    /// Creates a new instance of [`WorkspaceService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn e2ee_settings(&self, user_id: i32) -> Result<E2eeSettingsDto, Error> {
        let settings = UserSettingsRepository::new(self.db)
            .get_or_create(user_id)
            .await?;

        Ok(E2eeSettingsDto {
            e2ee_enabled: settings.e2ee_enabled,
            e2ee_salt: settings.e2ee_salt,
            e2ee_verification: settings.e2ee_verification,
        })
    }

    pub async fn enable_e2ee(&self, user_id: i32, setup: E2eeSetupDto) -> Result<(), Error> {
        UserSettingsRepository::new(self.db)
            .enable_e2ee(user_id, setup.salt, setup.verification)
            .await?;

        tracing::info!("User ID {} enabled E2EE", user_id);

        Ok(())
    }

    /// Turns E2EE off and forgets the salt; previously encrypted keys stay as stored
    pub async fn disable_e2ee(&self, user_id: i32) -> Result<(), Error> {
        UserSettingsRepository::new(self.db)
            .disable_e2ee(user_id)
            .await?;

        tracing::info!("User ID {} disabled E2EE", user_id);

        Ok(())
    }

    pub async fn api_keys(&self, user_id: i32) -> Result<Vec<ApiKeyDto>, Error> {
        let keys = ApiKeyRepository::new(self.db)
            .list_by_user_with_provider(user_id)
            .await?;

        Ok(keys
            .into_iter()
            .filter_map(|(key, provider)| {
                let provider = provider?;

                Some(ApiKeyDto {
                    id: key.id,
                    provider_id: key.provider_id,
                    provider_name: provider.name,
                    api_key: key.api_key,
                    is_encrypted: key.is_encrypted,
                    note: key.note,
                    created_at: key.created_at,
                    openai_base_url: provider.openai_base_url,
                    gemini_base_url: provider.gemini_base_url,
                    claude_base_url: provider.claude_base_url,
                })
            })
            .collect())
    }

    pub async fn add_api_key(&self, user_id: i32, key: AddApiKeyDto) -> Result<i32, Error> {
        let Some(provider) = ProviderRepository::new(self.db)
            .get(key.provider_id)
            .await?
        else {
            return Err(ProviderError::NotFound.into());
        };

        if !is_visible_to(&provider, user_id) {
            return Err(ProviderError::PrivateProvider.into());
        }

        let created = ApiKeyRepository::new(self.db)
            .create(
                user_id,
                provider.id,
                key.api_key,
                key.is_encrypted,
                non_blank(key.note),
            )
            .await?;

        Ok(created.id)
    }

    /// Deletes one of the user's keys; keys of other users look absent
    pub async fn delete_api_key(&self, user_id: i32, key_id: i32) -> Result<(), Error> {
        let api_key_repo = ApiKeyRepository::new(self.db);

        if api_key_repo.get_owned(key_id, user_id).await?.is_none() {
            return Err(ProviderError::ApiKeyNotFound.into());
        }

        api_key_repo.delete(key_id).await?;

        Ok(())
    }

    pub async fn providers(&self, user_id: i32) -> Result<Vec<OwnedProviderDto>, Error> {
        Ok(ProviderRepository::new(self.db)
            .list_by_owner(user_id)
            .await?
            .into_iter()
            .map(OwnedProviderDto::from)
            .collect())
    }

    /// Creates a private provider, or a pending one when submitted for review with proof
    pub async fn create_provider(
        &self,
        user_id: i32,
        provider: CreateProviderDto,
    ) -> Result<CreatedDto, Error> {
        let Some(name) = non_blank(Some(provider.name)) else {
            return Err(ProviderError::Required.into());
        };

        let (status, proof_type, proof_content) = if provider.submit_for_review {
            let (proof_type, proof_content) =
                require_proof(provider.proof_type, provider.proof_content)?;
            (ProviderStatus::Pending, Some(proof_type), Some(proof_content))
        } else {
            (ProviderStatus::Private, None, None)
        };

        let created = ProviderRepository::new(self.db)
            .create(
                NewProvider {
                    name,
                    website: non_blank(provider.website),
                    owner_id: Some(user_id),
                    openai_base_url: non_blank(provider.openai_base_url),
                    gemini_base_url: non_blank(provider.gemini_base_url),
                    claude_base_url: non_blank(provider.claude_base_url),
                    proof_type,
                    proof_content,
                },
                status,
            )
            .await?;

        tracing::info!(
            "User ID {} created provider {} ({})",
            user_id,
            created.name,
            created.id
        );

        let message = if status == ProviderStatus::Pending {
            "Provider submitted for public review"
        } else {
            "Provider created successfully"
        };

        Ok(CreatedDto {
            message: message.to_string(),
            id: created.id,
        })
    }

    async fn owned_provider(
        &self,
        user_id: i32,
        provider_id: i32,
    ) -> Result<entity::provider::Model, Error> {
        match ProviderRepository::new(self.db).get(provider_id).await? {
            Some(provider) if provider.owner_id == Some(user_id) => Ok(provider),
            _ => Err(ProviderError::NotFound.into()),
        }
    }

    pub async fn update_provider(
        &self,
        user_id: i32,
        provider_id: i32,
        changes: UpdateProviderDto,
    ) -> Result<OwnedProviderDto, Error> {
        self.owned_provider(user_id, provider_id).await?;

        let updated = ProviderRepository::new(self.db)
            .update_details(
                provider_id,
                ProviderChanges {
                    name: non_blank(changes.name),
                    website: changes.website,
                    openai_base_url: changes.openai_base_url,
                    gemini_base_url: changes.gemini_base_url,
                    claude_base_url: changes.claude_base_url,
                },
            )
            .await?;

        Ok(updated.into())
    }

    /// Moves a private provider into the moderation queue
    pub async fn submit_provider(
        &self,
        user_id: i32,
        provider_id: i32,
        proof: ProviderProofDto,
    ) -> Result<OwnedProviderDto, Error> {
        let provider = self.owned_provider(user_id, provider_id).await?;

        if provider.status != ProviderStatus::Private {
            return Err(ProviderError::NotPrivate.into());
        }

        let (proof_type, proof_content) =
            require_proof(Some(proof.proof_type), Some(proof.proof_content))?;

        let submitted = ProviderRepository::new(self.db)
            .submit_for_review(provider_id, proof_type, proof_content)
            .await?;

        tracing::info!(
            "User ID {} submitted provider ID {} for review",
            user_id,
            provider_id
        );

        Ok(submitted.into())
    }

    pub async fn delete_provider(&self, user_id: i32, provider_id: i32) -> Result<(), Error> {
        self.owned_provider(user_id, provider_id).await?;

        if ApiKeyRepository::new(self.db)
            .exists_for_provider(provider_id)
            .await?
        {
            return Err(ProviderError::HasApiKeys.into());
        }

        ProviderRepository::new(self.db).delete(provider_id).await?;

        tracing::info!("User ID {} deleted provider ID {}", user_id, provider_id);

        Ok(())
    }
}

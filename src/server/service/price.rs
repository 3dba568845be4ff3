//! Price submission.
//!
//! Submissions name a provider either by id or by name and a model either by id or by name.
//! Every submitted price starts out `pending` until a moderator approves it.

use std::path::Path;

use entity::sea_orm_active_enums::ProviderStatus;
use sea_orm::{ActiveEnum, ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::price::{
        BatchSubmitDto, BatchSubmittedDto, ModelRequestResultDto, ModelRequestedDto,
        SubmitPriceDto, SubmittedPriceDto, UpdatePriceDto,
    },
    server::{
        data::{
            model_request::ModelRequestRepository,
            price::{NewPrice, PriceRepository},
            provider::{NewProvider, ProviderRepository},
            standard_model::StandardModelRepository,
        },
        error::{price::PriceError, provider::ProviderError, Error},
        util::{role::is_admin, upload::save_proof_image},
    },
};

/// Result of a single price submission
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Price stored as `pending`
    Submitted(SubmittedPriceDto),
    /// The named model does not exist yet, a model request was filed instead
    ModelRequested(ModelRequestedDto),
}

/// Provider part of a submission
struct ProviderSelection {
    provider_id: Option<i32>,
    provider_name: Option<String>,
    details: NewProvider,
    submit_for_review: bool,
}

fn normalize_currency(currency: Option<&str>) -> String {
    match currency.map(str::trim) {
        Some(code) if !code.is_empty() => code.to_uppercase(),
        _ => "USD".to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn ensure_non_negative(prices: &[Option<f64>]) -> Result<(), Error> {
    if prices.iter().flatten().any(|price| *price < 0.0 || !price.is_finite()) {
        return Err(PriceError::NegativePrice.into());
    }

    Ok(())
}

/// Finds the selected provider or creates one owned by `user_id`.
///
/// With `reuse_approved` an approved provider of the same name is used instead of creating
/// a duplicate.
async fn resolve_provider<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    selection: ProviderSelection,
    reuse_approved: bool,
) -> Result<entity::provider::Model, Error> {
    let provider_repo = ProviderRepository::new(db);

    if let Some(provider_id) = selection.provider_id {
        let Some(provider) = provider_repo.get(provider_id).await? else {
            return Err(ProviderError::NotFound.into());
        };

        if provider.status == ProviderStatus::Private && provider.owner_id != Some(user_id) {
            return Err(ProviderError::PrivateProvider.into());
        }

        return Ok(provider);
    }

    let Some(name) = non_empty(selection.provider_name) else {
        return Err(ProviderError::Required.into());
    };

    if reuse_approved {
        if let Some(existing) = provider_repo.find_approved_by_name(&name).await? {
            return Ok(existing);
        }
    }

    let status = if selection.submit_for_review {
        ProviderStatus::Pending
    } else {
        ProviderStatus::Private
    };

    let provider = provider_repo
        .create(
            NewProvider {
                name,
                owner_id: Some(user_id),
                ..selection.details
            },
            status,
        )
        .await?;

    tracing::info!(
        "User ID {} created provider {} ({}) as {}",
        user_id,
        provider.name,
        provider.id,
        provider.status.to_value()
    );

    Ok(provider)
}

pub struct PriceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PriceService<'a> {
    /// Creates a new instance of [`PriceService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a single submitted price.
    ///
    /// An unknown model name files a model request and returns
    /// [`SubmissionOutcome::ModelRequested`] without storing a price; a provider created along
    /// the way is kept. Proof images are written below `static_dir`.
    pub async fn submit(
        &self,
        user_id: i32,
        submission: SubmitPriceDto,
        static_dir: &Path,
    ) -> Result<SubmissionOutcome, Error> {
        let price_in = submission
            .price_in
            .ok_or_else(|| PriceError::InvalidField("price_in".to_string()))?;
        let price_out = submission
            .price_out
            .ok_or_else(|| PriceError::InvalidField("price_out".to_string()))?;
        ensure_non_negative(&[Some(price_in), Some(price_out)])?;

        let txn = self.db.begin().await?;

        let provider = resolve_provider(
            &txn,
            user_id,
            ProviderSelection {
                provider_id: submission.provider_id,
                provider_name: submission.provider_name,
                details: NewProvider {
                    website: non_empty(submission.provider_website),
                    openai_base_url: non_empty(submission.openai_base_url),
                    gemini_base_url: non_empty(submission.gemini_base_url),
                    claude_base_url: non_empty(submission.claude_base_url),
                    proof_type: non_empty(submission.provider_proof_type),
                    proof_content: non_empty(submission.provider_proof_content),
                    ..Default::default()
                },
                submit_for_review: submission.submit_provider_for_review,
            },
            true,
        )
        .await?;

        let model_repo = StandardModelRepository::new(&txn);
        let model = if let Some(model_id) = submission.standard_model_id {
            model_repo
                .get(model_id)
                .await?
                .ok_or(PriceError::ModelNotFound)?
        } else if let Some(name) = non_empty(submission.new_model_name) {
            match model_repo.find_by_name(&name).await? {
                Some(model) => model,
                None => {
                    let request = ModelRequestRepository::new(&txn)
                        .create(name, non_empty(submission.new_model_vendor), user_id)
                        .await?;
                    txn.commit().await?;

                    tracing::info!(
                        "User ID {} requested model {} while submitting a price",
                        user_id,
                        request.requested_name
                    );

                    return Ok(SubmissionOutcome::ModelRequested(ModelRequestedDto {
                        message: format!(
                            "Model request submitted. ID: {}. Please wait for admin approval before submitting price.",
                            request.id
                        ),
                        request_id: request.id,
                    }));
                }
            }
        } else {
            return Err(PriceError::ModelRequired.into());
        };

        let mut proof_content = submission.proof_content;
        let mut proof_img_path = None;
        if submission.proof_type.as_deref() == Some("image") {
            if let Some(file) = submission.file.as_ref() {
                let path = save_proof_image(static_dir, &provider.name, file).await?;
                proof_content = Some(path.clone());
                proof_img_path = Some(path);
            }
        }

        let price = PriceRepository::new(&txn)
            .create(NewPrice {
                provider_id: provider.id,
                standard_model_id: model.id,
                submitter_id: Some(user_id),
                provider_model_name: non_empty(submission.provider_model_name),
                currency: normalize_currency(submission.currency.as_deref()),
                input_price: price_in,
                output_price: price_out,
                cache_hit_input_price: None,
                cache_hit_output_price: None,
                proof_type: submission.proof_type,
                proof_content,
                proof_img_path,
            })
            .await?;

        txn.commit().await?;

        tracing::info!(
            "User ID {} submitted price ID {} for model {} at provider {}",
            user_id,
            price.id,
            model.name,
            provider.name
        );

        Ok(SubmissionOutcome::Submitted(SubmittedPriceDto {
            message: "Price submitted successfully".to_string(),
            id: price.id,
            provider_id: provider.id,
            provider_status: provider.status.to_value(),
        }))
    }

    /// Stores several prices for one provider, creating unknown models directly.
    ///
    /// Either every price is stored or none is.
    pub async fn submit_batch(
        &self,
        user_id: i32,
        batch: BatchSubmitDto,
    ) -> Result<BatchSubmittedDto, Error> {
        for entry in &batch.prices {
            ensure_non_negative(&[
                Some(entry.price_in),
                Some(entry.price_out),
                entry.cache_hit_input_price,
                entry.cache_hit_output_price,
            ])?;
        }

        let txn = self.db.begin().await?;

        let provider = resolve_provider(
            &txn,
            user_id,
            ProviderSelection {
                provider_id: batch.provider_id,
                provider_name: batch.provider_name,
                details: NewProvider {
                    website: non_empty(batch.provider_website),
                    openai_base_url: non_empty(batch.openai_base_url),
                    gemini_base_url: non_empty(batch.gemini_base_url),
                    claude_base_url: non_empty(batch.claude_base_url),
                    proof_type: non_empty(batch.provider_proof_type),
                    proof_content: non_empty(batch.provider_proof_content),
                    ..Default::default()
                },
                submit_for_review: batch.submit_provider_for_review,
            },
            false,
        )
        .await?;

        let model_repo = StandardModelRepository::new(&txn);
        let price_repo = PriceRepository::new(&txn);
        let mut created_price_ids = Vec::with_capacity(batch.prices.len());

        for entry in batch.prices {
            let model = if let Some(model_id) = entry.standard_model_id {
                model_repo
                    .get(model_id)
                    .await?
                    .ok_or(PriceError::ModelNotFound)?
            } else if let Some(name) = non_empty(entry.new_model_name) {
                match model_repo.find_by_name(&name).await? {
                    Some(model) => model,
                    None => {
                        model_repo
                            .create_named(name, non_empty(entry.new_model_vendor))
                            .await?
                    }
                }
            } else {
                return Err(PriceError::ModelRequired.into());
            };

            let price = price_repo
                .create(NewPrice {
                    provider_id: provider.id,
                    standard_model_id: model.id,
                    submitter_id: Some(user_id),
                    provider_model_name: non_empty(entry.provider_model_name),
                    currency: normalize_currency(Some(&entry.currency)),
                    input_price: entry.price_in,
                    output_price: entry.price_out,
                    cache_hit_input_price: entry.cache_hit_input_price,
                    cache_hit_output_price: entry.cache_hit_output_price,
                    proof_type: entry.proof_type,
                    proof_content: entry.proof_content,
                    proof_img_path: None,
                })
                .await?;

            created_price_ids.push(price.id);
        }

        txn.commit().await?;

        tracing::info!(
            "User ID {} batch submitted {} prices for provider {}",
            user_id,
            created_price_ids.len(),
            provider.name
        );

        Ok(BatchSubmittedDto {
            message: "Batch submitted".to_string(),
            provider_id: provider.id,
            created_price_ids,
            provider_status: provider.status.to_value(),
        })
    }

    /// Changes the amounts or currency of a price, allowed for its submitter and admins
    pub async fn update(
        &self,
        user: &entity::user::Model,
        price_id: i32,
        changes: UpdatePriceDto,
    ) -> Result<entity::model_price::Model, Error> {
        let price_repo = PriceRepository::new(self.db);

        let Some(price) = price_repo.get(price_id).await? else {
            return Err(PriceError::PriceNotFound.into());
        };

        if !is_admin(user.role) && price.submitter_id != Some(user.id) {
            return Err(PriceError::NotPriceOwner.into());
        }

        ensure_non_negative(&[changes.input_price, changes.output_price])?;

        let currency = changes
            .currency
            .map(|currency| normalize_currency(Some(&currency)));

        Ok(price_repo
            .update_amounts(price.id, changes.input_price, changes.output_price, currency)
            .await?)
    }

    /// Asks moderators to add a standard model, unless it exists or is already requested
    pub async fn request_model(
        &self,
        user_id: i32,
        name: String,
        vendor: Option<String>,
    ) -> Result<ModelRequestResultDto, Error> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(PriceError::InvalidField("name".to_string()).into());
        }

        if let Some(model) = StandardModelRepository::new(self.db)
            .find_by_name(&name)
            .await?
        {
            return Ok(ModelRequestResultDto {
                message: "Model already exists".to_string(),
                model_id: Some(model.id),
                request_id: None,
            });
        }

        let request_repo = ModelRequestRepository::new(self.db);

        if let Some(pending) = request_repo.find_pending_by_name(&name).await? {
            return Ok(ModelRequestResultDto {
                message: "Model already requested".to_string(),
                model_id: None,
                request_id: Some(pending.id),
            });
        }

        let request = request_repo
            .create(name, non_empty(vendor), user_id)
            .await?;

        Ok(ModelRequestResultDto {
            message: "Model request submitted".to_string(),
            model_id: None,
            request_id: Some(request.id),
        })
    }
}

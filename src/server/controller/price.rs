use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        price::{
            BatchSubmitDto, BatchSubmittedDto, CompareQuery, ComparisonRowDto, HighlightDto,
            HighlightsQuery, ModelRequestFormDto, ModelRequestResultDto, ModelRequestedDto,
            SubmitPriceDto, SubmittedPriceDto, UpdatePriceDto, UploadedFile,
        },
        standard_model::StandardModelDto,
    },
    server::{
        controller::util::get_user::get_active_user,
        error::{price::PriceError, Error},
        model::app::AppState,
        service::{
            comparison::ComparisonService,
            email::setting_flag,
            price::{PriceService, SubmissionOutcome},
            standard_model::StandardModelService,
        },
    },
};

pub static PRICE_TAG: &str = "prices";

/// Request body limit for price submissions, which may carry an image proof
pub const MAX_SUBMISSION_BYTES: usize = 20 * 1024 * 1024;

fn target_currency(currency: Option<String>) -> String {
    currency
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "USD".to_string())
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> Result<Option<T>, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| PriceError::InvalidField(name.to_string()).into())
}

/// Collects the multipart fields of a price submission, unknown fields are ignored
async fn read_submission(mut multipart: Multipart) -> Result<SubmitPriceDto, Error> {
    let mut submission = SubmitPriceDto::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "file" {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await?;

            if !bytes.is_empty() {
                submission.file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await?;
        let text = Some(value.clone()).filter(|v| !v.trim().is_empty());

        match name.as_str() {
            "provider_id" => submission.provider_id = parse_field(&name, &value)?,
            "provider_name" => submission.provider_name = text,
            "provider_website" => submission.provider_website = text,
            "openai_base_url" => submission.openai_base_url = text,
            "gemini_base_url" => submission.gemini_base_url = text,
            "claude_base_url" => submission.claude_base_url = text,
            "submit_provider_for_review" => {
                submission.submit_provider_for_review = setting_flag(Some(&value), false)
            }
            "provider_proof_type" => submission.provider_proof_type = text,
            "provider_proof_content" => submission.provider_proof_content = text,
            "standard_model_id" => submission.standard_model_id = parse_field(&name, &value)?,
            "new_model_name" => submission.new_model_name = text,
            "new_model_vendor" => submission.new_model_vendor = text,
            "provider_model_name" => submission.provider_model_name = text,
            "price_in" => submission.price_in = parse_field(&name, &value)?,
            "price_out" => submission.price_out = parse_field(&name, &value)?,
            "currency" => submission.currency = text,
            "proof_type" => submission.proof_type = text,
            "proof_content" => submission.proof_content = text,
            _ => tracing::debug!("Ignoring unknown submission field {}", name),
        }
    }

    Ok(submission)
}

/// Submit a price for moderation
///
/// Select a provider by `provider_id` or name a new one, and a model by `standard_model_id`
/// or `new_model_name`. An unknown model name files a model request instead of storing the
/// price.
#[utoipa::path(
    post,
    path = "/api/prices/submit",
    tag = PRICE_TAG,
    request_body(content = SubmitPriceDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Price stored as pending", body = SubmittedPriceDto),
        (status = 202, description = "Model requested, price not stored", body = ModelRequestedDto),
        (status = 400, description = "Missing provider, model or prices", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Private provider of another user", body = ErrorDto),
        (status = 404, description = "Provider or model not found", body = ErrorDto),
        (status = 413, description = "Submission larger than 20 MiB"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_price(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let submission = read_submission(multipart).await?;
    let outcome = PriceService::new(&state.db)
        .submit(user.id, submission, &state.static_dir)
        .await?;

    Ok(match outcome {
        SubmissionOutcome::Submitted(price) => (StatusCode::OK, Json(price)).into_response(),
        SubmissionOutcome::ModelRequested(request) => {
            (StatusCode::ACCEPTED, Json(request)).into_response()
        }
    })
}

/// Submit several prices for one provider at once
#[utoipa::path(
    post,
    path = "/api/prices/submit-batch",
    tag = PRICE_TAG,
    request_body = BatchSubmitDto,
    responses(
        (status = 200, description = "All prices stored as pending", body = BatchSubmittedDto),
        (status = 400, description = "Missing provider or model", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Provider or model not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_batch(
    State(state): State<AppState>,
    session: Session,
    Json(batch): Json<BatchSubmitDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let submitted = PriceService::new(&state.db)
        .submit_batch(user.id, batch)
        .await?;

    Ok((StatusCode::OK, Json(submitted)))
}

/// Compare the active prices of a model across providers, cheapest first
#[utoipa::path(
    get,
    path = "/api/prices/compare/{standard_model_id}",
    tag = PRICE_TAG,
    params(
        ("standard_model_id" = i32, Path, description = "Standard model ID"),
        CompareQuery
    ),
    responses(
        (status = 200, description = "Prices converted to the target currency", body = Vec<ComparisonRowDto>),
        (status = 400, description = "Target currency not supported", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn compare(
    State(state): State<AppState>,
    Path(standard_model_id): Path<i32>,
    Query(query): Query<CompareQuery>,
) -> Result<impl IntoResponse, Error> {
    let rows = ComparisonService::new(&state.db)
        .compare(standard_model_id, &target_currency(query.target_currency))
        .await?;

    Ok((StatusCode::OK, Json(rows)))
}

/// Headline models with official, average and lowest provider prices
#[utoipa::path(
    get,
    path = "/api/prices/highlights",
    tag = PRICE_TAG,
    params(HighlightsQuery),
    responses(
        (status = 200, description = "Highlighted models", body = Vec<HighlightDto>),
        (status = 400, description = "Target currency not supported or limit outside 1 to 50", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn highlights(
    State(state): State<AppState>,
    Query(query): Query<HighlightsQuery>,
) -> Result<impl IntoResponse, Error> {
    let highlights = ComparisonService::new(&state.db)
        .highlights(query.limit, &target_currency(query.target_currency))
        .await?;

    Ok((StatusCode::OK, Json(highlights)))
}

/// List all standard models
#[utoipa::path(
    get,
    path = "/api/prices/models",
    tag = PRICE_TAG,
    responses(
        (status = 200, description = "Standard models", body = Vec<StandardModelDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_models(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let models = StandardModelService::new(&state.db).list().await?;

    Ok((StatusCode::OK, Json(models)))
}

/// Ask moderators to add a standard model
#[utoipa::path(
    post,
    path = "/api/prices/models/request",
    tag = PRICE_TAG,
    request_body(content = ModelRequestFormDto, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Existing model, pending request or new request", body = ModelRequestResultDto),
        (status = 400, description = "Missing name", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn request_model(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ModelRequestFormDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let result = PriceService::new(&state.db)
        .request_model(user.id, form.name, form.vendor)
        .await?;

    Ok((StatusCode::OK, Json(result)))
}

/// Change the amounts or currency of a price, allowed for its submitter and admins
#[utoipa::path(
    put,
    path = "/api/prices/{price_id}",
    tag = PRICE_TAG,
    params(("price_id" = i32, Path, description = "Price ID")),
    request_body = UpdatePriceDto,
    responses(
        (status = 200, description = "Price updated", body = MessageDto),
        (status = 400, description = "Negative price", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not the submitter", body = ErrorDto),
        (status = 404, description = "Price not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_price(
    State(state): State<AppState>,
    session: Session,
    Path(price_id): Path<i32>,
    Json(changes): Json<UpdatePriceDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    PriceService::new(&state.db)
        .update(&user, price_id, changes)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Price updated"))))
}

#[cfg(test)]
mod tests {
    use crate::server::controller::price::{parse_field, target_currency};

    /// Expect the target currency to default to USD and be upper-cased
    #[test]
    fn normalizes_target_currency() {
        assert_eq!(target_currency(None), "USD");
        assert_eq!(target_currency(Some(" cny ".to_string())), "CNY");
        assert_eq!(target_currency(Some(String::new())), "USD");
    }

    /// Expect blank fields to be absent and malformed ones rejected
    #[test]
    fn parses_numeric_fields() {
        assert_eq!(parse_field::<f64>("price_in", "1.5").unwrap(), Some(1.5));
        assert_eq!(parse_field::<i32>("provider_id", " ").unwrap(), None);
        assert!(parse_field::<f64>("price_in", "cheap").is_err());
    }
}

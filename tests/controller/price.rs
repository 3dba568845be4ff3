use entity::sea_orm_active_enums::PriceStatus;
use pricehub::{
    model::price::{
        BatchSubmitDto, BatchSubmittedDto, CompareQuery, ComparisonRowDto, PriceEntryDto,
        UpdatePriceDto,
    },
    server::{
        controller::price::{compare, submit_batch, update_price},
        error::price::PriceError,
    },
};
use sea_orm::{EntityTrait, PaginatorTrait};

use super::*;

fn entry(standard_model_id: i32, price_in: f64, price_out: f64) -> PriceEntryDto {
    PriceEntryDto {
        standard_model_id: Some(standard_model_id),
        new_model_name: None,
        new_model_vendor: None,
        provider_model_name: None,
        price_in,
        price_out,
        cache_hit_input_price: None,
        cache_hit_output_price: None,
        currency: "USD".to_string(),
        proof_type: Some("text".to_string()),
        proof_content: Some("pricing page".to_string()),
    }
}

fn batch(provider_id: i32, prices: Vec<PriceEntryDto>) -> BatchSubmitDto {
    BatchSubmitDto {
        provider_id: Some(provider_id),
        provider_name: None,
        provider_website: None,
        openai_base_url: None,
        gemini_base_url: None,
        claude_base_url: None,
        submit_provider_for_review: false,
        provider_proof_type: None,
        provider_proof_content: None,
        prices,
    }
}

#[tokio::test]
/// Expect prices in other currencies to be converted and sorted cheapest first
async fn compares_across_currencies() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_all_tables()
        .with_currency_rate("CNY", 7.0)
        .build()
        .await?;
    let state: AppState = test.to_app_state();

    let model = test.standard_model().insert_model("deepseek-chat").await?;
    let domestic = test.provider().insert_approved("Domestic").await?;
    let overseas = test.provider().insert_approved("Overseas").await?;

    // 14 CNY is 2 USD, more expensive than the 1 USD offer
    test.price()
        .insert_price(domestic.id, model.id, 14.0, 28.0, "CNY", PriceStatus::Active)
        .await?;
    test.price()
        .insert_price(overseas.id, model.id, 1.0, 2.0, "USD", PriceStatus::Active)
        .await?;

    let resp = compare(
        State(state),
        Path(model.id),
        Query(CompareQuery {
            target_currency: Some("usd".to_string()),
        }),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let rows: Vec<ComparisonRowDto> = body_json(resp).await;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].provider_id, overseas.id);
    assert_eq!(rows[1].provider_id, domestic.id);
    assert_eq!(rows[1].original_currency, "CNY");
    assert!((rows[1].price_in.unwrap() - 2.0).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
/// Expect 400 for a target currency without a stored rate
async fn rejects_unknown_target_currency() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();
    let model = test.standard_model().insert_model("gpt-4o").await?;

    let result = compare(
        State(state),
        Path(model.id),
        Query(CompareQuery {
            target_currency: Some("XYZ".to_string()),
        }),
    )
    .await;

    match result {
        Err(err) => {
            assert!(matches!(
                err,
                Error::PriceError(PriceError::UnsupportedCurrency)
            ));
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
        Ok(_) => panic!("Expected unsupported currency error"),
    }

    Ok(())
}

#[tokio::test]
/// Expect a batch to store every entry as pending
async fn submits_batch() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let user = test.user().insert_user("bob@example.com").await?;
    let provider = test.provider().insert_approved("Relay").await?;
    let first = test.standard_model().insert_model("gpt-4o").await?;
    let second = test.standard_model().insert_model("gpt-4o-mini").await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let resp = submit_batch(
        State(state),
        test.session.clone(),
        Json(batch(
            provider.id,
            vec![entry(first.id, 2.5, 10.0), entry(second.id, 0.15, 0.6)],
        )),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let submitted: BatchSubmittedDto = body_json(resp).await;
    assert_eq!(submitted.provider_id, provider.id);
    assert_eq!(submitted.created_price_ids.len(), 2);

    let prices = entity::prelude::ModelPrice::find().all(&test.db).await.unwrap();
    assert!(prices.iter().all(|p| p.status == PriceStatus::Pending));
    assert!(prices.iter().all(|p| p.submitter_id == Some(user.id)));

    Ok(())
}

#[tokio::test]
/// Expect a batch with one unknown model to store nothing
async fn batch_is_all_or_nothing() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let user = test.user().insert_user("bob@example.com").await?;
    let provider = test.provider().insert_approved("Relay").await?;
    let model = test.standard_model().insert_model("gpt-4o").await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let result = submit_batch(
        State(state),
        test.session.clone(),
        Json(batch(
            provider.id,
            vec![entry(model.id, 2.5, 10.0), entry(model.id + 100, 1.0, 1.0)],
        )),
    )
    .await;

    assert!(matches!(
        result,
        Err(Error::PriceError(PriceError::ModelNotFound))
    ));

    let stored = entity::prelude::ModelPrice::find()
        .count(&test.db)
        .await
        .unwrap();
    assert_eq!(stored, 0);

    Ok(())
}

#[tokio::test]
/// Expect only the submitter or an admin to change a price
async fn update_requires_submitter() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let submitter = test.user().insert_user("bob@example.com").await?;
    let other = test.user().insert_user("eve@example.com").await?;
    let provider = test.provider().insert_approved("Relay").await?;
    let model = test.standard_model().insert_model("gpt-4o").await?;
    let price = test
        .price()
        .insert_submitted(provider.id, model.id, submitter.id)
        .await?;

    let changes = UpdatePriceDto {
        input_price: Some(3.0),
        ..Default::default()
    };

    SessionUserId::insert(&test.session, other.id).await.unwrap();
    let result = update_price(
        State(state.clone()),
        test.session.clone(),
        Path(price.id),
        Json(changes.clone()),
    )
    .await;
    assert!(matches!(
        result,
        Err(Error::PriceError(PriceError::NotPriceOwner))
    ));

    SessionUserId::insert(&test.session, submitter.id).await.unwrap();
    let resp = update_price(State(state), test.session.clone(), Path(price.id), Json(changes))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let updated = entity::prelude::ModelPrice::find_by_id(price.id)
        .one(&test.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.input_price, 3.0);

    Ok(())
}

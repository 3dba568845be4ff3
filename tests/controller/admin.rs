use std::collections::HashMap;

use entity::sea_orm_active_enums::PriceStatus;
use pricehub::{
    model::price::{CompareQuery, ComparisonRowDto},
    server::{
        controller::{
            admin::{approve_price, get_settings, reject_price, update_settings},
            price::compare,
        },
        error::auth::AuthError,
    },
};

use super::*;

#[tokio::test]
/// Expect an approved price to appear in the comparison
async fn approved_price_becomes_visible() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let admin = test.user().insert_admin("admin@example.com").await?;
    let submitter = test.user().insert_user("bob@example.com").await?;
    let provider = test.provider().insert_approved("Relay").await?;
    let model = test.standard_model().insert_model("gpt-4o").await?;
    let price = test
        .price()
        .insert_submitted(provider.id, model.id, submitter.id)
        .await?;

    SessionUserId::insert(&test.session, admin.id).await.unwrap();

    let before = compare(
        State(state.clone()),
        Path(model.id),
        Query(CompareQuery {
            target_currency: None,
        }),
    )
    .await
    .unwrap()
    .into_response();
    let before: Vec<ComparisonRowDto> = body_json(before).await;
    assert!(before.is_empty());

    let resp = approve_price(State(state.clone()), test.session.clone(), Path(price.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let after = compare(
        State(state),
        Path(model.id),
        Query(CompareQuery {
            target_currency: None,
        }),
    )
    .await
    .unwrap()
    .into_response();
    let after: Vec<ComparisonRowDto> = body_json(after).await;

    assert_eq!(after.len(), 1);
    assert_eq!(after[0].price_id, price.id);
    assert!(after[0].verified_at.is_some());

    Ok(())
}

#[tokio::test]
/// Expect plain users to be refused moderation
async fn moderation_requires_admin() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let user = test.user().insert_user("bob@example.com").await?;
    let provider = test.provider().insert_approved("Relay").await?;
    let model = test.standard_model().insert_model("gpt-4o").await?;
    let price = test
        .price()
        .insert_price(provider.id, model.id, 1.0, 2.0, "USD", PriceStatus::Pending)
        .await?;

    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let result = reject_price(State(state), test.session.clone(), Path(price.id)).await;

    assert!(matches!(result, Err(Error::AuthError(AuthError::NotAdmin))));

    Ok(())
}

#[tokio::test]
/// Expect settings changes to need a super admin while admins may still read them
async fn settings_update_requires_super_admin() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_all_tables()
        .with_setting("site_name", "Price Hub")
        .build()
        .await?;
    let state: AppState = test.to_app_state();

    let admin = test.user().insert_admin("admin@example.com").await?;
    SessionUserId::insert(&test.session, admin.id).await.unwrap();

    let read = get_settings(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    let settings: HashMap<String, String> = body_json(read).await;
    assert_eq!(settings.get("site_name").map(String::as_str), Some("Price Hub"));

    let mut changes = HashMap::new();
    changes.insert("site_name".to_string(), serde_json::json!("Other"));
    let result = update_settings(State(state), test.session.clone(), Json(changes)).await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::NotSuperAdmin))
    ));

    Ok(())
}

#[tokio::test]
/// Expect non-string JSON values to be stored as their text form
async fn super_admin_updates_settings() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let root = test.user().insert_super_admin("root@example.com").await?;
    SessionUserId::insert(&test.session, root.id).await.unwrap();

    let mut changes = HashMap::new();
    changes.insert("site_name".to_string(), serde_json::json!("LLM Hub"));
    changes.insert(
        "exchange_rate_interval_minutes".to_string(),
        serde_json::json!(30),
    );

    let resp = update_settings(State(state.clone()), test.session.clone(), Json(changes))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let read = get_settings(State(state), test.session.clone())
        .await
        .unwrap()
        .into_response();
    let settings: HashMap<String, String> = body_json(read).await;

    assert_eq!(settings.get("site_name").map(String::as_str), Some("LLM Hub"));
    assert_eq!(
        settings
            .get("exchange_rate_interval_minutes")
            .map(String::as_str),
        Some("30")
    );

    Ok(())
}

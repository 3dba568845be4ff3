use entity::sea_orm_active_enums::ProviderStatus;
use pricehub::{
    model::review::{CreateReviewDto, ReviewCreatedDto, ReviewDto},
    server::{
        controller::review::{create_review, list_reviews},
        error::provider::ProviderError,
    },
};

use super::*;

fn rating(rating: i32) -> Json<CreateReviewDto> {
    Json(CreateReviewDto {
        rating,
        comment: Some("  stable  ".to_string()),
    })
}

#[tokio::test]
/// Expect the provider score to follow the mean of its reviews
async fn recomputes_provider_score() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let user = test.user().insert_user("bob@example.com").await?;
    let provider = test.provider().insert_approved("Relay").await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    create_review(
        State(state.clone()),
        test.session.clone(),
        Path(provider.id),
        rating(5),
    )
    .await
    .unwrap();
    let resp = create_review(
        State(state.clone()),
        test.session.clone(),
        Path(provider.id),
        rating(2),
    )
    .await
    .unwrap()
    .into_response();

    let created: ReviewCreatedDto = body_json(resp).await;
    assert!((created.avg_score - 3.5).abs() < 1e-9);

    let resp = list_reviews(State(state), Path(provider.id))
        .await
        .unwrap()
        .into_response();
    let reviews: Vec<ReviewDto> = body_json(resp).await;

    assert_eq!(reviews.len(), 2);
    assert!(reviews
        .iter()
        .all(|review| review.comment.as_deref() == Some("stable")));

    Ok(())
}

#[tokio::test]
/// Expect ratings outside 1 to 5 to be rejected
async fn rejects_out_of_range_rating() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let user = test.user().insert_user("bob@example.com").await?;
    let provider = test.provider().insert_approved("Relay").await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let result = create_review(State(state), test.session.clone(), Path(provider.id), rating(6)).await;

    assert!(matches!(
        result,
        Err(Error::ProviderError(ProviderError::InvalidRating))
    ));

    Ok(())
}

#[tokio::test]
/// Expect reviews of another user's private provider to be refused
async fn rejects_private_provider() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let owner = test.user().insert_user("owner@example.com").await?;
    let user = test.user().insert_user("bob@example.com").await?;
    let provider = test
        .provider()
        .insert_provider("Hidden", ProviderStatus::Private, Some(owner.id))
        .await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let result = create_review(State(state), test.session.clone(), Path(provider.id), rating(4)).await;

    assert!(matches!(
        result,
        Err(Error::ProviderError(ProviderError::PrivateProvider))
    ));

    Ok(())
}

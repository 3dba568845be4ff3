use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::review::{CreateReviewDto, ReviewCreatedDto, ReviewDto},
    server::{
        data::{provider::ProviderRepository, review::ReviewRepository},
        error::{provider::ProviderError, Error},
        service::workspace::is_visible_to,
    },
};

fn mean_rating(reviews: &[entity::review::Model]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }

    let total: i64 = reviews.iter().map(|review| i64::from(review.rating)).sum();

    total as f64 / reviews.len() as f64
}

pub struct ReviewService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReviewService<'a> {
    /// Creates a new instance of [`ReviewService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, provider_id: i32) -> Result<Vec<ReviewDto>, Error> {
        if ProviderRepository::new(self.db)
            .get(provider_id)
            .await?
            .is_none()
        {
            return Err(ProviderError::NotFound.into());
        }

        Ok(ReviewRepository::new(self.db)
            .list_by_provider(provider_id)
            .await?
            .into_iter()
            .map(ReviewDto::from)
            .collect())
    }

    /// Stores a rating and recomputes the provider's `avg_score` in the same transaction
    pub async fn create(
        &self,
        user_id: i32,
        provider_id: i32,
        review: CreateReviewDto,
    ) -> Result<ReviewCreatedDto, Error> {
        if !(1..=5).contains(&review.rating) {
            return Err(ProviderError::InvalidRating.into());
        }

        let txn = self.db.begin().await?;

        let provider_repo = ProviderRepository::new(&txn);
        let Some(provider) = provider_repo.get(provider_id).await? else {
            return Err(ProviderError::NotFound.into());
        };

        if !is_visible_to(&provider, user_id) {
            return Err(ProviderError::PrivateProvider.into());
        }

        let comment = review
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let review_repo = ReviewRepository::new(&txn);
        let created = review_repo
            .create(provider_id, user_id, review.rating, comment)
            .await?;

        let avg_score = mean_rating(&review_repo.list_by_provider(provider_id).await?);
        provider_repo.update_avg_score(provider_id, avg_score).await?;

        txn.commit().await?;

        tracing::debug!(
            "User ID {} rated provider ID {} with {}, score now {:.2}",
            user_id,
            provider_id,
            created.rating,
            avg_score
        );

        Ok(ReviewCreatedDto {
            message: "Review submitted".to_string(),
            id: created.id,
            avg_score,
        })
    }
}

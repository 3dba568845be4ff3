use std::time::Duration;

use crate::server::error::{retry::ErrorRetryStrategy, Error};

/// Context for service methods providing retry & caching logic
pub struct RetryContext<T> {
    /// cache to be used between retries to prevent unnecessary additional fetches
    cache: T,
    /// Max attempts before failure
    max_attempts: u32,
    /// Initial backoff between attempts
    initial_backoff_secs: u64,
}

impl<T> RetryContext<T>
where
    T: Clone + Default,
{
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 1;

    pub fn new() -> Self {
        Self {
            cache: T::default(),
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_backoff_secs: Self::DEFAULT_INITIAL_BACKOFF_SECS,
        }
    }

    /// Execute a method with automatic retry logic
    ///
    /// The operation receives the retry cache, filled by earlier attempts. It should skip
    /// any fetch whose result is already cached so that a failed store does not refetch.
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging (e.g., "exchange rate refresh")
    /// - `operation`: Async function that performs fetch and store
    pub async fn execute_with_retry<R, F>(
        &mut self,
        description: &str,
        operation: F,
    ) -> Result<R, Error>
    where
        F: for<'a> Fn(
            &'a mut T,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<R, Error>> + Send + 'a>,
        >,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            match operation(&mut self.cache).await {
                Ok(result) => {
                    tracing::debug!("Successfully processed {}", description);
                    return Ok(result);
                }
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        tracing::error!("Permanent error for {}: {:?}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= self.max_attempts {
                            tracing::error!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                self.max_attempts,
                                description,
                                e
                            );
                            return Err(e);
                        }

                        let backoff_secs = self.initial_backoff_secs * 2_u64.pow(attempt_count - 1);
                        let backoff = Duration::from_secs(backoff_secs);

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description,
                            attempt_count,
                            self.max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}

impl<T> Default for RetryContext<T>
where
    T: Clone + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use sea_orm::{DbErr, RuntimeErr};

    use crate::server::{
        error::{price::PriceError, Error},
        service::retry::RetryContext,
    };

    /// Expect the cached value from the first attempt to be visible to the retry
    #[tokio::test(start_paused = true)]
    async fn reuses_cache_between_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let mut ctx: RetryContext<Option<u32>> = RetryContext::new();

        let result = ctx
            .execute_with_retry("cache test", |cache| {
                let attempts = attempts.clone();
                Box::pin(async move {
                    let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                    if cache.is_none() {
                        *cache = Some(42);
                    }
                    if attempt == 0 {
                        return Err(Error::DbErr(DbErr::Conn(RuntimeErr::Internal(
                            "down".to_string(),
                        ))));
                    }
                    Ok(cache.unwrap_or_default())
                })
            })
            .await;

        assert!(matches!(result, Ok(42)));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    /// Expect no retry for permanent errors
    #[tokio::test(start_paused = true)]
    async fn stops_on_permanent_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let mut ctx: RetryContext<()> = RetryContext::new();

        let result: Result<(), Error> = ctx
            .execute_with_retry("permanent", |_| {
                let attempts = attempts.clone();
                Box::pin(async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(Error::PriceError(PriceError::PriceNotFound))
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    /// Expect failure after the maximum number of transient errors
    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let mut ctx: RetryContext<()> = RetryContext::new();

        let result: Result<(), Error> = ctx
            .execute_with_retry("transient", |_| {
                let attempts = attempts.clone();
                Box::pin(async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(Error::DbErr(DbErr::Conn(RuntimeErr::Internal(
                        "down".to_string(),
                    ))))
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}

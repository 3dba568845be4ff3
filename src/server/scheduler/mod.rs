//! Scheduler for periodic maintenance jobs.
//!
//! Three jobs keep derived data current: exchange rates are refreshed on a configurable
//! interval, stale prices expire daily at midnight UTC and provider websites are probed every
//! 30 minutes. Jobs catch and log their own errors so one failed run never stops the scheduler.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::server::{error::Error, service::exchange_rate::ExchangeRateService};

pub mod config;
pub mod job;

use self::{
    config::{expiry as expiry_config, uptime as uptime_config},
    job::{check_provider_uptime, expire_prices, refresh_exchange_rates},
};

type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Job scheduler for background maintenance tasks.
///
/// Cheap to clone; clones share the running scheduler so the settings controller can
/// reschedule the exchange rate job.
#[derive(Clone)]
pub struct Scheduler {
    db: DatabaseConnection,
    http_client: reqwest::Client,
    sched: JobScheduler,
    /// Interval job of the exchange rate refresh, replaced when the interval setting changes
    exchange_rate_job: Arc<Mutex<Option<Uuid>>>,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(db: DatabaseConnection, http_client: reqwest::Client) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;

        Ok(Self {
            db,
            http_client,
            sched,
            exchange_rate_job: Arc::new(Mutex::new(None)),
        })
    }

    /// Registers all jobs and starts the scheduler.
    ///
    /// The exchange rate interval is read from the `exchange_rate_interval_minutes` setting.
    pub async fn start(&self) -> Result<(), Error> {
        self.schedule_job(
            expiry_config::CRON_EXPRESSION,
            "price expiry",
            expire_prices,
        )
        .await?;

        self.schedule_job(
            uptime_config::CRON_EXPRESSION,
            "provider uptime",
            check_provider_uptime,
        )
        .await?;

        self.reschedule_exchange_rates().await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Replaces the exchange rate job with one using the currently stored interval
    pub async fn reschedule_exchange_rates(&self) -> Result<(), Error> {
        let interval_minutes = ExchangeRateService::new(&self.db, &self.http_client)
            .interval_minutes()
            .await?;

        let mut job_id = self.exchange_rate_job.lock().await;

        if let Some(id) = job_id.take() {
            self.sched.remove(&id).await?;
        }

        let id = self
            .sched
            .add(Job::new_repeated_async(
                Duration::from_secs(interval_minutes * 60),
                self.runner("exchange rate", refresh_exchange_rates),
            )?)
            .await?;
        *job_id = Some(id);

        tracing::info!(
            "Exchange rate refresh scheduled every {} minutes",
            interval_minutes
        );

        Ok(())
    }

    /// ID of the currently scheduled exchange rate job
    pub async fn exchange_rate_job_id(&self) -> Option<Uuid> {
        *self.exchange_rate_job.lock().await
    }

    /// Stops all jobs, letting running ones finish
    pub async fn shutdown(&self) -> Result<(), Error> {
        let mut sched = self.sched.clone();
        sched.shutdown().await?;

        Ok(())
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// # Arguments
    /// - `cron` - Cron expression with seconds, evaluated in UTC (e.g. "0 0 * * * *" for hourly)
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async job returning the number of rows it touched
    pub async fn schedule_job<F, Fut>(
        &self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<Uuid, Error>
    where
        F: Fn(DatabaseConnection, reqwest::Client) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let id = self
            .sched
            .add(Job::new_async(cron, self.runner(name, function))?)
            .await?;

        Ok(id)
    }

    /// Wraps a job function so each run gets fresh handles and logs its outcome
    fn runner<F, Fut>(
        &self,
        name: &str,
        function: F,
    ) -> impl FnMut(Uuid, JobScheduler) -> JobFuture + Send + Sync + 'static
    where
        F: Fn(DatabaseConnection, reqwest::Client) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let http_client = self.http_client.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        move |_, _| {
            let db = db.clone();
            let http_client = http_client.clone();
            let name = name.clone();
            let function = Arc::clone(&function);

            let run: JobFuture = Box::pin(async move {
                match function(db, http_client).await {
                    Ok(count) => tracing::info!("Completed {} job, {} row(s) updated", name, count),
                    Err(e) => tracing::error!("Error running {} job: {}", name, e),
                }
            });

            run
        }
    }
}

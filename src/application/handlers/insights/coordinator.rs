//! InsightCoordinator - drives insight generation for completed dimensions.
//!
//! Each dimension job:
//! 1. Wins the store's `Generating` guard (losers treat the insight as in flight)
//! 2. Waits for a worker permit, unless shutdown cancels it first
//! 3. Builds a prompt from the dimension's facet averages
//! 4. Calls the generator, retrying transient failures with backoff
//! 5. Stores the result as `Done` or `Failed` and publishes the outcome
//!
//! The holistic insight runs the same generate/store/publish path inline.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::adapters::broker::InsightBroker;
use crate::domain::answers::Insight;
use crate::domain::foundation::UserId;
use crate::domain::insights::{extract_json, InsightError, InsightEvent, Prompt, HOLISTIC};
use crate::domain::scoring::{dimension_ratings, score_dimensions, score_facets};
use crate::domain::taxonomy::Catalog;
use crate::ports::{AnswerStore, GenerationError, TextGenerator};

/// Tuning for insight generation.
#[derive(Debug, Clone)]
pub struct InsightCoordinatorConfig {
    /// Jobs allowed to call the generator at once.
    pub max_concurrent_jobs: usize,
    /// Attempts per insight, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub backoff_base: Duration,
    /// How long `shutdown` waits for in-flight jobs.
    pub shutdown_grace: Duration,
    /// Standing instructions for dimension insights.
    pub dimension_instructions: String,
    /// Standing instructions for the holistic insight.
    pub holistic_instructions: String,
}

impl Default for InsightCoordinatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 4,
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
            shutdown_grace: Duration::from_secs(10),
            dimension_instructions: String::new(),
            holistic_instructions: String::new(),
        }
    }
}

/// Shared state used by spawned jobs.
struct Worker {
    catalog: Arc<Catalog>,
    store: Arc<dyn AnswerStore>,
    generator: Arc<dyn TextGenerator>,
    broker: InsightBroker,
    config: InsightCoordinatorConfig,
}

/// Coordinates insight generation jobs and their lifecycle.
pub struct InsightCoordinator {
    worker: Arc<Worker>,
    tracker: TaskTracker,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
}

impl InsightCoordinator {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn AnswerStore>,
        generator: Arc<dyn TextGenerator>,
        broker: InsightBroker,
        config: InsightCoordinatorConfig,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1)));
        Self {
            worker: Arc::new(Worker {
                catalog,
                store,
                generator,
                broker,
                config,
            }),
            tracker: TaskTracker::new(),
            permits,
            shutdown: CancellationToken::new(),
        }
    }

    /// Starts generation for a completed dimension.
    ///
    /// Returns `Ok(false)` when the insight is already generating or done,
    /// in which case the caller should simply wait for the broker event.
    pub async fn request_dimension(&self, user_id: &UserId, dimension: &str) -> Result<bool, InsightError> {
        if self.shutdown.is_cancelled() {
            return Err(InsightError::ShuttingDown);
        }
        if self.worker.catalog.dimension(dimension).is_none() {
            return Err(InsightError::UnknownDimension(dimension.to_string()));
        }

        let won = self
            .worker
            .store
            .try_begin_insight(user_id, dimension)
            .await
            .map_err(|e| InsightError::Store(e.to_string()))?;
        if !won {
            debug!(user_id = %user_id, dimension = %dimension, "Insight already in flight");
            return Ok(false);
        }

        debug!(user_id = %user_id, dimension = %dimension, "Insight job queued");

        let worker = self.worker.clone();
        let permits = self.permits.clone();
        let shutdown = self.shutdown.clone();
        let user_id = user_id.clone();
        let dimension = dimension.to_string();

        self.tracker.spawn(async move {
            // Only jobs still waiting for a permit are cancelled by shutdown.
            let permit = match permits.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => None,
                    permit = permits.acquire_owned() => permit.ok(),
                },
            };
            let Some(_permit) = permit else {
                warn!(user_id = %user_id, dimension = %dimension, "Queued insight job cancelled");
                worker
                    .finish_failed(&user_id, &dimension, &InsightError::ShuttingDown)
                    .await;
                return;
            };
            worker.run_dimension(&user_id, &dimension).await;
        });
        Ok(true)
    }

    /// Generates, stores and publishes the holistic insight inline.
    pub async fn generate_holistic(&self, user_id: &UserId) -> Result<Value, InsightError> {
        if self.shutdown.is_cancelled() {
            return Err(InsightError::ShuttingDown);
        }
        self.worker.run_holistic(user_id).await
    }

    /// Jobs currently queued or running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stops admission, cancels queued jobs and waits for running ones.
    ///
    /// Running jobs are not interrupted; waiting is bounded by the
    /// configured grace period.
    pub async fn shutdown(&self) {
        info!(in_flight = self.in_flight(), "Stopping insight coordinator");
        self.shutdown.cancel();
        self.tracker.close();

        let grace = self.worker.config.shutdown_grace;
        if timeout(grace, self.tracker.wait()).await.is_err() {
            warn!(
                remaining = self.tracker.len(),
                grace_secs = grace.as_secs(),
                "Insight jobs still running after shutdown grace period"
            );
        } else {
            info!("Insight coordinator stopped");
        }
    }
}

impl Worker {
    async fn run_dimension(&self, user_id: &UserId, dimension: &str) {
        let outcome = match self.generate_dimension(user_id, dimension).await {
            Ok(payload) => self.finish_done(user_id, dimension, payload).await,
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            self.finish_failed(user_id, dimension, &err).await;
        }
    }

    async fn generate_dimension(&self, user_id: &UserId, dimension: &str) -> Result<Value, InsightError> {
        let answers = self
            .store
            .get_user(user_id)
            .await
            .map_err(|e| InsightError::Store(e.to_string()))?
            .ok_or_else(|| InsightError::UserNotFound(user_id.clone()))?;
        let dim = self
            .catalog
            .dimension(dimension)
            .ok_or_else(|| InsightError::UnknownDimension(dimension.to_string()))?;

        let prompt = Prompt::dimension(
            self.config.dimension_instructions.clone(),
            dimension,
            &dimension_ratings(dim, &answers),
        );
        self.generate_with_retry(user_id, dimension, &prompt).await
    }

    async fn run_holistic(&self, user_id: &UserId) -> Result<Value, InsightError> {
        let answers = self
            .store
            .get_user(user_id)
            .await
            .map_err(|e| InsightError::Store(e.to_string()))?
            .ok_or_else(|| InsightError::UserNotFound(user_id.clone()))?;

        let questions = self.catalog.questions().values();
        let dimensions = score_dimensions(questions.clone(), &answers, self.catalog.ranks());
        let facets = score_facets(questions, &answers);
        let prompt = Prompt::holistic(self.config.holistic_instructions.clone(), &dimensions, &facets);

        let outcome = match self.generate_with_retry(user_id, HOLISTIC, &prompt).await {
            Ok(payload) => self.finish_done(user_id, HOLISTIC, payload).await,
            Err(err) => Err(err),
        };
        if let Err(err) = &outcome {
            self.finish_failed(user_id, HOLISTIC, err).await;
        }
        outcome
    }

    /// Calls the generator until it yields JSON or attempts run out.
    async fn generate_with_retry(&self, user_id: &UserId, name: &str, prompt: &Prompt) -> Result<Value, InsightError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = match self.generator.generate(prompt).await {
                Ok(text) => extract_json(&text).map_err(|_| GenerationError::NoJsonFound),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.config.backoff_base * (1u32 << (attempt - 1).min(16));
                    warn!(
                        user_id = %user_id,
                        insight = %name,
                        attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "Insight generation attempt failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(GenerationError::NoJsonFound) => return Err(InsightError::NoJsonFound),
                Err(err) => return Err(InsightError::Generation(err.to_string())),
            }
        }
    }

    /// Stores a generated payload and announces it.
    ///
    /// A failed write is returned so the caller can mark the insight
    /// `Failed`; it must not stay `Generating`.
    async fn finish_done(&self, user_id: &UserId, name: &str, payload: Value) -> Result<Value, InsightError> {
        self.store
            .upsert_insight(user_id, name, Insight::done(payload.clone()))
            .await
            .map_err(|e| InsightError::Store(e.to_string()))?;
        info!(user_id = %user_id, insight = %name, "Insight generated");
        self.publish(InsightEvent::ready(user_id.clone(), name, payload.clone()))
            .await;
        Ok(payload)
    }

    async fn finish_failed(&self, user_id: &UserId, name: &str, err: &InsightError) {
        error!(user_id = %user_id, insight = %name, error = %err, "Insight generation failed");
        if let Err(e) = self
            .store
            .upsert_insight(user_id, name, Insight::failed(err.to_string()))
            .await
        {
            error!(user_id = %user_id, insight = %name, error = %e, "Failed to mark insight failed");
        }
        self.publish(InsightEvent::failed(user_id.clone(), name, err.to_string()))
            .await;
    }

    async fn publish(&self, event: InsightEvent) {
        if let Err(e) = self.broker.publish(event).await {
            warn!(error = %e, "Could not publish insight event");
        }
    }
}

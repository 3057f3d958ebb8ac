//! PhotoBatchProcessor — submits captured photos one at a time and folds
//! the per-photo responses into a staged item list.
//!
//! Strictly sequential: the backend never sees two in-flight requests
//! from one client. Per-photo failures are recorded and the batch moves
//! on; only whole-batch preconditions (no photos, backend down, missing
//! user id) abort up front.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use super::extract::ExtractionResponse;
use super::types::{BatchOutput, BatchResult, BatchStatusEvent, ExtractionMode};
use crate::config::{endpoints, DEFAULT_INTER_REQUEST_DELAY};
use crate::gateway::Gateway;
use crate::models::item::ExtractedItem;
use crate::models::photo::CapturedPhoto;

/// Whole-batch precondition failures. Nothing has been submitted when
/// any of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("no photos to process")]
    NoPhotos,

    #[error("backend is unreachable")]
    GatewayUnavailable,

    #[error("bill extraction requires a user id")]
    MissingUserId,
}

/// Inter-request pacing policy.
///
/// The pause between submissions is deliberate backend-load bounding,
/// not an artifact of sequencing, so it is a named, configurable value
/// rather than an inline sleep.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No pacing; used by tests.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep between photo `index` and its successor. No pause after
    /// the last photo.
    async fn pause_after(&self, index: usize, total: usize) {
        if index + 1 < total && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_INTER_REQUEST_DELAY)
    }
}

/// Per-batch caller context.
#[derive(Debug, Clone, Default)]
pub struct BatchContext {
    /// Required for bill extraction; the backend scopes receipts per user.
    pub user_id: Option<String>,
}

impl BatchContext {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
}

pub struct PhotoBatchProcessor {
    throttle: Throttle,
}

impl PhotoBatchProcessor {
    pub fn new(throttle: Throttle) -> Self {
        Self { throttle }
    }

    /// Run one extraction batch.
    ///
    /// Produces exactly one [`BatchResult`] per photo in input order,
    /// and the staged items concatenated in photo order. A batch of N
    /// photos can yield anywhere from 0 to N successful extractions.
    pub async fn process_batch<G: Gateway>(
        &self,
        gateway: &G,
        photos: &[CapturedPhoto],
        mode: ExtractionMode,
        context: &BatchContext,
        progress: Option<&dyn Fn(BatchStatusEvent)>,
    ) -> Result<BatchOutput, BatchError> {
        if photos.is_empty() {
            return Err(BatchError::NoPhotos);
        }
        if mode == ExtractionMode::Bill && context.user_id.is_none() {
            return Err(BatchError::MissingUserId);
        }
        if !gateway.health().await {
            return Err(BatchError::GatewayUnavailable);
        }

        let batch_id = Uuid::new_v4();
        let total = photos.len();
        tracing::info!(%batch_id, photos = total, %mode, "starting photo batch");

        if let Some(progress) = progress {
            progress(BatchStatusEvent::Started { photo_count: total });
        }

        let mut results: Vec<BatchResult> = Vec::with_capacity(total);
        let mut items: Vec<ExtractedItem> = Vec::new();

        for (i, photo) in photos.iter().enumerate() {
            if let Some(progress) = progress {
                progress(BatchStatusEvent::Progress {
                    current: i,
                    total,
                });
            }

            let extra_fields = self.extra_fields(mode, context);
            let result = match gateway
                .submit_file(mode.endpoint(), photo, &extra_fields)
                .await
            {
                Ok(raw) => match ExtractionResponse::parse(mode, &raw) {
                    Ok(response) if response.reported_success() => {
                        let photo_items = response.into_items(photo.local_index);
                        tracing::debug!(
                            photo = i,
                            extracted = photo_items.len(),
                            "photo extracted"
                        );
                        items.extend(photo_items);
                        BatchResult::ok(photo.local_index, &photo.uri, raw)
                    }
                    Ok(_) => {
                        tracing::warn!(photo = i, "backend reported extraction failure");
                        BatchResult::failed(
                            photo.local_index,
                            &photo.uri,
                            Some(raw),
                            "extractor reported failure",
                        )
                    }
                    Err(mismatch) => {
                        tracing::warn!(photo = i, error = %mismatch, "response shape mismatch");
                        BatchResult::failed(
                            photo.local_index,
                            &photo.uri,
                            Some(raw),
                            mismatch.to_string(),
                        )
                    }
                },
                Err(e) => {
                    tracing::warn!(photo = i, error = %e, "photo submission failed");
                    BatchResult::failed(photo.local_index, &photo.uri, None, e.to_string())
                }
            };
            results.push(result);

            self.throttle.pause_after(i, total).await;
        }

        let output = BatchOutput {
            batch_id,
            results,
            items,
        };
        tracing::info!(%batch_id, summary = %output.summary(), items = output.items.len(), "batch finished");

        if let Some(progress) = progress {
            progress(BatchStatusEvent::Completed {
                succeeded: output.succeeded(),
                failed: output.failed(),
            });
        }

        Ok(output)
    }

    /// Run the raw object-detection flow against `/predict/`.
    ///
    /// Same sequencing and partial-failure behavior as
    /// [`Self::process_batch`]; the raw responses are kept whole for the
    /// nutrition aggregator.
    pub async fn detect_batch<G: Gateway>(
        &self,
        gateway: &G,
        photos: &[CapturedPhoto],
        progress: Option<&dyn Fn(BatchStatusEvent)>,
    ) -> Result<Vec<BatchResult>, BatchError> {
        if photos.is_empty() {
            return Err(BatchError::NoPhotos);
        }
        if !gateway.health().await {
            return Err(BatchError::GatewayUnavailable);
        }

        let total = photos.len();
        tracing::info!(photos = total, "starting detection batch");

        if let Some(progress) = progress {
            progress(BatchStatusEvent::Started { photo_count: total });
        }

        let mut results = Vec::with_capacity(total);
        for (i, photo) in photos.iter().enumerate() {
            if let Some(progress) = progress {
                progress(BatchStatusEvent::Progress {
                    current: i,
                    total,
                });
            }

            let result = match gateway.submit_file(endpoints::PREDICT, photo, &[]).await {
                Ok(raw) => BatchResult::ok(photo.local_index, &photo.uri, raw),
                Err(e) => {
                    tracing::warn!(photo = i, error = %e, "detection submission failed");
                    BatchResult::failed(photo.local_index, &photo.uri, None, e.to_string())
                }
            };
            results.push(result);

            self.throttle.pause_after(i, total).await;
        }

        if let Some(progress) = progress {
            let succeeded = results.iter().filter(|r| r.success).count();
            progress(BatchStatusEvent::Completed {
                succeeded,
                failed: total - succeeded,
            });
        }

        Ok(results)
    }

    fn extra_fields(&self, mode: ExtractionMode, context: &BatchContext) -> Vec<(&str, String)> {
        match (mode, &context.user_id) {
            (ExtractionMode::Bill, Some(user_id)) => vec![("user_id", user_id.clone())],
            _ => Vec::new(),
        }
    }
}

impl Default for PhotoBatchProcessor {
    fn default() -> Self {
        Self::new(Throttle::default())
    }
}

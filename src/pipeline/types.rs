//! Core types for the photo ingestion pipeline.
//!
//! Lifecycle: CaptureSession → PhotoBatchProcessor → ReconciliationSession
//! → InventoryCommitter. One `BatchResult` per submitted photo, always.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::endpoints;
use crate::models::item::ExtractedItem;

/// How a batch of photos is interpreted. Chosen once per batch and
/// fixed for the processor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Photos are grocery receipts; the backend extracts line items.
    Bill,
    /// Photos show food items; the backend counts them.
    ItemPhoto,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bill => "bill",
            Self::ItemPhoto => "item_photo",
        }
    }

    /// Upload endpoint this mode targets.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Bill => endpoints::EXTRACT_BILL_UPLOAD,
            Self::ItemPhoto => endpoints::DETECT_ITEMS,
        }
    }
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of submitting one photo. Immutable once created; order in
/// the batch result list always equals photo input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub photo_index: usize,
    pub photo_uri: String,
    pub success: bool,
    pub raw_response: Option<Value>,
    pub error_message: Option<String>,
}

impl BatchResult {
    pub fn ok(photo_index: usize, photo_uri: &str, raw_response: Value) -> Self {
        Self {
            photo_index,
            photo_uri: photo_uri.to_string(),
            success: true,
            raw_response: Some(raw_response),
            error_message: None,
        }
    }

    pub fn failed(
        photo_index: usize,
        photo_uri: &str,
        raw_response: Option<Value>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            photo_index,
            photo_uri: photo_uri.to_string(),
            success: false,
            raw_response,
            error_message: Some(error_message.into()),
        }
    }
}

/// Progress notifications for a batch run, fired through the optional
/// progress callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatusEvent {
    Started {
        photo_count: usize,
    },
    /// Fired before the submission for `current` begins.
    Progress {
        current: usize,
        total: usize,
    },
    Completed {
        succeeded: usize,
        failed: usize,
    },
}

/// Everything one processor run produced.
#[derive(Debug)]
pub struct BatchOutput {
    pub batch_id: Uuid,
    /// One entry per input photo, in input order.
    pub results: Vec<BatchResult>,
    /// Items concatenated in photo order; within one bill response the
    /// backend's order is preserved.
    pub items: Vec<ExtractedItem>,
}

impl BatchOutput {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// "K of N photos succeeded" for caller-side reporting.
    pub fn summary(&self) -> String {
        format!(
            "{} of {} photos succeeded",
            self.succeeded(),
            self.results.len()
        )
    }
}

/// Tallies for one reconciliation commit. Ephemeral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    pub success_count: u32,
    pub error_count: u32,
}

impl CommitOutcome {
    pub fn is_clean(&self) -> bool {
        self.error_count == 0
    }
}

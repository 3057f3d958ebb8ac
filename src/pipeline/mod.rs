//! The multi-photo ingestion and inventory-reconciliation pipeline.
//!
//! Capture (external) → [`batch::PhotoBatchProcessor`] →
//! [`session::ReconciliationSession`] → user edits →
//! [`commit::InventoryCommitter`] → remote inventory store (external).
//!
//! The defining property end to end: a single bad photo or failed
//! inventory write never aborts the rest of the run. Per-unit failures
//! land in result structures and are reported in aggregate.

pub mod batch;
pub mod commit;
pub mod extract;
pub mod session;
pub mod types;

pub use batch::{BatchContext, BatchError, PhotoBatchProcessor, Throttle};
pub use commit::{CommitError, InventoryCommitter};
pub use session::{ReconcileError, ReconciliationSession};
pub use types::{BatchOutput, BatchResult, BatchStatusEvent, CommitOutcome, ExtractionMode};

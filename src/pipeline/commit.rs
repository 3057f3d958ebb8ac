//! InventoryCommitter — persists a reconciled item list to the remote
//! inventory store, one item at a time.

use reqwest::Method;
use serde_json::json;
use thiserror::Error;

use super::types::CommitOutcome;
use crate::config::endpoints;
use crate::gateway::Gateway;
use crate::models::item::ExtractedItem;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    /// The store could not be reached at all — checked before the first
    /// submission. Per-item failures never surface here.
    #[error("inventory backend is unreachable")]
    GatewayUnavailable,
}

pub struct InventoryCommitter;

impl InventoryCommitter {
    /// Commit reconciled items for one user.
    ///
    /// Zero-quantity items are skipped silently (not counted as
    /// errors). Quantities are rounded to the nearest whole number at
    /// commit time regardless of fractional edits upstream. One item's
    /// failure never stops the rest; the outcome carries the tallies.
    pub async fn commit<G: Gateway>(
        &self,
        gateway: &G,
        items: &[ExtractedItem],
        user_id: &str,
    ) -> Result<CommitOutcome, CommitError> {
        if !gateway.health().await {
            return Err(CommitError::GatewayUnavailable);
        }

        let mut outcome = CommitOutcome::default();

        for item in items {
            if item.quantity <= 0.0 {
                tracing::debug!(item = %item.name, "zero quantity, skipping");
                continue;
            }

            let payload = json!({
                "user_id": user_id,
                "name": item.name,
                "quantity": item.quantity.round() as i64,
                "unit": item.unit,
            });

            match gateway
                .submit_json(Method::POST, endpoints::ADD_INGREDIENT, Some(&payload))
                .await
            {
                Ok(_) => outcome.success_count += 1,
                Err(e) => {
                    tracing::warn!(item = %item.name, error = %e, "inventory write failed");
                    outcome.error_count += 1;
                }
            }
        }

        tracing::info!(
            succeeded = outcome.success_count,
            failed = outcome.error_count,
            "inventory commit finished"
        );
        Ok(outcome)
    }
}

//! Recipe generation and the cook flow.
//!
//! Cooking applies a recipe's pre-computed post-cook inventory snapshot
//! to the remote store. The update is a full replacement, at-most-once
//! and non-idempotent: there is no rollback, and the remote side is the
//! source of truth. On failure the remote error detail is surfaced
//! verbatim (serialized if structured).

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::endpoints;
use crate::gateway::{Gateway, GatewayError};
use crate::models::recipe::{MacroSet, MealType, Recipe};

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error(transparent)]
    Gateway(GatewayError),

    #[error("recipe generator failed: {0}")]
    Remote(String),

    #[error("malformed recipe response: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum CookError {
    /// The recipe carries no post-cook inventory snapshot; nothing is
    /// sent to the backend.
    #[error("recipe has no suggested inventory update")]
    MissingInventoryPlan,

    #[error(transparent)]
    Gateway(GatewayError),

    #[error("inventory update rejected: {0}")]
    Remote(String),
}

/// Ask the backend to generate a recipe from the user's inventory.
pub async fn generate_recipe<G: Gateway>(
    gateway: &G,
    user_id: &str,
    meal: MealType,
) -> Result<Recipe, RecipeError> {
    let endpoint = endpoints::generate_recipe(user_id, meal.as_str());
    let raw = match gateway.get_json(&endpoint).await {
        Ok(raw) => raw,
        Err(GatewayError::Http { body, .. }) => {
            return Err(RecipeError::Remote(detail_from_body(
                &body,
                "Failed to generate recipe",
            )))
        }
        Err(e) => return Err(RecipeError::Gateway(e)),
    };

    let success = raw.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success || raw.get("error").is_some() {
        return Err(RecipeError::Remote(
            detail_from_value(&raw).unwrap_or_else(|| "Failed to generate recipe".to_string()),
        ));
    }

    let recipe_value = raw
        .get("recipe")
        .ok_or_else(|| RecipeError::Shape("missing recipe field".to_string()))?;
    serde_json::from_value(recipe_value.clone()).map_err(|e| RecipeError::Shape(e.to_string()))
}

/// Running daily macro totals, reset on day rollover.
///
/// Owned by the host process; persistence of the totals is the host's
/// concern, this type only does the arithmetic and the rollover.
#[derive(Debug, Clone)]
pub struct MacroLedger {
    day: NaiveDate,
    totals: MacroSet,
}

impl MacroLedger {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            totals: MacroSet::default(),
        }
    }

    pub fn for_today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn totals(&self) -> &MacroSet {
        &self.totals
    }

    /// Add one meal's macros for `today`, rolling the ledger over first
    /// if the day has changed.
    pub fn apply(&mut self, macros: &MacroSet, today: NaiveDate) {
        if today != self.day {
            tracing::debug!(from = %self.day, to = %today, "macro ledger day rollover");
            self.day = today;
            self.totals = MacroSet::default();
        }
        self.totals.add(macros);
    }
}

/// Commits a recipe's inventory consumption.
pub struct RecipeCookCommitter {
    last_success_at: Option<Instant>,
    banner_window: Duration,
}

impl RecipeCookCommitter {
    pub fn new() -> Self {
        Self {
            last_success_at: None,
            // Matches the success banner the review UI shows after a cook.
            banner_window: Duration::from_secs(3),
        }
    }

    /// Apply the recipe's post-cook inventory snapshot and, on success,
    /// its macros to the ledger.
    ///
    /// Requires `recipe.suggested_inventory_update`; without it the call
    /// fails before any network traffic.
    pub async fn cook<G: Gateway>(
        &mut self,
        gateway: &G,
        recipe: &Recipe,
        user_id: &str,
        ledger: &mut MacroLedger,
    ) -> Result<(), CookError> {
        let plan = recipe
            .suggested_inventory_update
            .as_ref()
            .ok_or(CookError::MissingInventoryPlan)?;

        let payload = json!({
            "user_id": user_id,
            "updated_inventory": plan,
        });

        let raw = match gateway
            .submit_json(Method::POST, endpoints::UPDATE_INVENTORY, Some(&payload))
            .await
        {
            Ok(raw) => raw,
            Err(GatewayError::Http { body, .. }) => {
                return Err(CookError::Remote(detail_from_body(
                    &body,
                    "Failed to update inventory",
                )))
            }
            Err(e) => return Err(CookError::Gateway(e)),
        };

        let success = raw.get("success").and_then(Value::as_bool).unwrap_or(false);
        if !success {
            return Err(CookError::Remote(
                detail_from_value(&raw).unwrap_or_else(|| "Failed to update inventory".to_string()),
            ));
        }

        if let Some(macros) = &recipe.macros {
            ledger.apply(macros, chrono::Local::now().date_naive());
        }
        self.last_success_at = Some(Instant::now());
        tracing::info!(recipe = %recipe.recipe_name, "recipe cooked, inventory replaced");
        Ok(())
    }

    /// True shortly after a successful cook; drives the success banner.
    pub fn recently_cooked(&self) -> bool {
        self.last_success_at
            .is_some_and(|at| at.elapsed() < self.banner_window)
    }
}

impl Default for RecipeCookCommitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Remote error detail, surfaced verbatim; structured details are
/// serialized rather than summarized.
fn detail_from_value(value: &Value) -> Option<String> {
    for key in ["detail", "error"] {
        match value.get(key) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Null) | None => {}
            Some(other) => return serde_json::to_string(other).ok(),
        }
    }
    None
}

fn detail_from_body(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| detail_from_value(&value))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                fallback.to_string()
            } else {
                body.to_string()
            }
        })
}

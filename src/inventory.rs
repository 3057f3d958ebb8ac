//! Remote inventory store CRUD.
//!
//! The backend is the source of truth; this module is a thin, typed
//! layer over its ingredient endpoints. Note the response casing: the
//! store answers with capitalised `Name`/`Quantity`/`Units` keys.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::endpoints;
use crate::gateway::{Gateway, GatewayError};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("invalid item: {0}")]
    Validation(String),

    #[error("malformed inventory response: {0}")]
    Shape(String),
}

/// One stored ingredient as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "Units", default)]
    pub units: Option<String>,
    pub id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl IngredientRecord {
    pub fn display_units(&self) -> &str {
        self.units.as_deref().unwrap_or("units")
    }
}

/// Typed access to the user's remote inventory.
pub struct InventoryStore;

impl InventoryStore {
    /// Fetch the full inventory. A response without an `ingredients`
    /// key reads as empty, matching the store's behavior for new users.
    pub async fn list<G: Gateway>(
        &self,
        gateway: &G,
        user_id: &str,
    ) -> Result<Vec<IngredientRecord>, InventoryError> {
        let raw = gateway
            .get_json(&endpoints::get_ingredients(user_id))
            .await?;
        let Some(entries) = raw.get("ingredients") else {
            return Ok(Vec::new());
        };
        serde_json::from_value(entries.clone()).map_err(|e| InventoryError::Shape(e.to_string()))
    }

    /// Add one ingredient for the user.
    pub async fn add<G: Gateway>(
        &self,
        gateway: &G,
        user_id: &str,
        name: &str,
        quantity: f64,
        unit: &str,
    ) -> Result<(), InventoryError> {
        let (name, quantity, unit) = validate(name, quantity, unit)?;
        let payload = json!({
            "user_id": user_id,
            "name": name,
            "quantity": quantity,
            "unit": unit,
        });
        gateway
            .submit_json(Method::POST, endpoints::ADD_INGREDIENT, Some(&payload))
            .await?;
        Ok(())
    }

    /// Replace name/quantity/unit of a stored ingredient.
    pub async fn update<G: Gateway>(
        &self,
        gateway: &G,
        id: i64,
        name: &str,
        quantity: f64,
        unit: &str,
    ) -> Result<(), InventoryError> {
        let (name, quantity, unit) = validate(name, quantity, unit)?;
        let payload = json!({
            "name": name,
            "quantity": quantity,
            "unit": unit,
        });
        gateway
            .submit_json(
                Method::PUT,
                &endpoints::update_ingredient(id),
                Some(&payload),
            )
            .await?;
        Ok(())
    }

    pub async fn delete<G: Gateway>(&self, gateway: &G, id: i64) -> Result<(), InventoryError> {
        gateway
            .submit_json(Method::DELETE, &endpoints::delete_ingredient(id), None)
            .await?;
        Ok(())
    }
}

fn validate<'a>(
    name: &'a str,
    quantity: f64,
    unit: &'a str,
) -> Result<(&'a str, f64, &'a str), InventoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InventoryError::Validation("name is required".to_string()));
    }
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(InventoryError::Validation(format!(
            "quantity must be a non-negative number, got {quantity}"
        )));
    }
    let unit = unit.trim();
    Ok((name, quantity, if unit.is_empty() { "units" } else { unit }))
}

//! Response normalization: two divergent backend shapes folded into one
//! item list.
//!
//! Bill extraction answers `{success, items: [{name, quantity: {value,
//! unit}, quantity_display}]}`; item detection answers a flat
//! `{name: count}` map. The shapes are modeled as a tagged union
//! dispatched once by [`ExtractionMode`], so normalization is exhaustive
//! instead of duck-typed field probing.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::types::ExtractionMode;
use crate::models::item::{ExtractedItem, DEFAULT_UNIT};

/// Response JSON did not have the shape the mode promised.
///
/// Treated as a zero-item, success=false outcome for that photo — never
/// a crash, never a batch abort.
#[derive(Debug, Error)]
#[error("unexpected response shape: {0}")]
pub struct ShapeMismatch(pub String);

#[derive(Debug, Deserialize)]
pub struct BillExtraction {
    pub success: bool,
    #[serde(default)]
    pub items: Vec<BillItem>,
}

#[derive(Debug, Deserialize)]
pub struct BillItem {
    pub name: String,
    pub quantity: BillQuantity,
    #[serde(default)]
    pub quantity_display: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BillQuantity {
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// One per-photo backend response, already shape-checked for its mode.
#[derive(Debug)]
pub enum ExtractionResponse {
    Bill(BillExtraction),
    /// Item name → count, in API-returned order.
    ItemMap(serde_json::Map<String, Value>),
}

impl ExtractionResponse {
    /// Dispatch the raw response by mode. This is the single place the
    /// two wire shapes are told apart.
    pub fn parse(mode: ExtractionMode, raw: &Value) -> Result<Self, ShapeMismatch> {
        match mode {
            ExtractionMode::Bill => {
                let bill: BillExtraction = serde_json::from_value(raw.clone())
                    .map_err(|e| ShapeMismatch(e.to_string()))?;
                Ok(Self::Bill(bill))
            }
            ExtractionMode::ItemPhoto => {
                // Some deployments wrap the map in an `items` key.
                let map = raw
                    .get("items")
                    .and_then(Value::as_object)
                    .or_else(|| raw.as_object())
                    .ok_or_else(|| ShapeMismatch("expected a name→count object".to_string()))?;
                Ok(Self::ItemMap(map.clone()))
            }
        }
    }

    /// Did the backend itself report success?
    pub fn reported_success(&self) -> bool {
        match self {
            Self::Bill(bill) => bill.success,
            Self::ItemMap(_) => true,
        }
    }

    /// Flatten into staged items. Blank names are dropped here;
    /// non-numeric counts in an item map are skipped.
    pub fn into_items(self, photo_index: usize) -> Vec<ExtractedItem> {
        match self {
            Self::Bill(bill) => {
                if !bill.success {
                    return Vec::new();
                }
                bill.items
                    .into_iter()
                    .filter_map(|entry| {
                        ExtractedItem::materialize(
                            &entry.name,
                            entry.quantity.value,
                            entry.quantity.unit.as_deref().unwrap_or(DEFAULT_UNIT),
                            photo_index,
                        )
                    })
                    .collect()
            }
            Self::ItemMap(map) => map
                .iter()
                .filter_map(|(name, count)| {
                    let Some(count) = count.as_f64() else {
                        tracing::warn!(item = %name, "non-numeric detection count, skipping");
                        return None;
                    };
                    // Detection counts are whole, non-negative numbers.
                    ExtractedItem::materialize(name, count.max(0.0), DEFAULT_UNIT, photo_index)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bill_mode_extracts_nested_quantities() {
        let raw = json!({
            "success": true,
            "items": [
                {"name": "milk", "quantity": {"value": 2.0, "unit": "L"}, "quantity_display": "2 L"}
            ]
        });
        let response = ExtractionResponse::parse(ExtractionMode::Bill, &raw).unwrap();
        assert!(response.reported_success());

        let items = response.into_items(0);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "milk");
        assert_eq!(items[0].quantity, 2.0);
        assert_eq!(items[0].unit, "L");
        assert_eq!(items[0].display_text, "2 L");
    }

    #[test]
    fn bill_reported_failure_yields_zero_items() {
        let raw = json!({"success": false, "items": [{"name": "milk", "quantity": {"value": 2.0, "unit": "L"}}]});
        let response = ExtractionResponse::parse(ExtractionMode::Bill, &raw).unwrap();
        assert!(!response.reported_success());
        assert!(response.into_items(0).is_empty());
    }

    #[test]
    fn bill_malformed_shape_is_a_mismatch_not_a_panic() {
        let raw = json!({"items": "not a list"});
        assert!(ExtractionResponse::parse(ExtractionMode::Bill, &raw).is_err());

        let raw = json!([1, 2, 3]);
        assert!(ExtractionResponse::parse(ExtractionMode::Bill, &raw).is_err());
    }

    #[test]
    fn bill_preserves_backend_item_order() {
        let raw = json!({
            "success": true,
            "items": [
                {"name": "rice", "quantity": {"value": 1.0, "unit": "kg"}},
                {"name": "bread", "quantity": {"value": 2.0, "unit": "pcs"}},
                {"name": "cheese", "quantity": {"value": 200.0, "unit": "g"}}
            ]
        });
        let items = ExtractionResponse::parse(ExtractionMode::Bill, &raw)
            .unwrap()
            .into_items(1);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["rice", "bread", "cheese"]);
        assert!(items.iter().all(|i| i.source_photo_index == 1));
    }

    #[test]
    fn item_map_becomes_pcs_items() {
        let raw = json!({"apple": 3, "egg": 12});
        let items = ExtractionResponse::parse(ExtractionMode::ItemPhoto, &raw)
            .unwrap()
            .into_items(0);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "apple");
        assert_eq!(items[0].quantity, 3.0);
        assert_eq!(items[0].unit, "pcs");
        assert_eq!(items[0].display_text, "3 pcs");
        assert_eq!(items[1].name, "egg");
        assert_eq!(items[1].display_text, "12 pcs");
    }

    #[test]
    fn item_map_accepts_items_wrapper() {
        let raw = json!({"items": {"banana": 6}});
        let items = ExtractionResponse::parse(ExtractionMode::ItemPhoto, &raw)
            .unwrap()
            .into_items(2);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "banana");
        assert_eq!(items[0].source_photo_index, 2);
    }

    #[test]
    fn item_map_skips_non_numeric_counts() {
        let raw = json!({"apple": 3, "egg": "a dozen"});
        let items = ExtractionResponse::parse(ExtractionMode::ItemPhoto, &raw)
            .unwrap()
            .into_items(0);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "apple");
    }

    #[test]
    fn item_map_rejects_non_object_response() {
        let raw = json!("just a string");
        assert!(ExtractionResponse::parse(ExtractionMode::ItemPhoto, &raw).is_err());
    }

    #[test]
    fn negative_counts_clamp_to_zero() {
        let raw = json!({"apple": -4});
        let items = ExtractionResponse::parse(ExtractionMode::ItemPhoto, &raw)
            .unwrap()
            .into_items(0);
        assert_eq!(items[0].quantity, 0.0);
    }
}

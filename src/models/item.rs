//! ExtractedItem — the unit of reconciliation.

use serde::{Deserialize, Serialize};

/// Unit assigned when the backend gives a bare count.
pub const DEFAULT_UNIT: &str = "pcs";

/// One item staged for inventory commit.
///
/// Materialized from a per-photo backend response, edited in place by
/// the reconciliation session, and consumed by the committer. The
/// display text is always `"{quantity} {unit}"`; every mutation goes
/// through a setter so the invariant holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub name: String,
    /// Never negative. Zero-quantity items are skipped at commit.
    pub quantity: f64,
    pub unit: String,
    /// Index of the photo this item came from (stable back-reference).
    pub source_photo_index: usize,
    pub display_text: String,
}

impl ExtractedItem {
    /// Materialize an item from backend data.
    ///
    /// Returns `None` for blank names — the non-empty-name rule is
    /// enforced here, not at commit time. Negative or non-finite
    /// quantities clamp to zero; blank units fall back to [`DEFAULT_UNIT`].
    pub fn materialize(
        name: &str,
        quantity: f64,
        unit: &str,
        source_photo_index: usize,
    ) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let unit = unit.trim();
        let mut item = Self {
            name: name.to_string(),
            quantity: clamp_quantity(quantity),
            unit: if unit.is_empty() {
                DEFAULT_UNIT.to_string()
            } else {
                unit.to_string()
            },
            source_photo_index,
            display_text: String::new(),
        };
        item.recompute_display();
        Some(item)
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = clamp_quantity(quantity);
        self.recompute_display();
    }

    pub fn set_unit(&mut self, unit: &str) {
        self.unit = unit.trim().to_string();
        self.recompute_display();
    }

    fn recompute_display(&mut self) {
        self.display_text = format!("{} {}", self.quantity, self.unit);
    }
}

fn clamp_quantity(quantity: f64) -> f64 {
    if quantity.is_finite() && quantity > 0.0 {
        quantity
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materialize_rejects_blank_names() {
        assert!(ExtractedItem::materialize("", 1.0, "pcs", 0).is_none());
        assert!(ExtractedItem::materialize("   ", 1.0, "pcs", 0).is_none());
    }

    #[test]
    fn materialize_defaults_unit_and_builds_display() {
        let item = ExtractedItem::materialize("apple", 3.0, "", 2).unwrap();
        assert_eq!(item.unit, "pcs");
        assert_eq!(item.display_text, "3 pcs");
        assert_eq!(item.source_photo_index, 2);
    }

    #[test]
    fn negative_and_non_finite_quantities_clamp_to_zero() {
        let item = ExtractedItem::materialize("milk", -2.0, "L", 0).unwrap();
        assert_eq!(item.quantity, 0.0);

        let item = ExtractedItem::materialize("milk", f64::NAN, "L", 0).unwrap();
        assert_eq!(item.quantity, 0.0);
    }

    #[test]
    fn display_tracks_every_edit() {
        let mut item = ExtractedItem::materialize("rice", 1.0, "kg", 0).unwrap();
        assert_eq!(item.display_text, "1 kg");

        item.set_quantity(2.6);
        assert_eq!(item.display_text, "2.6 kg");
        item.set_unit("g");
        assert_eq!(item.display_text, "2.6 g");
        item.set_quantity(0.0);
        assert_eq!(item.display_text, "0 g");
        item.set_unit("kg");
        assert_eq!(item.display_text, "0 kg");
    }

    #[test]
    fn whole_quantities_render_without_decimal_point() {
        let item = ExtractedItem::materialize("egg", 12.0, "pcs", 0).unwrap();
        assert_eq!(item.display_text, "12 pcs");
    }
}

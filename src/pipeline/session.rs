//! ReconciliationSession — the human-in-the-loop staging list between
//! raw extraction and inventory commit.
//!
//! Single-owner mutable state: on a multi-threaded host the session
//! must sit behind one owner or a mutex, but nothing here locks.

use thiserror::Error;

use crate::models::item::ExtractedItem;

/// Units the review UI offers as a toggle. Anything else renders
/// read-only, though the value stays mutable through [`ReconciliationSession::update_unit`].
const TOGGLABLE_UNITS: &[&str] = &["g", "kg", "grams"];

pub fn unit_is_togglable(unit: &str) -> bool {
    TOGGLABLE_UNITS.contains(&unit)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("no item at index {0}")]
    IndexOutOfRange(usize),
}

/// Ordered, editable list of staged items.
#[derive(Debug, Default)]
pub struct ReconciliationSession {
    items: Vec<ExtractedItem>,
}

impl ReconciliationSession {
    /// Seed from batch output (or any other aggregation of items).
    pub fn new(items: Vec<ExtractedItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ExtractedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply raw quantity input. Non-numeric or negative text clamps to
    /// zero — user typing never errors, let alone panics.
    pub fn update_quantity(&mut self, index: usize, raw: &str) -> Result<(), ReconcileError> {
        let item = self.item_mut(index)?;
        let quantity = raw.trim().parse::<f64>().unwrap_or(0.0);
        item.set_quantity(quantity);
        Ok(())
    }

    pub fn update_unit(&mut self, index: usize, unit: &str) -> Result<(), ReconcileError> {
        let item = self.item_mut(index)?;
        item.set_unit(unit);
        Ok(())
    }

    /// Remove one item, preserving the relative order of the rest.
    pub fn remove(&mut self, index: usize) -> Result<ExtractedItem, ReconcileError> {
        if index >= self.items.len() {
            return Err(ReconcileError::IndexOutOfRange(index));
        }
        Ok(self.items.remove(index))
    }

    /// Hand the reconciled list to the committer.
    pub fn into_items(self) -> Vec<ExtractedItem> {
        self.items
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut ExtractedItem, ReconcileError> {
        self.items
            .get_mut(index)
            .ok_or(ReconcileError::IndexOutOfRange(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> ReconciliationSession {
        ReconciliationSession::new(vec![
            ExtractedItem::materialize("apple", 3.0, "pcs", 0).unwrap(),
            ExtractedItem::materialize("flour", 500.0, "g", 0).unwrap(),
            ExtractedItem::materialize("milk", 2.0, "L", 1).unwrap(),
        ])
    }

    #[test]
    fn update_quantity_parses_and_recomputes_display() {
        let mut session = seeded();
        session.update_quantity(0, "5").unwrap();
        assert_eq!(session.items()[0].quantity, 5.0);
        assert_eq!(session.items()[0].display_text, "5 pcs");

        session.update_quantity(1, " 2.5 ").unwrap();
        assert_eq!(session.items()[1].quantity, 2.5);
        assert_eq!(session.items()[1].display_text, "2.5 g");
    }

    #[test]
    fn invalid_quantity_input_clamps_to_zero() {
        let mut session = seeded();
        session.update_quantity(1, "abc").unwrap();
        assert_eq!(session.items()[1].quantity, 0.0);
        assert_eq!(session.items()[1].display_text, "0 g");

        session.update_quantity(1, "").unwrap();
        assert_eq!(session.items()[1].quantity, 0.0);

        session.update_quantity(1, "-4").unwrap();
        assert_eq!(session.items()[1].quantity, 0.0);
    }

    #[test]
    fn update_unit_recomputes_display() {
        let mut session = seeded();
        session.update_unit(1, "kg").unwrap();
        assert_eq!(session.items()[1].unit, "kg");
        assert_eq!(session.items()[1].display_text, "500 kg");
    }

    #[test]
    fn repeated_edits_keep_display_consistent() {
        let mut session = seeded();
        for (qty, unit) in [("2", "kg"), ("750", "g")] {
            session.update_quantity(1, qty).unwrap();
            session.update_unit(1, unit).unwrap();
            let item = &session.items()[1];
            assert_eq!(item.display_text, format!("{} {}", item.quantity, item.unit));
        }
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut session = seeded();
        let removed = session.remove(1).unwrap();
        assert_eq!(removed.name, "flour");

        let names: Vec<&str> = session.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "milk"]);
    }

    #[test]
    fn out_of_range_edits_error_cleanly() {
        let mut session = seeded();
        assert_eq!(
            session.update_quantity(9, "1"),
            Err(ReconcileError::IndexOutOfRange(9))
        );
        assert_eq!(
            session.update_unit(9, "g"),
            Err(ReconcileError::IndexOutOfRange(9))
        );
        assert!(session.remove(9).is_err());
    }

    #[test]
    fn weight_units_are_togglable_others_not() {
        assert!(unit_is_togglable("g"));
        assert!(unit_is_togglable("kg"));
        assert!(unit_is_togglable("grams"));
        assert!(!unit_is_togglable("L"));
        assert!(!unit_is_togglable("pcs"));
    }
}

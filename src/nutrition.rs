//! Nutrition lookup and batch-level aggregation.
//!
//! The lookup table is a process-wide constant fallback database;
//! authoritative values belong to the backend. Aggregation is a pure
//! function over detection batch results — no I/O, no side effects.

use serde::Serialize;

use crate::models::detection::detections_from_response;
use crate::pipeline::types::BatchResult;

/// Per-100g-ish reference values for one food.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutritionRecord {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Returned for any name the table does not know.
pub const UNKNOWN_FOOD: NutritionRecord = NutritionRecord {
    calories: 50.0,
    protein: 1.0,
    carbs: 10.0,
    fat: 1.0,
};

const fn record(calories: f64, protein: f64, carbs: f64, fat: f64) -> NutritionRecord {
    NutritionRecord {
        calories,
        protein,
        carbs,
        fat,
    }
}

/// Static fallback table, keyed by lower-cased item name.
static NUTRITION_TABLE: &[(&str, NutritionRecord)] = &[
    // Fruits
    ("apple", record(80.0, 0.4, 21.0, 0.3)),
    ("banana", record(105.0, 1.3, 27.0, 0.4)),
    ("orange", record(60.0, 1.2, 15.0, 0.2)),
    ("grape", record(62.0, 0.6, 16.0, 0.3)),
    // Vegetables
    ("carrot", record(25.0, 0.5, 6.0, 0.1)),
    ("broccoli", record(25.0, 3.0, 5.0, 0.3)),
    ("tomato", record(18.0, 0.9, 3.9, 0.2)),
    ("lettuce", record(10.0, 0.9, 2.0, 0.1)),
    // Grains & bread
    ("bread", record(70.0, 2.3, 13.0, 1.2)),
    ("rice", record(130.0, 2.7, 28.0, 0.3)),
    ("pasta", record(220.0, 8.0, 44.0, 1.3)),
    // Protein
    ("egg", record(70.0, 6.0, 0.6, 5.0)),
    ("chicken", record(165.0, 31.0, 0.0, 3.6)),
    ("beef", record(250.0, 26.0, 0.0, 15.0)),
    ("fish", record(206.0, 22.0, 0.0, 12.0)),
    // Dairy
    ("milk", record(42.0, 3.4, 5.0, 1.0)),
    ("cheese", record(113.0, 7.0, 1.0, 9.0)),
    ("yogurt", record(59.0, 10.0, 3.6, 0.4)),
];

/// Case-insensitive lookup; misses fall back to [`UNKNOWN_FOOD`].
pub fn lookup(item_name: &str) -> &'static NutritionRecord {
    let name = item_name.trim();
    NUTRITION_TABLE
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, record)| record)
        .unwrap_or(&UNKNOWN_FOOD)
}

/// Batch-level totals for summary display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalNutrition {
    /// Rounded to the nearest whole kcal.
    pub calories: i64,
    /// Macros rounded to one decimal place.
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub item_count: usize,
}

/// Sum per-detection lookups across the successful results only.
pub fn aggregate(results: &[BatchResult]) -> TotalNutrition {
    let mut calories = 0.0;
    let mut protein = 0.0;
    let mut carbs = 0.0;
    let mut fat = 0.0;
    let mut item_count = 0;

    for result in results.iter().filter(|r| r.success) {
        let Some(raw) = &result.raw_response else {
            continue;
        };
        for detection in detections_from_response(raw) {
            let record = lookup(detection.display_name());
            calories += record.calories;
            protein += record.protein;
            carbs += record.carbs;
            fat += record.fat;
            item_count += 1;
        }
    }

    TotalNutrition {
        calories: calories.round() as i64,
        protein: round_tenth(protein),
        carbs: round_tenth(carbs),
        fat: round_tenth(fat),
        item_count,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

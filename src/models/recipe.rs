//! Recipes and macro totals as delivered by the recipe generator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Macro totals in grams (calories in kcal).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroSet {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

impl MacroSet {
    pub fn add(&mut self, other: &MacroSet) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
    }
}

/// A generated recipe.
///
/// `suggested_inventory_update` is the generator's pre-computed
/// post-cook inventory snapshot; cooking is impossible without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub recipe_name: String,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Newline-separated steps as emitted by the generator.
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub macros: Option<MacroSet>,
    #[serde(default)]
    pub suggested_inventory_update: Option<Value>,
}

impl Recipe {
    /// Instructions split into trimmed, non-empty steps.
    pub fn instruction_steps(&self) -> Vec<&str> {
        self.instructions
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// The three meals the generator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Breakfast => "🍳",
            Self::Lunch => "🥗",
            Self::Dinner => "🍛",
        }
    }

    /// Rough per-meal calorie estimate for summary display.
    pub fn estimated_calories(&self) -> u32 {
        match self {
            Self::Breakfast => 350,
            Self::Lunch => 600,
            Self::Dinner => 500,
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn recipe_deserializes_with_optional_fields_missing() {
        let recipe: Recipe = serde_json::from_value(json!({
            "recipe_name": "Veggie omelette"
        }))
        .unwrap();
        assert_eq!(recipe.recipe_name, "Veggie omelette");
        assert!(recipe.macros.is_none());
        assert!(recipe.suggested_inventory_update.is_none());
        assert!(recipe.instruction_steps().is_empty());
    }

    #[test]
    fn instruction_steps_split_and_trim() {
        let recipe: Recipe = serde_json::from_value(json!({
            "recipe_name": "Fried rice",
            "instructions": "Heat oil\r\n  Add rice  \n\nServe"
        }))
        .unwrap();
        assert_eq!(
            recipe.instruction_steps(),
            vec!["Heat oil", "Add rice", "Serve"]
        );
    }

    #[test]
    fn meal_type_metadata() {
        assert_eq!(MealType::Breakfast.as_str(), "breakfast");
        assert_eq!(MealType::Lunch.estimated_calories(), 600);
        assert_eq!(MealType::Dinner.to_string(), "dinner");
    }

    #[test]
    fn macro_set_accumulates() {
        let mut total = MacroSet::default();
        total.add(&MacroSet {
            calories: 350.0,
            protein: 20.0,
            carbs: 30.0,
            fat: 12.0,
        });
        total.add(&MacroSet {
            calories: 150.0,
            protein: 5.0,
            carbs: 10.0,
            fat: 3.0,
        });
        assert_eq!(total.calories, 500.0);
        assert_eq!(total.protein, 25.0);
    }
}

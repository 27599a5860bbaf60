//! Saved serving counts and ingredient scaling arithmetic

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One recipe ingredient as supplied by the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Per-dish serving counts, persisted as the `servingCounts` blob.
///
/// Only the chosen serving count is saved; the ingredient list itself comes
/// from the UI on every scale request (the recipe dataset is not ours).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServingsBook {
    entries: HashMap<String, u32>,
}

impl ServingsBook {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Saved servings for a dish, falling back to the recipe's original count
    pub fn get(&self, dish: &str, original_servings: u32) -> u32 {
        self.entries
            .get(dish)
            .copied()
            .unwrap_or(original_servings)
            .max(1)
    }

    /// Save a serving count for a dish, clamped to at least one serving
    pub fn set(&mut self, dish: &str, servings: u32) -> u32 {
        let servings = servings.max(1);
        self.entries.insert(dish.to_string(), servings);
        servings
    }

    /// Forget a dish's saved count; returns whether an entry existed
    pub fn reset(&mut self, dish: &str) -> bool {
        self.entries.remove(dish).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scale one ingredient amount to a new serving count, rounded to 2 decimals
pub fn scale_amount(amount: f64, original_servings: u32, servings: u32) -> f64 {
    let scale = servings as f64 / original_servings.max(1) as f64;
    (amount * scale * 100.0).round() / 100.0
}

/// Render an amount the way a recipe card would: whole numbers bare,
/// fractions with trailing zeros trimmed ("1.50" -> "1.5")
pub fn format_amount(amount: f64) -> String {
    if amount == amount.floor() {
        return format!("{}", amount as i64);
    }
    let text = format!("{:.2}", amount);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Scale a whole ingredient list to a serving count
pub fn scale_ingredients(
    ingredients: &[Ingredient],
    original_servings: u32,
    servings: u32,
) -> Vec<Ingredient> {
    ingredients
        .iter()
        .map(|ingredient| Ingredient {
            name: ingredient.name.clone(),
            amount: scale_amount(ingredient.amount, original_servings, servings),
            unit: ingredient.unit.clone(),
        })
        .collect()
}

//! Merging a recipe's ingredients into a shopping list.
//!
//! Each ingredient is matched against the list in order; the first
//! similar item absorbs it, otherwise it becomes a new item. Matching runs
//! against the list as it is being built, so two similar lines in one
//! recipe end up in a single item.

use serde::Serialize;

use crate::matcher::are_similar;
use crate::models::{Ingredient, ShoppingItem};
use crate::quantity::{combine, parse_amount};

/// Outcome of merging one recipe into a list.
///
/// `added_count + combined_count` equals the number of ingredients with a
/// non-blank name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub added_count: usize,
    pub combined_count: usize,
    pub updated_items: Vec<ShoppingItem>,
}

/// Scale a free-form amount by `multiplier`.
///
/// The product keeps its full precision ("0.125" x 3 is "0.375"); only
/// float noise past ten decimals is dropped. Amounts without a leading
/// number ("a pinch") are returned unchanged.
pub fn scale_amount(amount: &str, multiplier: f64) -> String {
    if multiplier == 1.0 {
        return amount.to_string();
    }
    match parse_amount(amount) {
        Some(value) => {
            let scaled = (value * multiplier * 1e10).round() / 1e10;
            // -0 would print as "-0"
            format!("{}", scaled + 0.0)
        }
        None => amount.to_string(),
    }
}

/// Merge `ingredients` into `existing_items`.
///
/// Matched items get the combined quantity and are marked not completed;
/// their other fields are kept. New items are appended after the existing
/// ones in ingredient order.
pub fn merge_recipe_into_list(
    ingredients: &[Ingredient],
    existing_items: Vec<ShoppingItem>,
    serving_multiplier: f64,
    user_id: &str,
) -> MergeResult {
    let mut items = existing_items;
    let mut added_count = 0;
    let mut combined_count = 0;

    for ingredient in ingredients.iter().filter(|i| !i.is_blank()) {
        let amount = scale_amount(&ingredient.amount, serving_multiplier);

        match items
            .iter()
            .position(|item| are_similar(&item.name, &ingredient.name))
        {
            Some(index) => {
                let item = &mut items[index];
                let merged = combine(&item.amount, &item.unit, &amount, &ingredient.unit);
                tracing::debug!(
                    ingredient = %ingredient.name,
                    item = %item.name,
                    index,
                    amount = %merged,
                    "Combined ingredient into existing item"
                );
                item.amount = merged.amount;
                item.unit = merged.unit;
                item.completed = false;
                combined_count += 1;
            }
            None => {
                tracing::debug!(ingredient = %ingredient.name, "Added ingredient as new item");
                items.push(ShoppingItem::new(
                    ingredient.name.clone(),
                    amount,
                    ingredient.unit.clone(),
                    user_id,
                ));
                added_count += 1;
            }
        }
    }

    MergeResult {
        added_count,
        combined_count,
        updated_items: items,
    }
}

//! Cookshare Core Library
//!
//! Recipe and shopping list models, plus the ingredient merging used when
//! a recipe is added to a shared shopping list:
//!
//! - [`units`]: unit normalization and conversion
//! - [`matcher`]: ingredient name similarity
//! - [`quantity`]: combining two quantities of one ingredient
//! - [`merge`]: merging a recipe into a list

pub mod matcher;
pub mod merge;
pub mod models;
pub mod quantity;
pub mod units;

pub use matcher::are_similar;
pub use merge::{merge_recipe_into_list, scale_amount, MergeResult};
pub use models::{Ingredient, Recipe, ShoppingItem, ShoppingList, ShoppingListError};
pub use quantity::{combine, format_amount, parse_amount, Quantity};
pub use units::{
    convert_from_base_unit, convert_to_base_unit, normalize_unit, CanonicalUnit, Dimension,
    Measure,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

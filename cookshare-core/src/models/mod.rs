mod ingredient;
mod recipe;
mod shopping_list;

pub use ingredient::Ingredient;
pub use recipe::Recipe;
pub use shopping_list::{ShoppingItem, ShoppingList, ShoppingListError};

//! Shared shopping lists.
//!
//! A list belongs to one owner and may be shared with invited users.
//! Items have no stable id: every per-item operation addresses an item by
//! its position, and the whole item array is persisted at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::Ingredient;
use crate::merge::{merge_recipe_into_list, MergeResult};

/// Errors from shopping list mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShoppingListError {
    #[error("No item at position {index} (list has {len} items)")]
    ItemOutOfRange { index: usize, len: usize },
    #[error("Item name cannot be empty")]
    EmptyItemName,
    #[error("The list owner cannot be invited to their own list")]
    OwnerCannotBeInvited,
}

/// One line on a shopping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub completed: bool,
    pub added_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl ShoppingItem {
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<String>,
        unit: impl Into<String>,
        added_by: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit: unit.into(),
            completed: false,
            added_by: added_by.into(),
            order: None,
        }
    }
}

impl fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.completed { "[x]" } else { "[ ]" };
        match (self.amount.is_empty(), self.unit.is_empty()) {
            (true, _) => write!(f, "{} {}", check, self.name),
            (false, true) => write!(f, "{} {:<20} {}", check, self.name, self.amount),
            (false, false) => write!(
                f,
                "{} {:<20} {} {}",
                check, self.name, self.amount, self.unit
            ),
        }
    }
}

/// A shopping list document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: Uuid,
    pub owner_id: String,
    pub invited_users: Vec<String>,
    pub items: Vec<ShoppingItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingList {
    /// Create a new empty list owned by `owner_id`.
    pub fn new(owner_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            invited_users: Vec::new(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a manual item.
    pub fn add_item(
        &mut self,
        name: &str,
        amount: &str,
        unit: &str,
        user_id: &str,
    ) -> Result<&ShoppingItem, ShoppingListError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShoppingListError::EmptyItemName);
        }
        self.items
            .push(ShoppingItem::new(name, amount.trim(), unit.trim(), user_id));
        self.touch();
        Ok(&self.items[self.items.len() - 1])
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut ShoppingItem, ShoppingListError> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(ShoppingListError::ItemOutOfRange { index, len })
    }

    /// Mark the item at `index` as purchased or not.
    pub fn set_completed(&mut self, index: usize, completed: bool) -> Result<(), ShoppingListError> {
        self.item_mut(index)?.completed = completed;
        self.touch();
        Ok(())
    }

    /// Flip the completed flag of the item at `index`, returning the new value.
    pub fn toggle_item(&mut self, index: usize) -> Result<bool, ShoppingListError> {
        let item = self.item_mut(index)?;
        item.completed = !item.completed;
        let completed = item.completed;
        self.touch();
        Ok(completed)
    }

    /// Remove and return the item at `index`. Later items shift down.
    pub fn remove_item(&mut self, index: usize) -> Result<ShoppingItem, ShoppingListError> {
        let len = self.items.len();
        if index >= len {
            return Err(ShoppingListError::ItemOutOfRange { index, len });
        }
        let removed = self.items.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Drop every completed item. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.completed);
        let removed = before - self.items.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Share the list with another user. Inviting twice is a no-op.
    pub fn invite(&mut self, user_id: &str) -> Result<(), ShoppingListError> {
        if user_id == self.owner_id {
            return Err(ShoppingListError::OwnerCannotBeInvited);
        }
        if !self.invited_users.iter().any(|u| u == user_id) {
            self.invited_users.push(user_id.to_string());
            self.touch();
        }
        Ok(())
    }

    /// Stop sharing with `user_id`. Returns true if they had been invited.
    pub fn uninvite(&mut self, user_id: &str) -> bool {
        let before = self.invited_users.len();
        self.invited_users.retain(|u| u != user_id);
        let removed = self.invited_users.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Merge a recipe's ingredients into this list.
    ///
    /// The list's items are replaced by the merged items; the counts of
    /// added and combined lines are returned.
    pub fn merge_recipe(
        &mut self,
        ingredients: &[Ingredient],
        serving_multiplier: f64,
        user_id: &str,
    ) -> (usize, usize) {
        let items = std::mem::take(&mut self.items);
        let MergeResult {
            added_count,
            combined_count,
            updated_items,
        } = merge_recipe_into_list(ingredients, items, serving_multiplier, user_id);
        self.items = updated_items;
        self.touch();
        (added_count, combined_count)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with_items() -> ShoppingList {
        let mut list = ShoppingList::new("alice");
        list.add_item("milk", "1", "l", "alice").unwrap();
        list.add_item("eggs", "12", "", "alice").unwrap();
        list.add_item("bread", "", "", "bob").unwrap();
        list
    }

    #[test]
    fn test_shopping_list_new() {
        let list = ShoppingList::new("alice");
        assert_eq!(list.owner_id, "alice");
        assert!(list.items.is_empty());
        assert!(list.invited_users.is_empty());
    }

    #[test]
    fn test_add_item_trims_and_rejects_empty() {
        let mut list = ShoppingList::new("alice");
        let item = list.add_item("  Paper towels ", "2", " rolls", "alice").unwrap();
        assert_eq!(item.name, "Paper towels");
        assert_eq!(item.unit, "rolls");
        assert!(!item.completed);

        assert_eq!(
            list.add_item("   ", "1", "", "alice"),
            Err(ShoppingListError::EmptyItemName)
        );
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn test_toggle_and_set_completed() {
        let mut list = list_with_items();
        assert!(list.toggle_item(1).unwrap());
        assert!(list.items[1].completed);
        assert!(!list.toggle_item(1).unwrap());

        list.set_completed(0, true).unwrap();
        assert!(list.items[0].completed);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut list = list_with_items();
        assert_eq!(
            list.toggle_item(3),
            Err(ShoppingListError::ItemOutOfRange { index: 3, len: 3 })
        );
        assert!(list.remove_item(7).is_err());
        assert!(list.set_completed(3, true).is_err());
    }

    #[test]
    fn test_remove_item_shifts_positions() {
        let mut list = list_with_items();
        let removed = list.remove_item(0).unwrap();
        assert_eq!(removed.name, "milk");
        assert_eq!(list.items[0].name, "eggs");
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_clear_completed() {
        let mut list = list_with_items();
        list.set_completed(0, true).unwrap();
        list.set_completed(2, true).unwrap();

        assert_eq!(list.clear_completed(), 2);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name, "eggs");
        assert_eq!(list.clear_completed(), 0);
    }

    #[test]
    fn test_invite_and_uninvite() {
        let mut list = ShoppingList::new("alice");

        list.invite("bob").unwrap();
        list.invite("bob").unwrap();
        assert_eq!(list.invited_users, vec!["bob".to_string()]);

        assert_eq!(
            list.invite("alice"),
            Err(ShoppingListError::OwnerCannotBeInvited)
        );

        assert!(list.uninvite("bob"));
        assert!(!list.uninvite("bob"));
        assert!(list.invited_users.is_empty());
    }

    #[test]
    fn test_merge_recipe_replaces_items() {
        let mut list = list_with_items();
        list.set_completed(0, true).unwrap();

        let (added, combined) = list.merge_recipe(
            &[
                Ingredient::new("milk", "500", "ml"),
                Ingredient::new("flour", "2", "cups"),
            ],
            1.0,
            "bob",
        );

        assert_eq!((added, combined), (1, 1));
        assert_eq!(list.items.len(), 4);
        assert_eq!(list.items[0].amount, "1.5");
        assert_eq!(list.items[0].unit, "l");
        assert!(!list.items[0].completed);
        assert_eq!(list.items[3].name, "flour");
        assert_eq!(list.items[3].added_by, "bob");
    }

    #[test]
    fn test_shopping_item_json_uses_camel_case() {
        let item = ShoppingItem::new("milk", "1", "l", "alice");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["addedBy"], "alice");
        assert!(json.get("order").is_none());

        let parsed: ShoppingItem =
            serde_json::from_str(r#"{"name":"eggs","addedBy":"bob","order":3}"#).unwrap();
        assert_eq!(parsed.order, Some(3));
        assert_eq!(parsed.amount, "");
        assert!(!parsed.completed);
    }

    #[test]
    fn test_shopping_item_display() {
        let mut item = ShoppingItem::new("milk", "1", "l", "alice");
        assert!(item.to_string().starts_with("[ ] milk"));
        assert!(item.to_string().ends_with("1 l"));
        item.completed = true;
        assert!(item.to_string().starts_with("[x]"));
        assert_eq!(ShoppingItem::new("bread", "", "", "a").to_string(), "[ ] bread");
    }
}

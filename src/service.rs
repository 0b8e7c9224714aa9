//! Shopping list operations on top of the repositories.
//!
//! Each operation is a single read-modify-write of the caller's list: load
//! (or create) the list, mutate it in memory, save the whole item array.

use cookshare_core::ShoppingList;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{RecipeRepository, ShoppingListRepository};
use crate::error::AppError;

/// Result of adding a recipe to a shopping list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecipeOutcome {
    pub message: String,
    pub added_count: usize,
    pub combined_count: usize,
    pub recipe_name: String,
}

#[derive(Clone)]
pub struct ShoppingListService {
    recipes: RecipeRepository,
    lists: ShoppingListRepository,
}

impl ShoppingListService {
    pub fn new(recipes: RecipeRepository, lists: ShoppingListRepository) -> Self {
        Self { recipes, lists }
    }

    pub fn recipes(&self) -> &RecipeRepository {
        &self.recipes
    }

    /// The list `user_id` owns or shares, created on first use.
    pub async fn current_list(&self, user_id: &str) -> Result<ShoppingList, AppError> {
        Ok(self.lists.get_or_create_for_user(user_id).await?)
    }

    /// Merge a recipe's ingredients into the user's list.
    ///
    /// `servings` rescales the recipe from its own serving count.
    pub async fn add_recipe_to_list(
        &self,
        user_id: &str,
        recipe_id: Uuid,
        servings: Option<f64>,
    ) -> Result<AddRecipeOutcome, AppError> {
        let recipe = self
            .recipes
            .get_for_owner(recipe_id, user_id)
            .await?
            .ok_or_else(|| AppError::RecipeNotFound(recipe_id.to_string()))?;

        let multiplier = recipe.serving_multiplier(servings);
        let mut list = self.lists.get_or_create_for_user(user_id).await?;

        let (added_count, combined_count) =
            list.merge_recipe(&recipe.ingredients, multiplier, user_id);
        self.lists.save(&list).await?;

        tracing::info!(
            user = %user_id,
            recipe = %recipe.name,
            list_id = %list.id,
            multiplier,
            added_count,
            combined_count,
            "Added recipe to shopping list"
        );

        Ok(AddRecipeOutcome {
            message: format!(
                "Added {} new items and combined {} existing items from {}",
                added_count, combined_count, recipe.name
            ),
            added_count,
            combined_count,
            recipe_name: recipe.name,
        })
    }

    /// Append a manual item to the user's list.
    pub async fn add_item(
        &self,
        user_id: &str,
        name: &str,
        amount: &str,
        unit: &str,
    ) -> Result<ShoppingList, AppError> {
        let mut list = self.lists.get_or_create_for_user(user_id).await?;
        list.add_item(name, amount, unit, user_id)?;
        self.lists.save(&list).await?;
        tracing::debug!(user = %user_id, item = %name.trim(), "Added item");
        Ok(list)
    }

    /// Flip the completed flag of the item at `index`.
    pub async fn toggle_item(&self, user_id: &str, index: usize) -> Result<ShoppingList, AppError> {
        let mut list = self.lists.get_or_create_for_user(user_id).await?;
        list.toggle_item(index)?;
        self.lists.save(&list).await?;
        Ok(list)
    }

    /// Set the completed flag of the item at `index`.
    pub async fn set_completed(
        &self,
        user_id: &str,
        index: usize,
        completed: bool,
    ) -> Result<ShoppingList, AppError> {
        let mut list = self.lists.get_or_create_for_user(user_id).await?;
        list.set_completed(index, completed)?;
        self.lists.save(&list).await?;
        Ok(list)
    }

    pub async fn remove_item(&self, user_id: &str, index: usize) -> Result<ShoppingList, AppError> {
        let mut list = self.lists.get_or_create_for_user(user_id).await?;
        let removed = list.remove_item(index)?;
        self.lists.save(&list).await?;
        tracing::debug!(user = %user_id, item = %removed.name, index, "Removed item");
        Ok(list)
    }

    /// Drop completed items. Returns how many were removed.
    pub async fn clear_completed(&self, user_id: &str) -> Result<usize, AppError> {
        let mut list = self.lists.get_or_create_for_user(user_id).await?;
        let removed = list.clear_completed();
        if removed > 0 {
            self.lists.save(&list).await?;
        }
        Ok(removed)
    }

    /// Share the user's own list with `invitee`.
    pub async fn invite(&self, user_id: &str, invitee: &str) -> Result<ShoppingList, AppError> {
        let invitee = invitee.trim();
        if invitee.is_empty() {
            return Err(AppError::InvalidInput("User to invite cannot be empty".into()));
        }

        let mut list = self.lists.get_or_create_for_user(user_id).await?;
        if list.owner_id != user_id {
            return Err(AppError::Forbidden(
                "Only the list owner can invite users".into(),
            ));
        }
        list.invite(invitee)?;
        self.lists.save(&list).await?;
        tracing::info!(owner = %user_id, invitee = %invitee, "Shared shopping list");
        Ok(list)
    }

    /// Stop sharing the caller's list with `target`. The owner may remove
    /// anyone; an invited user may only remove themselves.
    pub async fn uninvite(&self, user_id: &str, target: &str) -> Result<ShoppingList, AppError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(AppError::InvalidInput("User to remove cannot be empty".into()));
        }

        let mut list = self.lists.get_or_create_for_user(user_id).await?;
        if list.owner_id != user_id && target != user_id {
            return Err(AppError::Forbidden(
                "Only the list owner can remove other users".into(),
            ));
        }
        if !list.uninvite(target) {
            return Err(AppError::InvalidInput(format!(
                "{} is not invited to this list",
                target
            )));
        }
        self.lists.save(&list).await?;
        tracing::info!(owner = %list.owner_id, removed = %target, by = %user_id, "Stopped sharing shopping list");
        Ok(list)
    }
}

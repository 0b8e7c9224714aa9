//! Shopping list CLI commands.
//!
//! Items are addressed by their 1-based position as printed by `list show`.

use clap::{Args, Subcommand};
use cookshare_core::ShoppingList;

use super::recipe::find_recipe;
use super::OutputFormat;
use crate::config::Config;
use crate::service::ShoppingListService;

#[derive(Args)]
pub struct ListCommand {
    #[command(subcommand)]
    pub command: ListSubcommand,
}

#[derive(Subcommand)]
pub enum ListSubcommand {
    /// Show your shopping list
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Merge a recipe's ingredients into the list
    AddRecipe {
        /// Recipe ID (UUID) or name
        recipe: String,

        /// Servings to shop for (scales the recipe's amounts)
        #[arg(long, short)]
        servings: Option<f64>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a manual item
    Add {
        /// Item name
        name: String,

        /// Amount (optional)
        #[arg(long, short, default_value = "")]
        amount: String,

        /// Unit (optional, e.g. "rolls", "bags")
        #[arg(long, short, default_value = "")]
        unit: String,
    },

    /// Mark an item as purchased
    Check {
        /// Item position
        position: usize,
    },

    /// Mark an item as not purchased
    Uncheck {
        /// Item position
        position: usize,
    },

    /// Remove an item
    Remove {
        /// Item position
        position: usize,
    },

    /// Remove all purchased items
    ClearCompleted,

    /// Share your list with another user
    Invite {
        /// User to invite
        user: String,
    },

    /// Stop sharing your list with a user, or leave a list you were invited to
    Uninvite {
        /// User to remove (your own name to leave)
        user: String,
    },
}

fn to_index(position: usize) -> Result<usize, Box<dyn std::error::Error>> {
    position
        .checked_sub(1)
        .ok_or_else(|| "Positions start at 1".into())
}

fn print_list(list: &ShoppingList) {
    if list.items.is_empty() {
        println!("Shopping list is empty");
    } else {
        for (i, item) in list.items.iter().enumerate() {
            println!("{:>3}. {}", i + 1, item);
        }
        let done = list.items.iter().filter(|i| i.completed).count();
        println!("\n{} item(s), {} completed", list.items.len(), done);
    }
    if !list.invited_users.is_empty() {
        println!("Shared with: {}", list.invited_users.join(", "));
    }
}

impl ListCommand {
    pub async fn run(
        &self,
        service: &ShoppingListService,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let user = config.user.value.as_str();

        match &self.command {
            ListSubcommand::Show { format } => {
                let list = service.current_list(user).await?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&list)?),
                    OutputFormat::Text => {
                        if list.owner_id != user {
                            println!("Shopping list of {}\n", list.owner_id);
                        }
                        print_list(&list);
                    }
                }
                Ok(())
            }

            ListSubcommand::AddRecipe {
                recipe,
                servings,
                format,
            } => {
                let recipe = find_recipe(service.recipes(), recipe, user).await?;
                let outcome = service
                    .add_recipe_to_list(user, recipe.id, *servings)
                    .await?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                    OutputFormat::Text => println!("{}", outcome.message),
                }
                Ok(())
            }

            ListSubcommand::Add { name, amount, unit } => {
                let list = service.add_item(user, name, amount, unit).await?;
                println!("Added '{}' at position {}", name.trim(), list.items.len());
                Ok(())
            }

            ListSubcommand::Check { position } => {
                let list = service.set_completed(user, to_index(*position)?, true).await?;
                println!("Checked: {}", list.items[*position - 1].name);
                Ok(())
            }

            ListSubcommand::Uncheck { position } => {
                let list = service
                    .set_completed(user, to_index(*position)?, false)
                    .await?;
                println!("Unchecked: {}", list.items[*position - 1].name);
                Ok(())
            }

            ListSubcommand::Remove { position } => {
                service.remove_item(user, to_index(*position)?).await?;
                println!("Removed item {}", position);
                Ok(())
            }

            ListSubcommand::ClearCompleted => {
                let removed = service.clear_completed(user).await?;
                println!("Removed {} completed item(s)", removed);
                Ok(())
            }

            ListSubcommand::Invite { user: invitee } => {
                service.invite(user, invitee).await?;
                println!("Shared shopping list with {}", invitee.trim());
                Ok(())
            }

            ListSubcommand::Uninvite { user: target } => {
                let list = service.uninvite(user, target).await?;
                if target.trim() == user {
                    println!("Left the shopping list of {}", list.owner_id);
                } else {
                    println!("Stopped sharing shopping list with {}", target.trim());
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1).unwrap(), 0);
        assert_eq!(to_index(4).unwrap(), 3);
        assert!(to_index(0).is_err());
    }
}

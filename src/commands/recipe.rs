use clap::{Args, Subcommand};
use cookshare_core::{Ingredient, Recipe};
use std::io::{self, Write};
use uuid::Uuid;

use super::OutputFormat;
use crate::config::Config;
use crate::db::RecipeRepository;

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// Create a new recipe
    Create {
        /// Name of the recipe
        name: String,

        /// Cooking instructions
        #[arg(long)]
        instructions: Option<String>,

        /// Number of servings the ingredient amounts are for
        #[arg(long)]
        servings: Option<i32>,

        /// Tags (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Image URL
        #[arg(long)]
        image_url: Option<String>,
    },

    /// List your recipes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Include recipes created by other users
        #[arg(long)]
        all: bool,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID (UUID) or name
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update an existing recipe
    Update {
        /// Recipe ID (UUID) or name
        identifier: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New instructions
        #[arg(long)]
        instructions: Option<String>,

        /// Number of servings
        #[arg(long)]
        servings: Option<i32>,

        /// Add a tag (can be repeated)
        #[arg(long = "add-tag", value_name = "TAG")]
        add_tags: Vec<String>,

        /// Remove a tag (can be repeated)
        #[arg(long = "remove-tag", value_name = "TAG")]
        remove_tags: Vec<String>,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID (UUID) or name
        identifier: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Add an ingredient to a recipe
    AddIngredient {
        /// Recipe ID (UUID) or name
        identifier: String,

        /// Ingredient name
        #[arg(long)]
        name: String,

        /// Amount, e.g. "2", "1.5" or "a pinch"
        #[arg(long, default_value = "")]
        amount: String,

        /// Unit of measurement
        #[arg(long, default_value = "")]
        unit: String,
    },

    /// Remove an ingredient from a recipe by name
    RemoveIngredient {
        /// Recipe ID (UUID) or name
        identifier: String,

        /// Ingredient name
        #[arg(long)]
        name: String,
    },
}

async fn lookup(
    repo: &RecipeRepository,
    identifier: &str,
    owner: &str,
) -> Result<Option<Recipe>, sqlx::Error> {
    match Uuid::parse_str(identifier) {
        Ok(uuid) => repo.get_by_id(uuid).await,
        Err(_) => repo.get_by_name_for_owner(identifier, owner).await,
    }
}

/// Look a recipe up by UUID, falling back to a case-insensitive match on
/// the names of `owner`'s recipes.
pub(crate) async fn find_recipe(
    repo: &RecipeRepository,
    identifier: &str,
    owner: &str,
) -> Result<Recipe, Box<dyn std::error::Error>> {
    lookup(repo, identifier, owner)
        .await?
        .ok_or_else(|| format!("Recipe not found: {}", identifier).into())
}

/// Like [`find_recipe`], but a name with no match among `owner`'s recipes
/// may resolve to another user's recipe.
async fn find_visible_recipe(
    repo: &RecipeRepository,
    identifier: &str,
    owner: &str,
) -> Result<Recipe, Box<dyn std::error::Error>> {
    let recipe = match lookup(repo, identifier, owner).await? {
        Some(recipe) => Some(recipe),
        None if Uuid::parse_str(identifier).is_err() => repo.get_by_name(identifier).await?,
        None => None,
    };

    recipe.ok_or_else(|| format!("Recipe not found: {}", identifier).into())
}

// Only the creator may change a recipe.
fn ensure_owner(recipe: &Recipe, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if recipe.created_by != config.user.value {
        return Err(format!(
            "Recipe '{}' belongs to {}, not {}",
            recipe.name, recipe.created_by, config.user.value
        )
        .into());
    }
    Ok(())
}

impl RecipeCommand {
    pub async fn run(
        &self,
        repo: &RecipeRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::Create {
                name,
                instructions,
                servings,
                tags,
                image_url,
            } => {
                if name.trim().is_empty() {
                    return Err("Recipe name cannot be empty".into());
                }

                let mut recipe = Recipe::new(name.trim(), &config.user.value);

                if let Some(instructions) = instructions {
                    recipe = recipe.with_instructions(instructions);
                }
                if let Some(servings) = servings {
                    if *servings <= 0 {
                        return Err("Servings must be a positive number".into());
                    }
                    recipe = recipe.with_servings(*servings);
                }
                if !tags.is_empty() {
                    recipe = recipe.with_tags(tags.clone());
                }
                recipe.image_url = image_url.clone();

                let created = repo.create(&recipe).await?;
                println!("Created recipe ({}):", created.id);
                println!("{}", created);
                Ok(())
            }

            RecipeSubcommand::List { format, all } => {
                let owner = if *all {
                    None
                } else {
                    Some(config.user.value.as_str())
                };
                let recipes = repo.list(owner).await?;

                if recipes.is_empty() {
                    println!("No recipes found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipes)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<36}  {:<30}  {:>11}  OWNER", "ID", "NAME", "INGREDIENTS");
                        println!("{}", "-".repeat(92));
                        for recipe in &recipes {
                            let name = if recipe.name.chars().count() > 30 {
                                format!("{}...", recipe.name.chars().take(27).collect::<String>())
                            } else {
                                recipe.name.clone()
                            };
                            println!(
                                "{:<36}  {:<30}  {:>11}  {}",
                                recipe.id,
                                name,
                                recipe.ingredients.len(),
                                recipe.created_by
                            );
                        }
                        println!("\nTotal: {} recipe(s)", recipes.len());
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { identifier, format } => {
                let recipe = find_visible_recipe(repo, identifier, &config.user.value).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipe)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", recipe);
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Update {
                identifier,
                name,
                instructions,
                servings,
                add_tags,
                remove_tags,
            } => {
                let has_updates = name.is_some()
                    || instructions.is_some()
                    || servings.is_some()
                    || !add_tags.is_empty()
                    || !remove_tags.is_empty();

                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let mut recipe = find_recipe(repo, identifier, &config.user.value).await?;
                ensure_owner(&recipe, config)?;

                if let Some(new_name) = name {
                    if new_name.trim().is_empty() {
                        return Err("Recipe name cannot be empty".into());
                    }
                    recipe.name = new_name.trim().to_string();
                }
                if let Some(new_instructions) = instructions {
                    recipe.instructions = new_instructions.clone();
                }
                if let Some(new_servings) = servings {
                    if *new_servings <= 0 {
                        return Err("Servings must be a positive number".into());
                    }
                    recipe.servings = Some(*new_servings);
                }
                for tag in add_tags {
                    if !recipe.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                        recipe.tags.push(tag.clone());
                    }
                }
                for tag in remove_tags {
                    recipe.tags.retain(|t| !t.eq_ignore_ascii_case(tag));
                }

                let updated = repo.update(&recipe).await?;
                println!("Updated recipe:");
                println!("{}", updated);
                Ok(())
            }

            RecipeSubcommand::Delete { identifier, force } => {
                let recipe = find_recipe(repo, identifier, &config.user.value).await?;
                ensure_owner(&recipe, config)?;

                if !force {
                    print!("Delete recipe '{}'? [y/N] ", recipe.name);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                repo.delete(recipe.id).await?;
                println!("Deleted recipe: {}", recipe.name);
                Ok(())
            }

            RecipeSubcommand::AddIngredient {
                identifier,
                name,
                amount,
                unit,
            } => {
                if name.trim().is_empty() {
                    return Err("Ingredient name cannot be empty".into());
                }

                let recipe = find_recipe(repo, identifier, &config.user.value).await?;
                ensure_owner(&recipe, config)?;

                let ingredient = Ingredient::new(name.trim(), amount.trim(), unit.trim());
                repo.add_ingredient(recipe.id, &ingredient).await?;

                println!("Added ingredient to '{}':", recipe.name);
                println!("  {}", ingredient);
                Ok(())
            }

            RecipeSubcommand::RemoveIngredient { identifier, name } => {
                let recipe = find_recipe(repo, identifier, &config.user.value).await?;
                ensure_owner(&recipe, config)?;

                match repo.remove_ingredient(recipe.id, name.trim()).await? {
                    0 => Err(format!("Ingredient '{}' not found in '{}'", name, recipe.name).into()),
                    _ => {
                        println!("Removed '{}' from '{}'", name.trim(), recipe.name);
                        Ok(())
                    }
                }
            }
        }
    }
}

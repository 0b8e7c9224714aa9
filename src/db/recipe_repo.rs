use chrono::Utc;
use cookshare_core::{Ingredient, Recipe};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use super::{decode_error, parse_timestamp};

#[derive(Clone)]
pub struct RecipeRepository {
    pool: SqlitePool,
}

// Row types for database queries
#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: String,
    name: String,
    instructions: String,
    servings: Option<i32>,
    tags: String,
    image_url: Option<String>,
    created_by: String,
    created_at: String,
    updated_at: String,
}

#[derive(sqlx::FromRow)]
struct IngredientRow {
    name: String,
    amount: String,
    unit: String,
}

impl RecipeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, recipe: &Recipe) -> Result<Recipe, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let id = recipe.id.to_string();
        let tags = serde_json::to_string(&recipe.tags).unwrap_or_else(|_| "[]".to_string());

        sqlx::query(
            r#"
            INSERT INTO recipes (id, name, instructions, servings, tags, image_url, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&recipe.name)
        .bind(&recipe.instructions)
        .bind(recipe.servings)
        .bind(&tags)
        .bind(&recipe.image_url)
        .bind(&recipe.created_by)
        .bind(recipe.created_at.to_rfc3339())
        .bind(recipe.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        Self::insert_ingredients(&mut tx, &id, &recipe.ingredients).await?;

        tx.commit().await?;

        self.get_by_id(recipe.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Recipe>, sqlx::Error> {
        let row: Option<RecipeRow> = sqlx::query_as("SELECT * FROM recipes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => self.hydrate_recipe(row).await.map(Some),
            None => Ok(None),
        }
    }

    /// Fetch a recipe only if `owner` created it.
    pub async fn get_for_owner(&self, id: Uuid, owner: &str) -> Result<Option<Recipe>, sqlx::Error> {
        let row: Option<RecipeRow> =
            sqlx::query_as("SELECT * FROM recipes WHERE id = ? AND created_by = ?")
                .bind(id.to_string())
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => self.hydrate_recipe(row).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Recipe>, sqlx::Error> {
        let row: Option<RecipeRow> =
            sqlx::query_as("SELECT * FROM recipes WHERE LOWER(name) = LOWER(?) ORDER BY created_at, id LIMIT 1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => self.hydrate_recipe(row).await.map(Some),
            None => Ok(None),
        }
    }

    /// Case-insensitive name lookup among `owner`'s recipes.
    pub async fn get_by_name_for_owner(
        &self,
        name: &str,
        owner: &str,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let row: Option<RecipeRow> = sqlx::query_as(
            "SELECT * FROM recipes WHERE LOWER(name) = LOWER(?) AND created_by = ? ORDER BY created_at, id LIMIT 1",
        )
        .bind(name)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => self.hydrate_recipe(row).await.map(Some),
            None => Ok(None),
        }
    }

    /// List recipes ordered by name, optionally only those of one owner.
    pub async fn list(&self, owner: Option<&str>) -> Result<Vec<Recipe>, sqlx::Error> {
        let rows: Vec<RecipeRow> = match owner {
            Some(owner) => {
                sqlx::query_as("SELECT * FROM recipes WHERE created_by = ? ORDER BY name")
                    .bind(owner)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM recipes ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let mut recipes = Vec::with_capacity(rows.len());
        for row in rows {
            recipes.push(self.hydrate_recipe(row).await?);
        }
        Ok(recipes)
    }

    pub async fn update(&self, recipe: &Recipe) -> Result<Recipe, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let id = recipe.id.to_string();
        let tags = serde_json::to_string(&recipe.tags).unwrap_or_else(|_| "[]".to_string());
        let updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            UPDATE recipes
            SET name = ?, instructions = ?, servings = ?, tags = ?, image_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&recipe.name)
        .bind(&recipe.instructions)
        .bind(recipe.servings)
        .bind(&tags)
        .bind(&recipe.image_url)
        .bind(&updated_at)
        .bind(&id)
        .execute(&mut *tx)
        .await?;

        // Replace ingredients
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        Self::insert_ingredients(&mut tx, &id, &recipe.ingredients).await?;

        tx.commit().await?;

        self.get_by_id(recipe.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        // CASCADE will handle ingredients
        sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Append an ingredient line after the existing ones.
    pub async fn add_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient: &Ingredient,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, position, name, amount, unit)
            VALUES (?, (SELECT COALESCE(MAX(position), -1) + 1 FROM recipe_ingredients WHERE recipe_id = ?), ?, ?, ?)
            "#,
        )
        .bind(recipe_id.to_string())
        .bind(recipe_id.to_string())
        .bind(&ingredient.name)
        .bind(&ingredient.amount)
        .bind(&ingredient.unit)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove ingredient lines by name (case-insensitive). Returns how many went.
    pub async fn remove_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_name: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM recipe_ingredients WHERE recipe_id = ? AND LOWER(name) = LOWER(?)",
        )
        .bind(recipe_id.to_string())
        .bind(ingredient_name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn insert_ingredients(
        tx: &mut Transaction<'_, Sqlite>,
        recipe_id: &str,
        ingredients: &[Ingredient],
    ) -> Result<(), sqlx::Error> {
        for (position, ingredient) in ingredients.iter().enumerate() {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, position, name, amount, unit) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(recipe_id)
            .bind(position as i64)
            .bind(&ingredient.name)
            .bind(&ingredient.amount)
            .bind(&ingredient.unit)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn hydrate_recipe(&self, row: RecipeRow) -> Result<Recipe, sqlx::Error> {
        let ingredients: Vec<IngredientRow> = sqlx::query_as(
            "SELECT name, amount, unit FROM recipe_ingredients WHERE recipe_id = ? ORDER BY position, id",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let tags: Vec<String> = serde_json::from_str(&row.tags).unwrap_or_default();

        Ok(Recipe {
            id: Uuid::parse_str(&row.id).map_err(decode_error)?,
            name: row.name,
            ingredients: ingredients
                .into_iter()
                .map(|i| Ingredient::new(i.name, i.amount, i.unit))
                .collect(),
            instructions: row.instructions,
            servings: row.servings,
            tags,
            image_url: row.image_url,
            created_by: row.created_by,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    struct TestContext {
        repo: RecipeRepository,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        TestContext {
            repo: RecipeRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_recipe() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let recipe = Recipe::new("Test Pasta", "user1")
            .with_ingredients(vec![
                Ingredient::new("pasta", "200", "g"),
                Ingredient::new("sauce", "1", "cup"),
                Ingredient::new("salt", "a pinch", ""),
            ])
            .with_instructions("Boil pasta. Add sauce.")
            .with_servings(2)
            .with_tags(vec!["italian".into(), "quick".into()]);

        let created = repo.create(&recipe).await.unwrap();
        assert_eq!(created.name, "Test Pasta");
        assert_eq!(created.ingredients, recipe.ingredients);

        let fetched = repo.get_by_id(recipe.id).await.unwrap().unwrap();
        assert_eq!(fetched.servings, Some(2));
        assert_eq!(fetched.tags, vec!["italian", "quick"]);
        assert_eq!(fetched.ingredients[2].amount, "a pinch");
    }

    #[tokio::test]
    async fn test_get_for_owner() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let recipe = Recipe::new("Chili", "alice");
        repo.create(&recipe).await.unwrap();

        assert!(repo
            .get_for_owner(recipe.id, "alice")
            .await
            .unwrap()
            .is_some());
        assert!(repo.get_for_owner(recipe.id, "bob").await.unwrap().is_none());
        assert!(repo
            .get_for_owner(Uuid::new_v4(), "alice")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_get_by_name_case_insensitive() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.create(&Recipe::new("Chicken Curry", "user1"))
            .await
            .unwrap();

        let found = repo.get_by_name("chicken curry").await.unwrap();
        assert_eq!(found.unwrap().name, "Chicken Curry");
        assert!(repo.get_by_name("CHICKEN CURRY").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_by_name_for_owner_picks_own_recipe() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let bobs = repo.create(&Recipe::new("Pancakes", "bob")).await.unwrap();
        let alices = repo
            .create(&Recipe::new("Pancakes", "alice"))
            .await
            .unwrap();

        let found = repo
            .get_by_name_for_owner("pancakes", "alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, alices.id);
        assert_eq!(found.created_by, "alice");

        let found = repo
            .get_by_name_for_owner("PANCAKES", "bob")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, bobs.id);

        assert!(repo
            .get_by_name_for_owner("pancakes", "carol")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_recipes() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.create(&Recipe::new("Recipe B", "alice")).await.unwrap();
        repo.create(&Recipe::new("Recipe A", "alice")).await.unwrap();
        repo.create(&Recipe::new("Recipe C", "bob")).await.unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Recipe A");
        assert_eq!(all[1].name, "Recipe B");

        let alice = repo.list(Some("alice")).await.unwrap();
        assert_eq!(alice.len(), 2);
    }

    #[tokio::test]
    async fn test_update_recipe() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let recipe = Recipe::new("Original Name", "user1")
            .with_ingredients(vec![Ingredient::new("item1", "1", "cup")]);
        let created = repo.create(&recipe).await.unwrap();

        let mut changed = created.clone();
        changed.name = "Updated Name".to_string();
        changed.servings = Some(6);
        changed.ingredients = vec![
            Ingredient::new("new_item1", "2", "cups"),
            Ingredient::new("new_item2", "3", "tbsp"),
        ];

        let updated = repo.update(&changed).await.unwrap();
        assert_eq!(updated.name, "Updated Name");
        assert_eq!(updated.servings, Some(6));
        assert_eq!(updated.ingredients.len(), 2);
        assert_eq!(updated.ingredients[0].name, "new_item1");
    }

    #[tokio::test]
    async fn test_delete_recipe_cascades() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let recipe = Recipe::new("To Delete", "user1")
            .with_ingredients(vec![Ingredient::new("item", "1", "")]);
        repo.create(&recipe).await.unwrap();

        repo.delete(recipe.id).await.unwrap();
        assert!(repo.get_by_id(recipe.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_and_remove_ingredient_keeps_order() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let recipe = Recipe::new("Test Recipe", "user1").with_ingredients(vec![
            Ingredient::new("keep", "1", ""),
            Ingredient::new("remove", "2", ""),
        ]);
        repo.create(&recipe).await.unwrap();

        repo.add_ingredient(recipe.id, &Ingredient::new("added", "5", "oz"))
            .await
            .unwrap();
        let removed = repo.remove_ingredient(recipe.id, "Remove").await.unwrap();
        assert_eq!(removed, 1);

        let fetched = repo.get_by_id(recipe.id).await.unwrap().unwrap();
        let names: Vec<&str> = fetched.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["keep", "added"]);
    }
}

use cookshare_core::{ShoppingItem, ShoppingList};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{decode_error, parse_timestamp};

/// Shopping lists stored as whole documents.
///
/// Items and invited users live in JSON columns and are always rewritten
/// in full. There is no version check: the last save wins.
#[derive(Clone)]
pub struct ShoppingListRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ShoppingListRow {
    id: String,
    owner_id: String,
    invited_users: String,
    items: String,
    created_at: String,
    updated_at: String,
}

impl ShoppingListRow {
    fn into_list(self) -> Result<ShoppingList, sqlx::Error> {
        let invited_users: Vec<String> =
            serde_json::from_str(&self.invited_users).map_err(decode_error)?;
        let items: Vec<ShoppingItem> = serde_json::from_str(&self.items).map_err(decode_error)?;

        Ok(ShoppingList {
            id: Uuid::parse_str(&self.id).map_err(decode_error)?,
            owner_id: self.owner_id,
            invited_users,
            items,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        })
    }
}

fn encode_error(e: serde_json::Error) -> sqlx::Error {
    sqlx::Error::Encode(Box::new(e))
}

impl ShoppingListRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, list: &ShoppingList) -> Result<(), sqlx::Error> {
        let invited_users = serde_json::to_string(&list.invited_users).map_err(encode_error)?;
        let items = serde_json::to_string(&list.items).map_err(encode_error)?;

        sqlx::query(
            r#"
            INSERT INTO shopping_lists (id, owner_id, invited_users, items, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(list.id.to_string())
        .bind(&list.owner_id)
        .bind(&invited_users)
        .bind(&items)
        .bind(list.created_at.to_rfc3339())
        .bind(list.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<ShoppingList>, sqlx::Error> {
        let row: Option<ShoppingListRow> =
            sqlx::query_as("SELECT * FROM shopping_lists WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(ShoppingListRow::into_list).transpose()
    }

    /// The oldest list `user_id` owns or has been invited to.
    pub async fn find_for_user(&self, user_id: &str) -> Result<Option<ShoppingList>, sqlx::Error> {
        let row: Option<ShoppingListRow> = sqlx::query_as(
            r#"
            SELECT * FROM shopping_lists
            WHERE owner_id = ?
               OR EXISTS (SELECT 1 FROM json_each(shopping_lists.invited_users) WHERE json_each.value = ?)
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShoppingListRow::into_list).transpose()
    }

    /// Find the user's list, creating an empty one they own if there is none.
    pub async fn get_or_create_for_user(&self, user_id: &str) -> Result<ShoppingList, sqlx::Error> {
        if let Some(list) = self.find_for_user(user_id).await? {
            return Ok(list);
        }

        let list = ShoppingList::new(user_id);
        self.create(&list).await?;
        tracing::info!(list_id = %list.id, owner = %user_id, "Created shopping list");
        Ok(list)
    }

    /// Overwrite the stored items and invited users with `list`'s.
    pub async fn save(&self, list: &ShoppingList) -> Result<(), sqlx::Error> {
        let invited_users = serde_json::to_string(&list.invited_users).map_err(encode_error)?;
        let items = serde_json::to_string(&list.items).map_err(encode_error)?;

        let result = sqlx::query(
            "UPDATE shopping_lists SET invited_users = ?, items = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&invited_users)
        .bind(&items)
        .bind(list.updated_at.to_rfc3339())
        .bind(list.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    struct TestContext {
        repo: ShoppingListRepository,
        _temp_dir: TempDir,
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        TestContext {
            repo: ShoppingListRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_get_or_create_creates_once() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let first = repo.get_or_create_for_user("alice").await.unwrap();
        let second = repo.get_or_create_for_user("alice").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.owner_id, "alice");
        assert!(second.items.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload_items() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let mut list = repo.get_or_create_for_user("alice").await.unwrap();
        list.add_item("milk", "1", "l", "alice").unwrap();
        list.add_item("eggs", "12", "", "alice").unwrap();
        list.toggle_item(1).unwrap();
        list.items[0].order = Some(2);
        repo.save(&list).await.unwrap();

        let loaded = repo.get_by_id(list.id).await.unwrap().unwrap();
        assert_eq!(loaded.items, list.items);
        assert!(loaded.items[1].completed);
        assert_eq!(loaded.items[0].order, Some(2));
    }

    #[tokio::test]
    async fn test_invited_user_finds_shared_list() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let mut list = repo.get_or_create_for_user("alice").await.unwrap();
        list.invite("bob").unwrap();
        repo.save(&list).await.unwrap();

        let bobs = repo.find_for_user("bob").await.unwrap().unwrap();
        assert_eq!(bobs.id, list.id);
        assert_eq!(bobs.owner_id, "alice");

        assert!(repo.find_for_user("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_unknown_list_fails() {
        let ctx = setup_repo().await;

        let list = ShoppingList::new("ghost");
        let result = ctx.repo.save(&list).await;
        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
    }
}

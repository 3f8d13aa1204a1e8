use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CredentialStore, RecipeRecord, RecipeStore, RecipeWithAuthor, UserRecord};

/// User persistence on Postgres. The recipe back-references live in a
/// `uuid[]` column mutated with single-statement array updates, so a
/// push or pull never races another writer.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> anyhow::Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, recipes
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .context("create user")?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, recipes
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, recipes
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn push_recipe(&self, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET recipes = array_append(recipes, $2)
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .context("append recipe to author list")?;
        anyhow::ensure!(
            result.rows_affected() == 1,
            "user {user_id} not found while appending recipe {recipe_id}"
        );
        Ok(())
    }

    async fn pull_recipe(&self, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET recipes = array_remove(recipes, $2)
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .context("remove recipe from author list")?;
        anyhow::ensure!(
            result.rows_affected() == 1,
            "user {user_id} not found while removing recipe {recipe_id}"
        );
        Ok(())
    }
}

/// Recipe persistence on Postgres.
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn create_recipe(
        &self,
        author: Uuid,
        title: &str,
        ingredients: &str,
        instructions: &str,
    ) -> anyhow::Result<RecipeRecord> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            INSERT INTO recipes (title, ingredients, instructions, author)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, ingredients, instructions, author
            "#,
        )
        .bind(title)
        .bind(ingredients)
        .bind(instructions)
        .bind(author)
        .fetch_one(&self.pool)
        .await
        .context("create recipe")?;
        Ok(recipe)
    }

    async fn find_recipe(&self, id: Uuid) -> anyhow::Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            SELECT id, title, ingredients, instructions, author
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find recipe")?;
        Ok(recipe)
    }

    async fn find_recipe_with_author(&self, id: Uuid) -> anyhow::Result<Option<RecipeWithAuthor>> {
        let recipe = sqlx::query_as::<_, RecipeWithAuthor>(
            r#"
            SELECT r.id, r.title, r.ingredients, r.instructions, r.author,
                   u.username AS author_username
            FROM recipes r
            JOIN users u ON u.id = r.author
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find recipe with author")?;
        Ok(recipe)
    }

    async fn list_recipes(&self) -> anyhow::Result<Vec<RecipeWithAuthor>> {
        let recipes = sqlx::query_as::<_, RecipeWithAuthor>(
            r#"
            SELECT r.id, r.title, r.ingredients, r.instructions, r.author,
                   u.username AS author_username
            FROM recipes r
            JOIN users u ON u.id = r.author
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list recipes")?;
        Ok(recipes)
    }

    async fn recipe_ids_by_author(&self, author: Uuid) -> anyhow::Result<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM recipes
            WHERE author = $1
            "#,
        )
        .bind(author)
        .fetch_all(&self.pool)
        .await
        .context("list recipe ids by author")?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn update_recipe(
        &self,
        id: Uuid,
        title: &str,
        ingredients: &str,
        instructions: &str,
    ) -> anyhow::Result<RecipeRecord> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            UPDATE recipes
            SET title = $2, ingredients = $3, instructions = $4
            WHERE id = $1
            RETURNING id, title, ingredients, instructions, author
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(ingredients)
        .bind(instructions)
        .fetch_one(&self.pool)
        .await
        .context("update recipe")?;
        Ok(recipe)
    }

    async fn delete_recipe(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .context("delete recipe")?;
        Ok(())
    }
}

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// User record as persisted: credentials plus the ids of the recipes the
/// user authored.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub recipes: Vec<Uuid>,
}

/// Recipe record as persisted. `author` references an existing user at
/// creation time and never changes afterwards.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
    pub author: Uuid,
}

/// A recipe row joined with its author's username, for the read
/// endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
    pub author: Uuid,
    pub author_username: String,
}

/// Persistence for users and their recipe back-references.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a new user with an empty recipe list. The store assigns
    /// the id.
    async fn create_user(&self, username: &str, password_hash: &str)
        -> anyhow::Result<UserRecord>;

    /// Exact, case-sensitive username lookup.
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<UserRecord>>;

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRecord>>;

    /// Append a recipe id to the user's list in one store operation.
    async fn push_recipe(&self, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<()>;

    /// Remove a recipe id from the user's list in one store operation.
    async fn pull_recipe(&self, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<()>;
}

/// Persistence for recipes.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn create_recipe(
        &self,
        author: Uuid,
        title: &str,
        ingredients: &str,
        instructions: &str,
    ) -> anyhow::Result<RecipeRecord>;

    async fn find_recipe(&self, id: Uuid) -> anyhow::Result<Option<RecipeRecord>>;

    /// Lookup with the author's username joined in.
    async fn find_recipe_with_author(&self, id: Uuid) -> anyhow::Result<Option<RecipeWithAuthor>>;

    async fn list_recipes(&self) -> anyhow::Result<Vec<RecipeWithAuthor>>;

    /// Ids of every recipe with this author.
    async fn recipe_ids_by_author(&self, author: Uuid) -> anyhow::Result<Vec<Uuid>>;

    /// Overwrite the three content fields. Ownership is the caller's
    /// concern; the record must exist.
    async fn update_recipe(
        &self,
        id: Uuid,
        title: &str,
        ingredients: &str,
        instructions: &str,
    ) -> anyhow::Result<RecipeRecord>;

    async fn delete_recipe(&self, id: Uuid) -> anyhow::Result<()>;
}

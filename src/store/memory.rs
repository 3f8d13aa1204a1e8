//! In-memory implementation of both store traits, used by the test
//! suites in place of a running database.

use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CredentialStore, RecipeRecord, RecipeStore, RecipeWithAuthor, UserRecord};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, UserRecord>,
    recipes: HashMap<Uuid, RecipeRecord>,
}

/// Both collections behind a single lock, so a push or pull of a
/// back-reference is as atomic here as a single-statement array update
/// is on Postgres.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.collections.lock().await.users.len()
    }

    pub async fn recipe_count(&self) -> usize {
        self.collections.lock().await.recipes.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> anyhow::Result<UserRecord> {
        let user = UserRecord {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            recipes: Vec::new(),
        };
        self.collections
            .lock()
            .await
            .users
            .insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<UserRecord>> {
        let collections = self.collections.lock().await;
        Ok(collections
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRecord>> {
        Ok(self.collections.lock().await.users.get(&id).cloned())
    }

    async fn push_recipe(&self, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<()> {
        let mut collections = self.collections.lock().await;
        let user = collections
            .users
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("user {user_id} not found while appending recipe {recipe_id}"))?;
        user.recipes.push(recipe_id);
        Ok(())
    }

    async fn pull_recipe(&self, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<()> {
        let mut collections = self.collections.lock().await;
        let user = collections
            .users
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("user {user_id} not found while removing recipe {recipe_id}"))?;
        user.recipes.retain(|id| *id != recipe_id);
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn create_recipe(
        &self,
        author: Uuid,
        title: &str,
        ingredients: &str,
        instructions: &str,
    ) -> anyhow::Result<RecipeRecord> {
        let recipe = RecipeRecord {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            ingredients: ingredients.to_owned(),
            instructions: instructions.to_owned(),
            author,
        };
        self.collections
            .lock()
            .await
            .recipes
            .insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn find_recipe(&self, id: Uuid) -> anyhow::Result<Option<RecipeRecord>> {
        Ok(self.collections.lock().await.recipes.get(&id).cloned())
    }

    async fn find_recipe_with_author(&self, id: Uuid) -> anyhow::Result<Option<RecipeWithAuthor>> {
        let collections = self.collections.lock().await;
        collections
            .recipes
            .get(&id)
            .map(|recipe| join_author(&collections, recipe))
            .transpose()
    }

    async fn list_recipes(&self) -> anyhow::Result<Vec<RecipeWithAuthor>> {
        let collections = self.collections.lock().await;
        collections
            .recipes
            .values()
            .map(|recipe| join_author(&collections, recipe))
            .collect()
    }

    async fn recipe_ids_by_author(&self, author: Uuid) -> anyhow::Result<Vec<Uuid>> {
        let collections = self.collections.lock().await;
        Ok(collections
            .recipes
            .values()
            .filter(|r| r.author == author)
            .map(|r| r.id)
            .collect())
    }

    async fn update_recipe(
        &self,
        id: Uuid,
        title: &str,
        ingredients: &str,
        instructions: &str,
    ) -> anyhow::Result<RecipeRecord> {
        let mut collections = self.collections.lock().await;
        let recipe = collections
            .recipes
            .get_mut(&id)
            .ok_or_else(|| anyhow!("recipe {id} not found for update"))?;
        recipe.title = title.to_owned();
        recipe.ingredients = ingredients.to_owned();
        recipe.instructions = instructions.to_owned();
        Ok(recipe.clone())
    }

    async fn delete_recipe(&self, id: Uuid) -> anyhow::Result<()> {
        self.collections.lock().await.recipes.remove(&id);
        Ok(())
    }
}

fn join_author(collections: &Collections, recipe: &RecipeRecord) -> anyhow::Result<RecipeWithAuthor> {
    let author = collections
        .users
        .get(&recipe.author)
        .ok_or_else(|| anyhow!("recipe {} references missing author {}", recipe.id, recipe.author))?;
    Ok(RecipeWithAuthor {
        id: recipe.id,
        title: recipe.title.clone(),
        ingredients: recipe.ingredients.clone(),
        instructions: recipe.instructions.clone(),
        author: recipe.author,
        author_username: author.username.clone(),
    })
}

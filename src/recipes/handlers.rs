use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    recipes::dto::{RecipePayload, RecipeResponse},
    state::AppState,
    store::RecipeRecord,
};

fn parse_recipe_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation("malformed recipe id".into()))
}

/// `GET /recipes`: every recipe with its author expanded. Public.
#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let recipes = state.recipes.list_recipes().await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

/// `GET /recipes/:id`. Public.
#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let id = parse_recipe_id(&id)?;
    let recipe = state
        .recipes
        .find_recipe_with_author(id)
        .await?
        .ok_or(ApiError::NotFound("recipe not found"))?;
    Ok(Json(recipe.into()))
}

/// `POST /recipes`: persist a recipe, then append its id to the author's
/// list. The two writes are separate store calls; if the append fails
/// the request fails and the recipe stays behind without a
/// back-reference.
#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> Result<Json<RecipeRecord>, ApiError> {
    let Json(payload) = payload?;

    // The token subject must still exist; a missing record here means a
    // token outlived its user.
    let author = state
        .users
        .find_user_by_id(user.id)
        .await?
        .ok_or_else(|| {
            ApiError::Store(anyhow::anyhow!("token subject {} has no user record", user.id))
        })?;

    let recipe = state
        .recipes
        .create_recipe(
            author.id,
            &payload.title,
            &payload.ingredients,
            &payload.instructions,
        )
        .await?;
    state.users.push_recipe(author.id, recipe.id).await?;

    info!(recipe_id = %recipe.id, author = %author.id, "recipe created");
    Ok(Json(recipe))
}

/// `PUT /recipes/:id`: author-only full overwrite of the content fields.
#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> Result<Json<RecipeRecord>, ApiError> {
    let id = parse_recipe_id(&id)?;
    let Json(payload) = payload?;

    let existing = state
        .recipes
        .find_recipe(id)
        .await?
        .ok_or(ApiError::NotFound("recipe not found"))?;
    if existing.author != user.id {
        warn!(recipe_id = %id, caller = %user.id, "update rejected: not the author");
        return Err(ApiError::Forbidden);
    }

    let updated = state
        .recipes
        .update_recipe(id, &payload.title, &payload.ingredients, &payload.instructions)
        .await?;

    info!(recipe_id = %id, "recipe updated");
    Ok(Json(updated))
}

/// `DELETE /recipes/:id`: author-only. The author's back-reference goes
/// first, then the record itself; the response body is the deleted id.
#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
) -> Result<Json<Uuid>, ApiError> {
    let id = parse_recipe_id(&id)?;

    let recipe = state
        .recipes
        .find_recipe(id)
        .await?
        .ok_or(ApiError::NotFound("recipe not found"))?;
    if recipe.author != user.id {
        warn!(recipe_id = %id, caller = %user.id, "delete rejected: not the author");
        return Err(ApiError::Forbidden);
    }

    state.users.pull_recipe(recipe.author, id).await?;
    state.recipes.delete_recipe(id).await?;

    info!(recipe_id = %id, author = %recipe.author, "recipe deleted");
    Ok(Json(id))
}

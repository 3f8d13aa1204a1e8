use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::RecipeWithAuthor;

/// Body of `POST /recipes` and `PUT /recipes/:id`. An update overwrites
/// all three fields; there is no partial merge.
#[derive(Debug, Deserialize)]
pub struct RecipePayload {
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeAuthor {
    pub id: Uuid,
    pub username: String,
}

/// A recipe as the read endpoints expose it, author expanded to id plus
/// username and nothing else.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
    pub author: RecipeAuthor,
}

impl From<RecipeWithAuthor> for RecipeResponse {
    fn from(row: RecipeWithAuthor) -> Self {
        Self {
            id: row.id,
            title: row.title,
            ingredients: row.ingredients,
            instructions: row.instructions,
            author: RecipeAuthor {
                id: row.author,
                username: row.author_username,
            },
        }
    }
}

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::register))
        .route("/users/login", post(handlers::login))
        .route("/users/recipes", get(handlers::own_recipes))
}

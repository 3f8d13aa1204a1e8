use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use recipebox::{
    app::build_app,
    auth::{jwt::JwtKeys, password},
    config::AppConfig,
    state::AppState,
    store::{memory::MemoryStore, CredentialStore, RecipeStore},
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";

/// The full router wired to a fresh in-memory store, plus direct handles
/// for seeding and inspecting that store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub keys: JwtKeys,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let config = Arc::new(AppConfig {
        database_url: String::new(),
        token_secret: TEST_SECRET.to_string(),
    });
    let state = AppState::from_parts(store.clone(), store.clone(), config);
    TestApp {
        router: build_app(state),
        store,
        keys: JwtKeys::from_secret(TEST_SECRET),
    }
}

impl TestApp {
    /// Seed a user the way registration would, returning its id.
    pub async fn seed_user(&self, username: &str, password: &str) -> Uuid {
        let hash = password::hash_password(password).expect("hash password");
        self.store
            .create_user(username, &hash)
            .await
            .expect("seed user")
            .id
    }

    /// Seed a recipe and its author back-reference, the way create would.
    pub async fn seed_recipe(
        &self,
        author: Uuid,
        title: &str,
        ingredients: &str,
        instructions: &str,
    ) -> Uuid {
        let recipe = self
            .store
            .create_recipe(author, title, ingredients, instructions)
            .await
            .expect("seed recipe");
        self.store
            .push_recipe(author, recipe.id)
            .await
            .expect("push recipe id");
        recipe.id
    }

    /// A token the service itself would accept for this user.
    pub fn token_for(&self, user_id: Uuid, username: &str) -> String {
        self.keys.issue(user_id, username).expect("issue token")
    }

    /// A well-formed token signed with the wrong secret.
    pub fn foreign_token(&self, user_id: Uuid, username: &str) -> String {
        JwtKeys::from_secret("some-other-secret")
            .issue(user_id, username)
            .expect("issue token")
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("route request")
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("encode body")))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    }
}

pub async fn body_json(res: Response<Body>) -> Value {
    let bytes = res
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse body as json")
}

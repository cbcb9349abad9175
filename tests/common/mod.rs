use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use openschool::router::init_router;
use openschool::state::AppState;
use openschool_auth::{SecretVerifier, issue_token};
use openschool_cli::seeder::seed_fixtures;
use openschool_config::{AuthConfig, CorsConfig};
use openschool_db::MemoryStore;
use serde_json::Value;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";
pub const TEST_AUDIENCE: &str = "openschool";
pub const TEST_ISSUER: &str = "https://openschool.test/";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        domain: None,
        audience: Some(TEST_AUDIENCE.to_string()),
        issuer: Some(TEST_ISSUER.to_string()),
        jwks_cache_ttl: 600,
        secret: Some(TEST_SECRET.to_string()),
    }
}

/// App over an empty in-memory store.
pub fn empty_app() -> Router {
    app_with_store(Arc::new(MemoryStore::new()))
}

/// App over the fixture data: schools 1 and 2, students 1-2 in school 1 and
/// 3-4 in school 2.
pub async fn seeded_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    seed_fixtures(store.as_ref()).await.unwrap();
    app_with_store(store)
}

pub fn app_with_store(store: Arc<MemoryStore>) -> Router {
    let verifier = Arc::new(SecretVerifier::new(
        TEST_SECRET,
        Some(TEST_AUDIENCE),
        Some(TEST_ISSUER),
    ));
    let state = AppState::new(store, verifier, CorsConfig::from_lookup(|_| None));
    init_router(state, None)
}

/// A valid token granting `scopes` (space separated).
pub fn token(scopes: &str) -> String {
    let scopes: Vec<String> = scopes.split_whitespace().map(str::to_string).collect();
    issue_token("auth0|tester", &scopes, 3600, &auth_config()).unwrap()
}

#[allow(dead_code)]
pub fn superintendent() -> String {
    token("get:students post:school modify:school")
}

pub fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

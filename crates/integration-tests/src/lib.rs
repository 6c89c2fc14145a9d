//! Integration tests for Corner Shop.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a disposable database; migrations run automatically
//! export STOREFRONT_DATABASE_URL=postgres://localhost/corner_shop_test
//!
//! # Run integration tests
//! cargo test -p corner-shop-integration-tests -- --ignored
//! ```
//!
//! Every test creates its own users and products with unique names, so the
//! suite can share one database and run in parallel.

#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use secrecy::SecretString;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use corner_shop_core::forms::{CheckoutInput, ProductInput};
use corner_shop_core::{Role, Viewer};
use corner_shop_storefront::config::StorefrontConfig;
use corner_shop_storefront::db;
use corner_shop_storefront::models::{Product, User};
use corner_shop_storefront::services::{AuthService, CatalogService};
use corner_shop_storefront::state::AppState;

/// Password used for every account the tests create.
pub const TEST_PASSWORD: &str = "Corner!shop1";

/// A connected, migrated database plus helpers to populate it.
pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) and migrate.
    pub async fn new() -> Self {
        let url = std::env::var("STOREFRONT_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("STOREFRONT_DATABASE_URL must be set for integration tests");

        let pool = db::create_pool(&SecretString::from(url))
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("../storefront/migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Self { pool }
    }

    /// Create an account with a unique username starting with `prefix`.
    pub async fn user(&self, prefix: &str, role: Role) -> User {
        AuthService::new(&self.pool)
            .create_user(&unique_name(prefix), None, TEST_PASSWORD, role)
            .await
            .expect("Failed to create test user")
    }

    /// Add a product as `owner`.
    pub async fn product(&self, owner: &User, price: &str) -> Product {
        CatalogService::new(&self.pool)
            .create(Some(owner.viewer()), &product_input(&unique_name("item"), price))
            .await
            .expect("Failed to create test product")
    }

    /// The full router, backed by this context's pool.
    pub fn app(&self) -> Router {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_DATABASE_URL" => Some("postgres://unused".to_owned()),
            "STOREFRONT_BASE_URL" => Some("http://localhost:3000".to_owned()),
            _ => None,
        })
        .expect("test config is valid");

        corner_shop_storefront::app(AppState::new(config, self.pool.clone()))
    }
}

/// `prefix` plus a random suffix, valid as a username.
pub fn unique_name(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", suffix.get(..12).unwrap_or(&suffix))
}

/// A product form with the given name and price.
pub fn product_input(name: &str, price: &str) -> ProductInput {
    ProductInput {
        name: name.to_owned(),
        price: price.to_owned(),
        category: "Test".to_owned(),
        availability: Some("in_stock".to_owned()),
        description: None,
        image_url: None,
    }
}

/// A checkout form that passes validation.
pub fn checkout_input() -> CheckoutInput {
    CheckoutInput {
        full_name: "Jamie Doe".to_owned(),
        address: "1 High Street".to_owned(),
        phone: "0123456789".to_owned(),
        payment_method: Some("cod".to_owned()),
        accept_terms: Some("on".to_owned()),
    }
}

/// Shorthand for a logged-in caller.
pub fn viewer(user: &User) -> Option<Viewer> {
    Some(user.viewer())
}

// ============================================================================
// HTTP helpers
// ============================================================================

/// Send one request through the router. Requests carry a client IP so the
/// auth rate limiter can key them.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router is infallible")
}

/// Build a form POST, optionally with a session cookie.
pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-forwarded-for", "198.51.100.77");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

/// Build a GET, optionally with a session cookie.
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// The `name=value` part of the response's session cookie.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(corner_shop_storefront::middleware::SESSION_COOKIE_NAME))
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

/// Read a JSON response body.
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

//! HTTP route handlers for storefront.
//!
//! Form bodies in, JSON out.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Latest products
//! GET  /shop                   - Whole catalog plus latest products
//!
//! # Products
//! GET  /products/{id}          - Product detail
//! POST /products               - Create (owner/admin)
//! POST /products/{id}          - Update (creator/admin)
//! POST /products/{id}/delete   - Delete (creator/admin)
//!
//! # Cart (customers)
//! GET  /cart                   - Cart with totals
//! POST /cart/add/{product_id}  - Add one unit
//! GET  /cart/count             - Cart badge
//!
//! # Checkout (customers)
//! GET  /checkout               - Price preview
//! POST /checkout               - Place order
//! GET  /checkout/confirmation  - Most recent order
//!
//! # Orders
//! GET  /orders                 - Role-scoped order history
//!
//! # Auth (rate limited)
//! GET  /auth/login             - Session status
//! POST /auth/login             - Login action
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::status).post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create))
        .route("/{id}", get(products::show).post(products::update))
        .route("/{id}/delete", post(products::delete))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{product_id}", post(cart::add))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::summary).post(checkout::place_order))
        .route("/confirmation", get(checkout::confirmation))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/shop", get(home::shop))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/orders", get(orders::history))
        .nest("/auth", auth_routes())
}

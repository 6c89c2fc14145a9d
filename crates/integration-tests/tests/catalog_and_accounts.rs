//! Integration tests for product management and accounts.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `STOREFRONT_DATABASE_URL`.

use corner_shop_core::forms::SignupInput;
use corner_shop_core::{AccessError, Role};
use corner_shop_integration_tests::{
    TEST_PASSWORD, TestContext, product_input, unique_name, viewer,
};
use corner_shop_storefront::services::{AuthError, AuthService, CatalogService, ShopError};

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_other_owner_cannot_edit_or_delete() {
    let ctx = TestContext::new().await;
    let creator = ctx.user("creator", Role::Owner).await;
    let rival = ctx.user("rival", Role::Owner).await;
    let product = ctx.product(&creator, "12.00").await;

    let catalog = CatalogService::new(&ctx.pool);
    let err = catalog
        .update(viewer(&rival), product.id, &product_input("Hijacked", "1.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::Access(AccessError::Forbidden(_))));

    let err = catalog.delete(viewer(&rival), product.id).await.unwrap_err();
    assert!(matches!(err, ShopError::Access(AccessError::Forbidden(_))));

    // Unchanged
    let stored = catalog.detail(product.id).await.unwrap();
    assert_eq!(stored.name, product.name);
    assert_eq!(stored.price, product.price);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_admin_can_delete_any_product() {
    let ctx = TestContext::new().await;
    let admin = ctx.user("admin", Role::Admin).await;
    let creator = ctx.user("creator", Role::Owner).await;
    let product = ctx.product(&creator, "12.00").await;

    let catalog = CatalogService::new(&ctx.pool);
    catalog.delete(viewer(&admin), product.id).await.unwrap();

    let err = catalog.detail(product.id).await.unwrap_err();
    assert!(matches!(err, ShopError::NotFound("product")));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_customer_cannot_create_product() {
    let ctx = TestContext::new().await;
    let shopper = ctx.user("shopper", Role::EndUser).await;

    let err = CatalogService::new(&ctx.pool)
        .create(viewer(&shopper), &product_input("Nope", "1.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::Access(AccessError::Forbidden(_))));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_new_product_leads_latest_list() {
    let ctx = TestContext::new().await;
    let owner = ctx.user("owner", Role::Owner).await;
    let product = ctx.product(&owner, "2.50").await;

    let home = CatalogService::new(&ctx.pool)
        .home(viewer(&owner))
        .await
        .unwrap();
    assert_eq!(home.first().map(|p| p.id), Some(product.id));
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_duplicate_username_is_a_validation_error() {
    let ctx = TestContext::new().await;
    let existing = ctx.user("taken", Role::EndUser).await;

    let err = AuthService::new(&ctx.pool)
        .register(&SignupInput {
            username: existing.username.clone(),
            email: None,
            password1: TEST_PASSWORD.to_owned(),
            password2: TEST_PASSWORD.to_owned(),
            user_type: "enduser".to_owned(),
        })
        .await
        .unwrap_err();
    let AuthError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(
        errors.for_field("username"),
        vec!["A user with that username already exists."]
    );
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_register_then_login() {
    let ctx = TestContext::new().await;
    let username = unique_name("newbie");

    let auth = AuthService::new(&ctx.pool);
    let user = auth
        .register(&SignupInput {
            username: username.clone(),
            email: Some("newbie@example.com".to_owned()),
            password1: TEST_PASSWORD.to_owned(),
            password2: TEST_PASSWORD.to_owned(),
            user_type: "owner".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(user.role, Role::Owner);

    let logged_in = auth.login(&username, TEST_PASSWORD).await.unwrap();
    assert_eq!(logged_in.id, user.id);

    let err = auth.login(&username, "Wrong!pass1").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

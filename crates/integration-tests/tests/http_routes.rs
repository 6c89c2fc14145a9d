//! Integration tests that drive the full router, sessions included.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `STOREFRONT_DATABASE_URL`.

use axum::http::StatusCode;
use corner_shop_core::Role;
use corner_shop_integration_tests::{
    TestContext, get, json_body, post_form, send, session_cookie, unique_name,
};

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;
    let app = ctx.app();

    assert_eq!(send(&app, get("/health", None)).await.status(), StatusCode::OK);
    assert_eq!(
        send(&app, get("/health/ready", None)).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_anonymous_cart_redirects_to_login() {
    let ctx = TestContext::new().await;
    let response = send(&ctx.app(), get("/cart", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/auth/login");
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_login_add_to_cart_and_checkout() {
    let ctx = TestContext::new().await;
    let app = ctx.app();
    let owner = ctx.user("owner", Role::Owner).await;
    let shopper = ctx.user("shopper", Role::EndUser).await;
    let product = ctx.product(&owner, "10.00").await;

    let login = send(
        &app,
        post_form(
            "/auth/login",
            &format!("username={}&password=Corner%21shop1", shopper.username),
            None,
        ),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = session_cookie(&login).expect("login sets a session cookie");

    let added = send(
        &app,
        post_form(&format!("/cart/add/{}", product.id), "", Some(&cookie)),
    )
    .await;
    assert_eq!(added.status(), StatusCode::OK);

    let count = json_body(send(&app, get("/cart/count", Some(&cookie))).await).await;
    assert_eq!(count["count"], 1);

    let placed = send(
        &app,
        post_form(
            "/checkout",
            "full_name=Jamie+Doe&address=1+High+Street&phone=0123456789&payment_method=cod&accept_terms=on",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(placed.status(), StatusCode::CREATED);
    let order = json_body(placed).await;
    assert_eq!(order["total_price"], "60.00");
    assert_eq!(order["items"].as_array().map(Vec::len), Some(1));

    let history = json_body(send(&app, get("/orders", Some(&cookie))).await).await;
    assert_eq!(history[0]["id"], order["id"]);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_invalid_checkout_form_lists_errors() {
    let ctx = TestContext::new().await;
    let app = ctx.app();

    let register = send(
        &app,
        post_form(
            "/auth/register",
            &format!(
                "username={}&password1=Corner%21shop1&password2=Corner%21shop1&user_type=enduser",
                unique_name("fresh")
            ),
            None,
        ),
    )
    .await;
    assert_eq!(register.status(), StatusCode::CREATED);
    let cookie = session_cookie(&register).expect("registration logs in");

    let owner = ctx.user("owner", Role::Owner).await;
    let product = ctx.product(&owner, "1.00").await;
    send(
        &app,
        post_form(&format!("/cart/add/{}", product.id), "", Some(&cookie)),
    )
    .await;

    let response = send(
        &app,
        post_form("/checkout", "full_name=&address=&phone=", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    for field in ["full_name", "address", "phone", "payment_method", "accept_terms"] {
        assert!(fields.contains(&field), "missing error for {field}");
    }
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_bad_password_is_unauthorized() {
    let ctx = TestContext::new().await;
    let shopper = ctx.user("shopper", Role::EndUser).await;

    let response = send(
        &ctx.app(),
        post_form(
            "/auth/login",
            &format!("username={}&password=nope", shopper.username),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

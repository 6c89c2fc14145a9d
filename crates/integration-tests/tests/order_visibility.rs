//! Integration tests for role-scoped order history.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `STOREFRONT_DATABASE_URL`.

use corner_shop_core::{ProductId, Role, UserId};
use corner_shop_integration_tests::{TestContext, checkout_input, viewer};
use corner_shop_storefront::models::{OrderWithLines, User};
use corner_shop_storefront::services::{
    CartService, CatalogService, CheckoutService, OrderHistoryService,
};

async fn place_order(
    ctx: &TestContext,
    shopper: &User,
    products: &[ProductId],
) -> OrderWithLines {
    let carts = CartService::new(&ctx.pool);
    for id in products {
        carts.add(viewer(shopper), *id).await.unwrap();
    }
    CheckoutService::new(&ctx.pool)
        .checkout(viewer(shopper), &checkout_input())
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_owner_sees_only_own_lines_of_mixed_order() {
    let ctx = TestContext::new().await;
    let alice = ctx.user("alice", Role::Owner).await;
    let bob = ctx.user("bob", Role::Owner).await;
    let shopper = ctx.user("shopper", Role::EndUser).await;
    let lamp = ctx.product(&alice, "20.00").await;
    let mug = ctx.product(&bob, "8.00").await;

    let order = place_order(&ctx, &shopper, &[lamp.id, mug.id]).await;
    assert_eq!(order.items.len(), 2);

    let history = OrderHistoryService::new(&ctx.pool);

    let for_alice = history.history(viewer(&alice)).await.unwrap();
    let seen = for_alice
        .iter()
        .find(|o| o.order.id == order.order.id)
        .expect("alice sees the order");
    assert_eq!(seen.items.len(), 1);
    assert_eq!(seen.items[0].product_id, Some(lamp.id));
    assert!(
        for_alice
            .iter()
            .flat_map(|o| &o.items)
            .all(|l| l.product_added_by == Some(alice.id))
    );

    let for_bob = history.history(viewer(&bob)).await.unwrap();
    let seen = for_bob
        .iter()
        .find(|o| o.order.id == order.order.id)
        .expect("bob sees the order");
    assert_eq!(seen.items.len(), 1);
    assert_eq!(seen.items[0].product_id, Some(mug.id));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_owner_without_sales_sees_nothing() {
    let ctx = TestContext::new().await;
    let owner = ctx.user("owner", Role::Owner).await;

    let orders = OrderHistoryService::new(&ctx.pool)
        .history(viewer(&owner))
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_customer_sees_only_own_orders_newest_first() {
    let ctx = TestContext::new().await;
    let owner = ctx.user("owner", Role::Owner).await;
    let first = ctx.user("first", Role::EndUser).await;
    let second = ctx.user("second", Role::EndUser).await;
    let product = ctx.product(&owner, "5.00").await;

    let older = place_order(&ctx, &first, &[product.id]).await;
    let newer = place_order(&ctx, &first, &[product.id]).await;
    let other = place_order(&ctx, &second, &[product.id]).await;

    let orders = OrderHistoryService::new(&ctx.pool)
        .history(viewer(&first))
        .await
        .unwrap();
    let ids: Vec<_> = orders.iter().map(|o| o.order.id).collect();
    assert_eq!(ids, vec![newer.order.id, older.order.id]);
    assert!(!ids.contains(&other.order.id));
    assert!(orders.iter().all(|o| o.order.user_id == first.id));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_admin_sees_every_line() {
    let ctx = TestContext::new().await;
    let admin = ctx.user("admin", Role::Admin).await;
    let alice = ctx.user("alice", Role::Owner).await;
    let bob = ctx.user("bob", Role::Owner).await;
    let shopper = ctx.user("shopper", Role::EndUser).await;
    let lamp = ctx.product(&alice, "20.00").await;
    let mug = ctx.product(&bob, "8.00").await;

    let order = place_order(&ctx, &shopper, &[lamp.id, mug.id]).await;

    let orders = OrderHistoryService::new(&ctx.pool)
        .history(viewer(&admin))
        .await
        .unwrap();
    let seen = orders
        .iter()
        .find(|o| o.order.id == order.order.id)
        .expect("admin sees the order");
    let owners: Vec<Option<UserId>> = seen.items.iter().map(|l| l.product_added_by).collect();
    assert_eq!(owners, vec![Some(alice.id), Some(bob.id)]);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_anonymous_history_is_rejected() {
    let ctx = TestContext::new().await;
    assert!(OrderHistoryService::new(&ctx.pool).history(None).await.is_err());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_deleting_a_product_keeps_past_order_lines() {
    let ctx = TestContext::new().await;
    let owner = ctx.user("owner", Role::Owner).await;
    let shopper = ctx.user("shopper", Role::EndUser).await;
    let lamp = ctx.product(&owner, "20.00").await;

    let order = place_order(&ctx, &shopper, &[lamp.id]).await;
    CatalogService::new(&ctx.pool)
        .delete(viewer(&owner), lamp.id)
        .await
        .unwrap();

    let history = OrderHistoryService::new(&ctx.pool)
        .history(viewer(&shopper))
        .await
        .unwrap();
    let seen = history
        .iter()
        .find(|o| o.order.id == order.order.id)
        .expect("shopper still sees the order");
    assert_eq!(seen.items.len(), 1);
    assert_eq!(seen.items[0].product_id, None);
    assert_eq!(seen.items[0].product_name, lamp.name);
    assert_eq!(seen.order.total_price, order.order.total_price);
}

//! Integration tests for the cart flow.
//!
//! Drives the storefront router end to end: pages render, HTMX fragments
//! come back with the right triggers, and the cart survives across requests
//! through the session cookie.

use axum::http::StatusCode;
use stride_integration_tests::{TestClient, body_string, hx_trigger};

#[tokio::test]
async fn test_health_check() {
    let mut client = TestClient::new();
    let response = client.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_home_page_renders_catalog() {
    let mut client = TestClient::new();
    let response = client.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Step into Style"));
    assert!(body.contains("Running Shoe"));
    assert!(body.contains("$99.99"));
    assert!(body.contains("What Our Customers Say"));
}

#[tokio::test]
async fn test_products_page_lists_all_products() {
    let mut client = TestClient::new();
    let body = body_string(client.get("/products").await).await;
    for name in [
        "Running Shoe",
        "Basketball Shoe",
        "Casual Shoe",
        "Training Shoe",
    ] {
        assert!(body.contains(name), "missing {name}");
    }
}

#[tokio::test]
async fn test_cart_page_starts_empty() {
    let mut client = TestClient::new();
    let response = client.get("/cart").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_add_to_cart_updates_badge_and_persists() {
    let mut client = TestClient::new();

    let response = client.post("/cart/add", "product_id=running-shoe").await;
    assert_eq!(response.status(), StatusCode::OK);
    let trigger = hx_trigger(&response).expect("add must trigger a refresh");
    assert!(trigger.contains("cart-updated"));
    assert!(body_string(response).await.contains('1'));

    // The cart is tied to the session, not the request
    let cart = body_string(client.get("/cart").await).await;
    assert!(cart.contains("Running Shoe"));
    assert!(cart.contains("$99.99"));

    let count = body_string(client.get("/cart/count").await).await;
    assert!(count.contains('1'));
}

#[tokio::test]
async fn test_quantities_and_totals() {
    let mut client = TestClient::new();
    client.post("/cart/add", "product_id=running-shoe").await;
    client.post("/cart/add", "product_id=basketball-shoe").await;

    // Step basketball shoe up to 2: subtotal 99.99 + 129.99 * 2 = 359.97
    let response = client
        .post("/cart/update", "line_id=basketball-shoe&quantity=2")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("$359.97"), "subtotal should be $359.97");
    assert!(body.contains("$10.00"), "shipping is flat");
    assert!(body.contains("$369.97"), "total should be $369.97");

    let count = body_string(client.get("/cart/count").await).await;
    assert!(count.contains('3'));
}

#[tokio::test]
async fn test_decrement_below_one_is_ignored() {
    let mut client = TestClient::new();
    client.post("/cart/add", "product_id=casual-shoe").await;

    // The stepper sends quantity 0 when decrementing from 1
    let body = body_string(
        client
            .post("/cart/update", "line_id=casual-shoe&quantity=0")
            .await,
    )
    .await;
    assert!(body.contains("Casual Shoe"), "line must survive");

    let count = body_string(client.get("/cart/count").await).await;
    assert!(count.contains('1'));
}

#[tokio::test]
async fn test_remove_emits_toast_only_on_success() {
    let mut client = TestClient::new();
    client.post("/cart/add", "product_id=running-shoe").await;

    let response = client.post("/cart/remove", "line_id=running-shoe").await;
    let trigger = hx_trigger(&response).expect("remove must trigger a refresh");
    assert!(trigger.contains("Item removed from cart"));
    assert!(body_string(response).await.contains("Your cart is empty."));

    // Removing an id that matches nothing is a no-op with no toast
    let response = client.post("/cart/remove", "line_id=running-shoe").await;
    assert_eq!(response.status(), StatusCode::OK);
    let trigger = hx_trigger(&response).expect("fragment still refreshes");
    assert!(!trigger.contains("Item removed from cart"));
}

#[tokio::test]
async fn test_adding_same_product_merges_lines() {
    let mut client = TestClient::new();
    client.post("/cart/add", "product_id=running-shoe").await;
    client.post("/cart/add", "product_id=running-shoe").await;

    let cart = body_string(client.get("/cart").await).await;
    assert_eq!(
        cart.matches("cart-line-image").count(),
        1,
        "one line, not two"
    );
    assert!(cart.contains(r#"<span class="quantity-value">2</span>"#));

    let count = body_string(client.get("/cart/count").await).await;
    assert!(count.contains('2'));
}

#[tokio::test]
async fn test_unknown_product_is_rejected() {
    let mut client = TestClient::new();
    let response = client.post("/cart/add", "product_id=sandals").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_carts_are_scoped_per_visitor() {
    let mut alice = TestClient::new();
    let mut bob = alice.sibling();

    alice.post("/cart/add", "product_id=running-shoe").await;

    let bobs_cart = body_string(bob.get("/cart").await).await;
    assert!(bobs_cart.contains("Your cart is empty."));

    let alices_cart = body_string(alice.get("/cart").await).await;
    assert!(alices_cart.contains("Running Shoe"));
}

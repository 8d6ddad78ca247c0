//! Tests for the REST inventory client against a fake inventory server.
//!
//! The fake server mimics a json-server backend:
//! - `GET /stock/{id}` returns `{"id", "amount"}`
//! - `GET /products/{id}` returns `{"id", "title", "price", "image"}`
//! - unknown IDs return 404 with an empty object
//! - product 500 always fails with an internal server error
//! - product 600 returns a malformed body
//! - product 700 has stock but its catalog lookup fails
//! - product 800 answers with the stock entry of another product
//! - unknown routes return a bare 404, like a wrong base URL would

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::{
    CartErrorKind, CartStore, HttpInventory, Inventory, InventoryConfig, InventoryError,
    MemoryNotifier, MemoryStore,
};
use rocketshoes_core::{Product, ProductId};
use rocketshoes_integration_tests::{amounts, sneaker};
use secrecy::SecretString;
use serde_json::json;
use url::Url;

#[derive(Clone, Default)]
struct FakeInventory {
    products: Arc<HashMap<i32, Product>>,
    stock: Arc<HashMap<i32, u32>>,
    product_hits: Arc<AtomicUsize>,
    required_token: Option<&'static str>,
}

impl FakeInventory {
    fn new(entries: &[(i32, u32)]) -> Self {
        Self {
            products: Arc::new(entries.iter().map(|&(id, _)| (id, sneaker(id))).collect()),
            stock: Arc::new(entries.iter().copied().collect()),
            ..Self::default()
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        self.required_token.is_none_or(|token| {
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == format!("Bearer {token}"))
        })
    }
}

async fn stock(
    State(fake): State<FakeInventory>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    if !fake.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id {
        500 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        600 => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        700 => Json(json!({ "id": 700, "amount": 5 })).into_response(),
        800 => Json(json!({ "id": 801, "amount": 5 })).into_response(),
        _ => fake.stock.get(&id).map_or_else(
            || (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
            |amount| Json(json!({ "id": id, "amount": amount })).into_response(),
        ),
    }
}

async fn product(
    State(fake): State<FakeInventory>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    if !fake.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    fake.product_hits.fetch_add(1, Ordering::SeqCst);
    if id == 700 {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    fake.products.get(&id).map_or_else(
        || (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
        |product| Json(product.clone()).into_response(),
    )
}

/// Serve `fake` on an ephemeral port and return its base URL.
async fn serve(fake: FakeInventory) -> Url {
    let app = Router::new()
        .route("/stock/{id}", get(stock))
        .route("/products/{id}", get(product))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server");
    });

    Url::parse(&format!("http://{addr}")).expect("url")
}

fn client(base_url: Url) -> HttpInventory {
    let mut config = InventoryConfig::new(base_url);
    config.timeout = Duration::from_secs(5);
    HttpInventory::new(&config).expect("client")
}

// =============================================================================
// Client
// =============================================================================

#[tokio::test]
async fn test_get_stock_and_product() {
    let url = serve(FakeInventory::new(&[(1, 3)])).await;
    let inventory = client(url);

    let stock = inventory.get_stock(ProductId::new(1)).await.expect("stock");
    assert_eq!(stock.amount, 3);

    let product = inventory.get_product(ProductId::new(1)).await.expect("product");
    assert_eq!(product, sneaker(1));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let url = serve(FakeInventory::new(&[])).await;
    let inventory = client(url);

    assert_eq!(
        inventory.get_stock(ProductId::new(9)).await,
        Err(InventoryError::NotFound(ProductId::new(9)))
    );
    assert_eq!(
        inventory.get_product(ProductId::new(9)).await,
        Err(InventoryError::NotFound(ProductId::new(9)))
    );
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let url = serve(FakeInventory::new(&[])).await;
    let inventory = client(url);

    assert!(matches!(
        inventory.get_stock(ProductId::new(500)).await,
        Err(InventoryError::Unavailable(_))
    ));
    assert!(matches!(
        inventory.get_stock(ProductId::new(600)).await,
        Err(InventoryError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_stock_for_another_product_is_unavailable() {
    let url = serve(FakeInventory::new(&[])).await;
    let inventory = client(url);

    assert_eq!(
        inventory.get_stock(ProductId::new(800)).await,
        Err(InventoryError::Unavailable("stock entry id mismatch".to_string()))
    );
}

#[tokio::test]
async fn test_catalog_lookups_are_cached() {
    let fake = FakeInventory::new(&[(1, 3)]);
    let hits = Arc::clone(&fake.product_hits);
    let inventory = client(serve(fake).await);

    for _ in 0..3 {
        inventory.get_product(ProductId::new(1)).await.expect("product");
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let fake = FakeInventory {
        required_token: Some("inventory-token"),
        ..FakeInventory::new(&[(1, 3)])
    };
    let url = serve(fake).await;

    let anonymous = client(url.clone());
    assert!(matches!(
        anonymous.get_stock(ProductId::new(1)).await,
        Err(InventoryError::Unavailable(_))
    ));

    let mut config = InventoryConfig::new(url);
    config.api_token = Some(SecretString::from("inventory-token"));
    let authorized = HttpInventory::new(&config).expect("client");
    assert_eq!(
        authorized.get_stock(ProductId::new(1)).await.expect("stock").amount,
        3
    );
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let url = serve(FakeInventory::new(&[(1, 3)])).await;
    // the fake server has no /api/v1 routes
    let inventory = client(url.join("api/v1").expect("join"));

    assert_eq!(inventory.base_url().path(), "/api/v1/");
    assert!(matches!(
        inventory.get_stock(ProductId::new(1)).await,
        Err(InventoryError::Unavailable(_))
    ));
    assert!(matches!(
        inventory.get_product(ProductId::new(1)).await,
        Err(InventoryError::Unavailable(_))
    ));
}

// =============================================================================
// Cart over HTTP
// =============================================================================

#[tokio::test]
async fn test_cart_over_http_inventory() {
    let url = serve(FakeInventory::new(&[(1, 2), (2, 1)])).await;
    let store = MemoryStore::new();
    let notifier = MemoryNotifier::new();
    let cart = CartStore::open(client(url), store.clone(), notifier.clone())
        .await
        .expect("open");

    cart.add_item(ProductId::new(1)).await.expect("add 1");
    cart.add_item(ProductId::new(2)).await.expect("add 2");
    cart.add_item(ProductId::new(1)).await.expect("add 1 again");

    let err = cart.add_item(ProductId::new(1)).await.expect_err("exhausted");
    assert_eq!(err.kind(), CartErrorKind::OutOfStock);

    let err = cart.add_item(ProductId::new(500)).await.expect_err("server error");
    assert_eq!(err.kind(), CartErrorKind::ServiceUnavailable);

    let err = cart.add_item(ProductId::new(77)).await.expect_err("unknown");
    assert_eq!(err.kind(), CartErrorKind::ProductNotFound);

    assert_eq!(amounts(&cart.cart().await), vec![(1, 2), (2, 1)]);
    assert_eq!(store.save_count(), 3);
    assert_eq!(notifier.messages().len(), 3);
}

#[tokio::test]
async fn test_cart_add_when_catalog_lookup_fails() {
    let url = serve(FakeInventory::new(&[(1, 2)])).await;
    let store = MemoryStore::new();
    let notifier = MemoryNotifier::new();
    let cart = CartStore::open(client(url), store.clone(), notifier.clone())
        .await
        .expect("open");
    cart.add_item(ProductId::new(1)).await.expect("add 1");

    // stock for 700 is fine, the product lookup fails
    let err = cart.add_item(ProductId::new(700)).await.expect_err("catalog down");

    assert_eq!(err.kind(), CartErrorKind::ServiceUnavailable);
    assert_eq!(amounts(&cart.cart().await), vec![(1, 1)]);
    assert_eq!(store.save_count(), 1);
    assert_eq!(notifier.messages(), vec!["Error adding product".to_string()]);
}

//! REST inventory client.
//!
//! Uses `reqwest` for HTTP. Product metadata is cached with `moka`; stock is
//! always fetched fresh because the cart must validate against current
//! availability.
//!
//! A 404 with a JSON body (json-server answers `{}`) means the product does
//! not exist. A 404 without one means the route itself is missing, usually a
//! wrong base URL, and is reported as [`InventoryError::Unavailable`].

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use rocketshoes_core::{Product, ProductId, StockEntry};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Inventory, InventoryError};
use crate::config::InventoryConfig;

/// Client for the inventory REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and catalog cache.
#[derive(Clone)]
pub struct HttpInventory {
    inner: Arc<HttpInventoryInner>,
}

struct HttpInventoryInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    catalog: Cache<ProductId, Product>,
}

impl HttpInventory {
    /// Create a new inventory client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &InventoryConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let catalog = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(HttpInventoryInner {
                client,
                base_url: with_trailing_slash(config.base_url.clone()),
                api_token: config.api_token.clone(),
                catalog,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetch `{base}/{resource}/{id}` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: ProductId,
    ) -> Result<T, InventoryError> {
        let url = self
            .inner
            .base_url
            .join(&format!("{resource}/{id}"))
            .map_err(|e| InventoryError::Unavailable(format!("invalid request URL: {e}")))?;

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, resource, product_id = %id, "Inventory request failed");
            InventoryError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InventoryError::Unavailable(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            if serde_json::from_str::<serde_json::Value>(&body).is_ok() {
                return Err(InventoryError::NotFound(id));
            }
            tracing::error!(
                resource,
                base_url = %self.inner.base_url,
                "Inventory route not found, check the base URL"
            );
            return Err(InventoryError::Unavailable(format!("no {resource} route")));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Inventory service returned non-success status"
            );
            return Err(InventoryError::Unavailable(format!("HTTP {status}")));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse inventory response"
            );
            InventoryError::Unavailable(format!("invalid response: {e}"))
        })
    }
}

impl Inventory for HttpInventory {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_stock(&self, id: ProductId) -> Result<StockEntry, InventoryError> {
        let stock: StockEntry = self.get_json("stock", id).await?;
        if stock.id != id {
            tracing::error!(returned_id = %stock.id, "Stock entry for a different product");
            return Err(InventoryError::Unavailable("stock entry id mismatch".to_string()));
        }
        debug!(amount = stock.amount, "Fetched stock");
        Ok(stock)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, InventoryError> {
        if let Some(product) = self.inner.catalog.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json("products", id).await?;

        self.inner.catalog.insert(id, product.clone()).await;

        Ok(product)
    }
}

/// `Url::join` treats the last path segment as a file unless it ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

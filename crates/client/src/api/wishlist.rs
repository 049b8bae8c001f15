//! Saved products.

use kasuwa_core::ProductId;
use tracing::instrument;

use crate::error::ApiError;
use crate::http::{ApiClient, Request};
use crate::models::ProductSummary;

/// The signed-in buyer's wishlist.
#[derive(Debug, Clone)]
pub struct WishlistApi {
    client: ApiClient,
}

impl WishlistApi {
    /// Create the service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Saved products.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductSummary>, ApiError> {
        self.client.send_json(Request::get("/wishlist")).await
    }

    /// Save a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn add(&self, id: &ProductId) -> Result<(), ApiError> {
        self.client
            .send_empty(Request::post("/wishlist").json(&serde_json::json!({ "product_id": id }))?)
            .await
    }

    /// Remove a saved product.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn remove(&self, id: &ProductId) -> Result<(), ApiError> {
        self.client
            .send_empty(Request::delete(format!("/wishlist/{id}")))
            .await
    }
}

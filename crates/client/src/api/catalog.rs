//! Categories, products and seller listings.

use kasuwa_core::ProductId;
use tracing::instrument;

use crate::error::ApiError;
use crate::filter::ProductFilter;
use crate::http::{ApiClient, Request};
use crate::models::{Category, LocationTree, Page, Product, ProductSummary, ProductUpdate};
use crate::wizard::{Completion, Destination};

/// Catalog browsing and seller product management.
#[derive(Debug, Clone)]
pub struct CatalogApi {
    client: ApiClient,
}

impl CatalogApi {
    /// Create the service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The full category tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.client.send_json(Request::get("/categories")).await
    }

    /// The state / LGA / area directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn locations(&self) -> Result<LocationTree, ApiError> {
        self.client.send_json(Request::get("/locations")).await
    }

    /// Search products with the current filter and page.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self, filter), fields(page = filter.page()))]
    pub async fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Page<ProductSummary>, ApiError> {
        let request = filter
            .to_query()
            .into_iter()
            .fold(Request::get("/products"), |request, (key, value)| {
                request.query(&key, value)
            });
        self.client.send_json(request).await
    }

    /// Product detail.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the call fails.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.client
            .send_json(Request::get(format!("/products/{id}")))
            .await
    }

    /// The signed-in seller's products.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn seller_products(&self, page: u32) -> Result<Page<ProductSummary>, ApiError> {
        self.client
            .send_json(Request::get("/seller/products").query("page", page.max(1)))
            .await
    }

    /// Edit a product.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for an empty update, otherwise any call error.
    #[instrument(skip(self, update), fields(product = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        if *update == ProductUpdate::default() {
            return Err(ApiError::InvalidRequest("nothing to update".to_string()));
        }
        self.client
            .send_json(Request::patch(format!("/products/{id}")).json(update)?)
            .await
    }

    /// Delete a product.
    ///
    /// On success the caller should return to the seller's product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<Completion, ApiError> {
        self.client
            .send_empty(Request::delete(format!("/products/{id}")))
            .await?;
        Ok(Completion::Redirect(Destination::SellerProducts))
    }
}

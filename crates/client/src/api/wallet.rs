//! Seller wallet.

use tracing::instrument;

use crate::error::ApiError;
use crate::http::{ApiClient, Request};
use crate::models::{Page, WalletBalance, WalletTransaction};

/// Balance and transaction history.
#[derive(Debug, Clone)]
pub struct WalletApi {
    client: ApiClient,
}

impl WalletApi {
    /// Create the service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Current balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn balance(&self) -> Result<WalletBalance, ApiError> {
        self.client.send_json(Request::get("/wallet")).await
    }

    /// One page of transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn transactions(&self, page: u32) -> Result<Page<WalletTransaction>, ApiError> {
        self.client
            .send_json(Request::get("/wallet/transactions").query("page", page.max(1)))
            .await
    }
}

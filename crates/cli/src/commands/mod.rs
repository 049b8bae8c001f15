//! Command implementations.
//!
//! Each command builds what it needs from a shared [`Context`], calls the
//! client library and prints a short human-readable result.

#![allow(clippy::print_stdout)]

pub mod auth;
pub mod chat;
pub mod products;
pub mod profile;
pub mod wallet;
pub mod wishlist;

use std::sync::Arc;

use kasuwa_client::api::{AuthApi, CatalogApi, ChatApi, ProfileApi, WalletApi, WishlistApi};
use kasuwa_client::{ApiClient, ClientConfig};

use crate::error::CliError;
use crate::session::FileSession;

/// Client and session shared by every command.
pub struct Context {
    client: ApiClient,
    session: Arc<FileSession>,
}

impl Context {
    /// Load configuration and the saved session.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or the session file is
    /// unreadable.
    pub fn from_env() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let session = Arc::new(
            FileSession::open(&config.session_file)
                .map_err(|e| CliError::io(&config.session_file, e))?,
        );
        tracing::debug!(api = %config.api_url, session = %session.path().display(), "configured");
        let client = ApiClient::new(&config, session.clone())?;
        Ok(Self { client, session })
    }

    /// The request client.
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.client.clone(), self.session.clone())
    }

    pub fn catalog(&self) -> CatalogApi {
        CatalogApi::new(self.client.clone())
    }

    pub fn wishlist(&self) -> WishlistApi {
        WishlistApi::new(self.client.clone())
    }

    pub fn chat(&self) -> ChatApi {
        ChatApi::new(self.client.clone())
    }

    pub fn wallet(&self) -> WalletApi {
        WalletApi::new(self.client.clone())
    }

    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(self.client.clone())
    }
}

//! Shared harness for the integration tests.
//!
//! Each test gets its own [`mockito`] server and a client pointed at it, so
//! tests can run in parallel without touching the network.

use std::sync::Arc;

use kasuwa_client::api::{AuthApi, CatalogApi, ChatApi, WishlistApi};
use kasuwa_client::{ApiClient, ClientConfig, MemorySession, SessionProvider};
use mockito::ServerGuard;
use secrecy::ExposeSecret;

/// A mock marketplace API and a client wired to it.
pub struct MockApi {
    pub server: ServerGuard,
    pub session: Arc<MemorySession>,
    pub client: ApiClient,
}

impl MockApi {
    /// Client with no stored session.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub async fn signed_out() -> Self {
        Self::with_session(MemorySession::new()).await
    }

    /// Client holding `token`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub async fn signed_in(token: &str) -> Self {
        Self::with_session(MemorySession::with_token(token)).await
    }

    async fn with_session(session: MemorySession) -> Self {
        let server = mockito::Server::new_async().await;
        let session = Arc::new(session);
        let config = config_for(&server.url());
        let client = ApiClient::new(&config, session.clone()).expect("client builds");
        Self {
            server,
            session,
            client,
        }
    }

    /// The stored token, exposed for assertions.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session
            .token()
            .map(|token| token.expose_secret().to_owned())
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.client.clone(), self.session.clone())
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogApi {
        CatalogApi::new(self.client.clone())
    }

    #[must_use]
    pub fn chat(&self) -> ChatApi {
        ChatApi::new(self.client.clone())
    }

    #[must_use]
    pub fn wishlist(&self) -> WishlistApi {
        WishlistApi::new(self.client.clone())
    }
}

/// Configuration pointing at `url` with defaults for everything else.
///
/// # Panics
///
/// Panics if `url` is not an http(s) address.
#[must_use]
pub fn config_for(url: &str) -> ClientConfig {
    ClientConfig::from_lookup(|key| (key == "KASUWA_API_URL").then(|| url.to_owned()))
        .expect("mock server url is valid")
}

/// A category tree with one brandless subcategory and one branded one.
#[must_use]
pub fn categories_json() -> serde_json::Value {
    serde_json::json!([
        {
            "id": "cat-food",
            "name": "Food",
            "subcategories": [
                { "id": "sub-grains", "name": "Grains", "brands": [] },
                {
                    "id": "sub-oils",
                    "name": "Oils",
                    "brands": [{ "id": "brand-kings", "name": "Kings" }]
                }
            ]
        }
    ])
}

/// A confirmed chat message as the server returns it.
#[must_use]
pub fn message_json(id: &str, conversation: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "conversation_id": conversation,
        "sender_id": "u-1",
        "text": text,
        "sent_at": "2026-03-01T12:00:00Z"
    })
}

//! Profile read and update.

use tracing::instrument;

use crate::error::ApiError;
use crate::http::{ApiClient, Request};
use crate::models::{Profile, ProfileUpdate};

/// The signed-in user's profile.
#[derive(Debug, Clone)]
pub struct ProfileApi {
    client: ApiClient,
}

impl ProfileApi {
    /// Create the service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Current profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<Profile, ApiError> {
        self.client.send_json(Request::get("/profile")).await
    }

    /// Change profile fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for an empty update, otherwise any call error.
    #[instrument(skip(self, update))]
    pub async fn update(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        if update.is_empty() {
            return Err(ApiError::InvalidRequest("nothing to update".to_string()));
        }
        self.client
            .send_json(Request::patch("/profile").json(update)?)
            .await
    }
}

//! Conversations between buyers and sellers.

use kasuwa_core::ConversationId;
use tracing::instrument;

use crate::error::ApiError;
use crate::http::{ApiClient, Request};
use crate::models::{ChatMessage, Conversation, NewMessage};

/// Inbox and message history.
#[derive(Debug, Clone)]
pub struct ChatApi {
    client: ApiClient,
}

impl ChatApi {
    /// Create the service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All conversations, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.client.send_json(Request::get("/chats")).await
    }

    /// Messages of one conversation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self), fields(conversation = %id))]
    pub async fn messages(&self, id: &ConversationId) -> Result<Vec<ChatMessage>, ApiError> {
        self.client
            .send_json(Request::get(format!("/chats/{id}/messages")))
            .await
    }

    /// Post a message and return the stored copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self, message), fields(conversation = %id))]
    pub async fn send_message(
        &self,
        id: &ConversationId,
        message: &NewMessage,
    ) -> Result<ChatMessage, ApiError> {
        self.client
            .send_json(Request::post(format!("/chats/{id}/messages")).json(message)?)
            .await
    }
}

//! Buyer-seller conversations.

use chrono::{DateTime, Utc};
use kasuwa_core::{ConversationId, MessageId, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// A conversation as listed in the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    /// The other party's display name.
    pub counterpart: String,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A message confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub text: String,
    #[serde(default)]
    pub product: Option<ProductAttachment>,
    pub sent_at: DateTime<Utc>,
}

/// A product shared into a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttachment {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /chats/{id}/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
}

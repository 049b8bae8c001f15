//! Open conversation state with optimistic sends.
//!
//! Loads and sends are split into a start call that hands out a ticket and a
//! finish call that takes it back. Tickets carry the thread generation, which
//! moves on every `open` and `close`, so a response for a thread the user has
//! left is dropped instead of landing in the one they are looking at.

use kasuwa_core::{ConversationId, MessageId};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::api::ChatApi;
use crate::error::ApiError;
use crate::models::{ChatMessage, NewMessage};

/// Errors raised by [`ChatThread`].
#[derive(Debug, Error)]
pub enum ChatError {
    /// No conversation is open.
    #[error("no conversation is open")]
    NotOpen,
    /// Blank message.
    #[error("message is empty")]
    EmptyMessage,
    /// Loading the history failed.
    #[error("could not load messages: {0}")]
    Load(#[source] ApiError),
    /// Sending failed; `text` is handed back for the compose box.
    #[error("message not sent: {source}")]
    SendFailed {
        /// The unsent text.
        text: String,
        /// Why it failed.
        #[source]
        source: ApiError,
    },
}

/// A message shown before the server confirmed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    /// Local identifier, never sent to the server.
    pub local_id: Uuid,
    pub text: String,
}

/// One line of the thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadEntry {
    /// Stored by the server.
    Confirmed(ChatMessage),
    /// Sent, awaiting confirmation.
    Pending(PendingMessage),
}

impl ThreadEntry {
    /// Message text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Confirmed(message) => &message.text,
            Self::Pending(pending) => &pending.text,
        }
    }

    /// Whether the server has not confirmed this entry yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    fn server_id(&self) -> Option<&MessageId> {
        match self {
            Self::Confirmed(message) => Some(&message.id),
            Self::Pending(_) => None,
        }
    }
}

/// Ticket for an in-flight history load.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
    conversation: ConversationId,
}

impl LoadTicket {
    /// Conversation being loaded.
    #[must_use]
    pub const fn conversation(&self) -> &ConversationId {
        &self.conversation
    }
}

/// Ticket for an in-flight send.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct SendTicket {
    generation: u64,
    local_id: Uuid,
    conversation: ConversationId,
}

impl SendTicket {
    /// Conversation the message goes to.
    #[must_use]
    pub const fn conversation(&self) -> &ConversationId {
        &self.conversation
    }
}

/// What `apply_loaded` / `reconcile` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The response was applied.
    Updated,
    /// The ticket was stale; nothing changed.
    Ignored,
}

/// State of the open conversation.
#[derive(Debug, Default)]
pub struct ChatThread {
    conversation: Option<ConversationId>,
    entries: Vec<ThreadEntry>,
    loading: bool,
    generation: u64,
}

impl ChatThread {
    /// No conversation open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open conversation, if any.
    #[must_use]
    pub const fn conversation(&self) -> Option<&ConversationId> {
        self.conversation.as_ref()
    }

    /// Entries oldest first.
    #[must_use]
    pub fn entries(&self) -> &[ThreadEntry] {
        &self.entries
    }

    /// Whether the history is still loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Switch to `conversation`, discarding the previous one.
    pub fn open(&mut self, conversation: ConversationId) -> LoadTicket {
        self.generation += 1;
        self.entries.clear();
        self.loading = true;
        self.conversation = Some(conversation.clone());
        debug!(conversation = %conversation, generation = self.generation, "thread opened");
        LoadTicket {
            generation: self.generation,
            conversation,
        }
    }

    /// Apply a history response.
    ///
    /// Messages sent while the history was loading stay after it, unless the
    /// history already holds their confirmed copy.
    ///
    /// # Errors
    ///
    /// Returns `Load` if the response is current and failed.
    pub fn apply_loaded(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<ChatMessage>, ApiError>,
    ) -> Result<Applied, ChatError> {
        if ticket.generation != self.generation {
            debug!(conversation = %ticket.conversation, "stale history dropped");
            return Ok(Applied::Ignored);
        }
        self.loading = false;

        let messages = result.map_err(ChatError::Load)?;
        let earlier = std::mem::take(&mut self.entries);
        self.entries = messages.into_iter().map(ThreadEntry::Confirmed).collect();
        let loaded = self.entries.len();
        for entry in earlier {
            let known = entry.server_id().is_some_and(|id| {
                self.entries
                    .iter()
                    .take(loaded)
                    .any(|history| history.server_id() == Some(id))
            });
            if !known {
                self.entries.push(entry);
            }
        }
        Ok(Applied::Updated)
    }

    /// Close the conversation; in-flight responses are dropped.
    pub fn close(&mut self) {
        self.generation += 1;
        self.entries.clear();
        self.loading = false;
        if let Some(conversation) = self.conversation.take() {
            debug!(conversation = %conversation, "thread closed");
        }
    }

    /// Show `text` immediately and return what to send.
    ///
    /// # Errors
    ///
    /// Fails when no conversation is open or `text` is blank.
    pub fn begin_send(&mut self, text: &str) -> Result<(SendTicket, NewMessage), ChatError> {
        let conversation = self.conversation.clone().ok_or(ChatError::NotOpen)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let local_id = Uuid::new_v4();
        self.entries.push(ThreadEntry::Pending(PendingMessage {
            local_id,
            text: text.to_owned(),
        }));

        Ok((
            SendTicket {
                generation: self.generation,
                local_id,
                conversation,
            },
            NewMessage {
                text: text.to_owned(),
                product_id: None,
            },
        ))
    }

    /// Replace the pending entry with the server's copy, or remove it on
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns `SendFailed` carrying the original text when the send failed.
    pub fn reconcile(
        &mut self,
        ticket: &SendTicket,
        result: Result<ChatMessage, ApiError>,
    ) -> Result<Applied, ChatError> {
        if ticket.generation != self.generation {
            debug!(conversation = %ticket.conversation, "stale send result dropped");
            return Ok(Applied::Ignored);
        }
        let Some(index) = self.entries.iter().position(
            |entry| matches!(entry, ThreadEntry::Pending(p) if p.local_id == ticket.local_id),
        ) else {
            return Ok(Applied::Ignored);
        };

        match result {
            Ok(message) => {
                let duplicate = self
                    .entries
                    .iter()
                    .any(|entry| entry.server_id() == Some(&message.id));
                if duplicate {
                    self.entries.remove(index);
                } else if let Some(slot) = self.entries.get_mut(index) {
                    *slot = ThreadEntry::Confirmed(message);
                }
                Ok(Applied::Updated)
            }
            Err(source) => {
                let text = self.entries.remove(index).text().to_owned();
                warn!(conversation = %ticket.conversation, error = %source, "message not sent");
                Err(ChatError::SendFailed { text, source })
            }
        }
    }

    /// Open `conversation` and load its history.
    ///
    /// # Errors
    ///
    /// Returns `Load` if the history could not be fetched.
    #[instrument(skip(self, api))]
    pub async fn load(
        &mut self,
        api: &ChatApi,
        conversation: ConversationId,
    ) -> Result<Applied, ChatError> {
        let ticket = self.open(conversation);
        let result = api.messages(ticket.conversation()).await;
        self.apply_loaded(&ticket, result)
    }

    /// Send `text` optimistically.
    ///
    /// # Errors
    ///
    /// See [`begin_send`](Self::begin_send) and [`reconcile`](Self::reconcile).
    #[instrument(skip(self, api, text))]
    pub async fn send(&mut self, api: &ChatApi, text: &str) -> Result<Applied, ChatError> {
        let (ticket, message) = self.begin_send(text)?;
        let result = api.send_message(ticket.conversation(), &message).await;
        self.reconcile(&ticket, result)
    }
}

//! Session token storage.
//!
//! The token is the only state shared by every request. Readers see it through
//! [`SessionProvider`]; only the authentication flows (login, signup, logout,
//! account deletion) hold a [`SessionStore`] and may change it.

use std::sync::RwLock;

use secrecy::SecretString;
use thiserror::Error;

/// A session change that could not be made durable.
#[derive(Debug, Error)]
#[error("could not {action} session at {location}: {source}")]
pub struct SessionError {
    action: &'static str,
    location: String,
    #[source]
    source: std::io::Error,
}

impl SessionError {
    /// Saving a new token failed.
    #[must_use]
    pub fn save(location: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            action: "save",
            location: location.into(),
            source,
        }
    }

    /// Forgetting the token failed.
    #[must_use]
    pub fn remove(location: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            action: "remove",
            location: location.into(),
            source,
        }
    }

    /// Where the session is kept.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Read access to the current session token.
pub trait SessionProvider: Send + Sync {
    /// The current token, or `None` when signed out.
    fn token(&self) -> Option<SecretString>;
}

/// Read-write access to the session token.
pub trait SessionStore: SessionProvider {
    /// Replace the current token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token could not be saved. The previous token
    /// stays in effect in that case.
    fn store(&self, token: SecretString) -> Result<(), SessionError>;

    /// Forget the current token.
    ///
    /// The token is forgotten in memory even when this fails.
    ///
    /// # Errors
    ///
    /// Returns an error if a saved copy could not be removed.
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-memory session store.
#[derive(Default)]
pub struct MemorySession {
    token: RwLock<Option<SecretString>>,
}

impl MemorySession {
    /// Create a signed-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that is already signed in.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl SessionProvider for MemorySession {
    fn token(&self) -> Option<SecretString> {
        // A poisoned lock still holds a consistent Option.
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SessionStore for MemorySession {
    fn store(&self, token: SecretString) -> Result<(), SessionError> {
        match self.token.write() {
            Ok(mut guard) => *guard = Some(token),
            Err(poisoned) => *poisoned.into_inner() = Some(token),
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match self.token.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        Ok(())
    }
}

impl std::fmt::Debug for MemorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySession")
            .field("signed_in", &self.token().is_some())
            .finish()
    }
}

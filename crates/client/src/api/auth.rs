//! Authentication: the only writer of the session token.

use std::sync::Arc;

use kasuwa_core::Email;
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::http::{ApiClient, Request};
use crate::models::{
    AuthResponse, Credentials, OtpDestination, OtpVerification, PasswordReset, Profile, Signup,
};
use crate::session::SessionStore;

/// Login, signup, verification and account lifecycle.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
    session: Arc<dyn SessionStore>,
}

impl AuthApi {
    /// Create the service. `session` must be the store the client reads from.
    #[must_use]
    pub fn new(client: ApiClient, session: Arc<dyn SessionStore>) -> Self {
        Self { client, session }
    }

    /// Log in and store the returned token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the call fails;
    /// the stored session is untouched in that case. Returns `Session` if the
    /// server signed the user in but the token could not be saved.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Option<Profile>, ApiError> {
        let response: AuthResponse = self
            .client
            .send_json(Request::post("/auth/login").public().json(credentials)?)
            .await?;
        self.start_session(response)
    }

    /// Create an account and store the returned token.
    ///
    /// # Errors
    ///
    /// Returns an error if the signup is rejected or the call fails, or
    /// `Session` if the new token could not be saved.
    #[instrument(skip(self, signup), fields(email = %signup.email, role = ?signup.role))]
    pub async fn signup(&self, signup: &Signup) -> Result<Option<Profile>, ApiError> {
        let response: AuthResponse = self
            .client
            .send_json(Request::post("/auth/signup").public().json(signup)?)
            .await?;
        self.start_session(response)
    }

    /// Forget the local session and tell the server.
    ///
    /// The local token is cleared even if the server call fails, so a user is
    /// never stuck signed in. The server error is still returned.
    ///
    /// # Errors
    ///
    /// Returns `Session` if the saved session could not be removed, otherwise
    /// the server's error, if any.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = match self.session.token() {
            Some(_) => self.client.send_empty(Request::post("/auth/logout")).await,
            None => Ok(()),
        };
        if let Err(ref e) = result {
            warn!(error = %e, "server logout failed");
        }
        self.session.clear()?;
        info!("session cleared");
        result
    }

    /// Send a one-time passcode.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn send_otp(&self, destination: &OtpDestination) -> Result<(), ApiError> {
        self.client
            .send_empty(Request::post("/auth/otp/send").public().json(destination)?)
            .await
    }

    /// Check a one-time passcode.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is rejected or the call fails.
    #[instrument(skip(self, verification))]
    pub async fn verify_otp(&self, verification: &OtpVerification) -> Result<(), ApiError> {
        self.client
            .send_empty(Request::post("/auth/otp/verify").public().json(verification)?)
            .await
    }

    /// Ask for a password-reset code to be emailed.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn request_password_reset(&self, email: &Email) -> Result<(), ApiError> {
        self.client
            .send_empty(
                Request::post("/auth/password/forgot")
                    .public()
                    .json(&serde_json::json!({ "email": email }))?,
            )
            .await
    }

    /// Set a new password with an emailed code.
    ///
    /// Usually driven through [`PasswordResetFlow`](crate::wizard::PasswordResetFlow).
    ///
    /// # Errors
    ///
    /// Returns an error if the code is rejected or the call fails.
    #[instrument(skip(self, reset), fields(email = %reset.email))]
    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<(), ApiError> {
        self.client
            .send_empty(Request::post("/auth/password/reset").public().json(reset)?)
            .await
    }

    /// Delete the account. The session is cleared only once the server confirms.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails; the session is kept in that case.
    /// Returns `Session` if the account is gone but the saved session could
    /// not be removed.
    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> Result<(), ApiError> {
        self.client.send_empty(Request::delete("/account")).await?;
        self.session.clear()?;
        info!("account deleted, session cleared");
        Ok(())
    }

    fn start_session(&self, response: AuthResponse) -> Result<Option<Profile>, ApiError> {
        self.session.store(SecretString::from(response.token))?;
        info!("session started");
        Ok(response.user)
    }
}

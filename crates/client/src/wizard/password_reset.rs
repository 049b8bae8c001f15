//! Forgotten password: email first, then the emailed code and a new password.

use std::fmt;

use kasuwa_core::{Email, OtpCode};
use secrecy::SecretString;

use super::{Completion, Destination, FieldErrors, Flow, Step};
use crate::http::Request;
use crate::models::PasswordReset;

/// Shortest accepted password.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Steps of [`PasswordResetFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordResetStep {
    Email,
    CodeAndPassword,
}

impl Step for PasswordResetStep {
    const FIRST: Self = Self::Email;

    fn next(self) -> Option<Self> {
        match self {
            Self::Email => Some(Self::CodeAndPassword),
            Self::CodeAndPassword => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::Email => None,
            Self::CodeAndPassword => Some(Self::Email),
        }
    }
}

/// Fields of the reset form. Passwords never appear in `Debug` output.
#[derive(Clone, Default)]
pub struct PasswordResetDraft {
    pub email: String,
    pub code: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for PasswordResetDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordResetDraft")
            .field("email", &self.email)
            .field("code", &self.code)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

/// The password reset flow. Sent without a session token.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordResetFlow;

impl Flow for PasswordResetFlow {
    type Step = PasswordResetStep;
    type Fields = PasswordResetDraft;

    const NAME: &'static str = "password_reset";

    fn validate(&self, step: PasswordResetStep, fields: &PasswordResetDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            PasswordResetStep::Email => {
                if let Err(e) = Email::parse(&fields.email) {
                    errors.insert("email", e.to_string());
                }
            }
            PasswordResetStep::CodeAndPassword => {
                if let Err(e) = OtpCode::parse(&fields.code) {
                    errors.insert("code", e.to_string());
                }
                if fields.password.chars().count() < MIN_PASSWORD_CHARS {
                    errors.insert(
                        "password",
                        format!("password must be at least {MIN_PASSWORD_CHARS} characters"),
                    );
                }
                if fields.password != fields.confirm_password {
                    errors.insert("confirm_password", "passwords do not match");
                }
            }
        }
        errors
    }

    fn prepare(&self, fields: &PasswordResetDraft) -> Result<Request, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = Email::parse(&fields.email).map_err(|e| errors.insert("email", e.to_string()));
        let code = OtpCode::parse(&fields.code).map_err(|e| errors.insert("code", e.to_string()));
        let (Ok(email), Ok(code)) = (email, code) else {
            return Err(errors);
        };

        let body = PasswordReset {
            email,
            code,
            password: SecretString::from(fields.password.clone()),
        };
        Request::post("/auth/password/reset")
            .public()
            .json(&body)
            .map_err(|e| {
                let mut errors = FieldErrors::new();
                errors.insert("form", e.to_string());
                errors
            })
    }

    fn completion(&self) -> Completion {
        Completion::Redirect(Destination::Login)
    }
}

//! CLI error type.

use std::path::PathBuf;

use kasuwa_client::ApiError;
use kasuwa_client::config::ConfigError;
use kasuwa_client::filter::FilterError;
use kasuwa_client::images::ImageError;
use kasuwa_client::selection::SelectionError;
use kasuwa_client::thread::ChatError;
use kasuwa_client::wizard::WizardError;
use kasuwa_core::{AmountError, EmailError, OtpError, PhoneError};
use thiserror::Error;

/// Anything that can end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("invalid amount: {0}")]
    Amount(#[from] AmountError),

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("invalid phone number: {0}")]
    Phone(#[from] PhoneError),

    #[error("invalid code: {0}")]
    Otp(#[from] OtpError),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Wrap an I/O error with the file it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! One-time passcodes sent by SMS or email.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OtpCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    /// Wrong number of digits.
    #[error("code must be {expected} digits")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
    },
    /// Something other than a digit was entered.
    #[error("code may only contain digits")]
    NonDigit,
}

/// A six-digit verification code.
///
/// Codes are usually pasted from a message, so whitespace and dashes between
/// digit groups are ignored.
///
/// ```
/// use kasuwa_core::OtpCode;
///
/// assert_eq!(OtpCode::parse("123 456").unwrap().as_str(), "123456");
/// assert!(OtpCode::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// Number of digits in a code.
    pub const LENGTH: usize = 6;

    /// Parse a code from user input.
    ///
    /// # Errors
    ///
    /// Returns an error for anything but exactly six digits.
    pub fn parse(s: &str) -> Result<Self, OtpError> {
        let digits: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(OtpError::NonDigit);
        }
        if digits.len() != Self::LENGTH {
            return Err(OtpError::WrongLength {
                expected: Self::LENGTH,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Contact details collected at signup, login and password reset.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is blank.
    #[error("email is required")]
    Empty,
    /// The input is longer than RFC 5321 allows.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not `local@domain` with a dotted domain.
    #[error("'{0}' is not a valid email address")]
    Invalid(String),
}

/// An email address, trimmed and lowercased.
///
/// Marketplace accounts are keyed by email, so two spellings that differ only
/// in case must compare equal.
///
/// ```
/// use kasuwa_core::Email;
///
/// let email = Email::parse("  Ada@Example.com ").unwrap();
/// assert_eq!(email.as_str(), "ada@example.com");
/// assert!(Email::parse("ada@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank, too long, lacks exactly one
    /// `@`, has an empty local part, or its domain has no dot.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let invalid = || EmailError::Invalid(trimmed.to_owned());
        let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
        let domain_ok = domain.contains('.') && domain.split('.').all(|label| !label.is_empty());

        if local.is_empty() || domain.contains('@') || !domain_ok || trimmed.contains(' ') {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is blank.
    #[error("phone number is required")]
    Empty,
    /// The input is not a Nigerian mobile number.
    #[error("'{0}' is not a valid Nigerian phone number")]
    Invalid(String),
}

/// A Nigerian phone number in E.164 form (`+234XXXXXXXXXX`).
///
/// Accepts the local form (`0803 123 4567`), the international form with or
/// without the plus, and common separators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const COUNTRY_CODE: &'static str = "234";
    const SUBSCRIBER_DIGITS: usize = 10;

    /// Parse and normalise a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or does not reduce to ten
    /// subscriber digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
            .collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::Invalid(trimmed.to_owned()));
        }

        let subscriber = digits
            .strip_prefix(Self::COUNTRY_CODE)
            .or_else(|| digits.strip_prefix('0'))
            .unwrap_or(&digits);

        if subscriber.len() != Self::SUBSCRIBER_DIGITS || subscriber.starts_with('0') {
            return Err(PhoneError::Invalid(trimmed.to_owned()));
        }

        Ok(Self(format!("+{}{subscriber}", Self::COUNTRY_CODE)))
    }

    /// Returns the E.164 form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalises_case_and_whitespace() {
        let email = Email::parse(" Buyer@Kasuwa.NG ").unwrap();
        assert_eq!(email.as_str(), "buyer@kasuwa.ng");
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        for input in ["no-at", "@kasuwa.ng", "a@b", "a@@b.ng", "a@b..ng", "a b@c.ng"] {
            assert!(
                matches!(Email::parse(input), Err(EmailError::Invalid(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_too_long() {
        let long = format!("{}@kasuwa.ng", "a".repeat(250));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong { max: 254 }));
    }

    #[test]
    fn test_phone_local_and_international_forms_agree() {
        let expected = "+2348031234567";
        for input in ["08031234567", "0803 123 4567", "+234 803-123-4567", "2348031234567"] {
            assert_eq!(PhoneNumber::parse(input).unwrap().as_str(), expected);
        }
    }

    #[test]
    fn test_phone_rejects_wrong_length() {
        assert!(matches!(
            PhoneNumber::parse("0803123"),
            Err(PhoneError::Invalid(_))
        ));
        assert!(matches!(
            PhoneNumber::parse("0803abc4567"),
            Err(PhoneError::Invalid(_))
        ));
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
    }
}

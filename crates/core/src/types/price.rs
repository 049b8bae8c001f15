//! Naira prices and display-amount parsing.
//!
//! Sellers type prices the way they read them on screen: `₦1,250.50`,
//! `NGN 2,000` or plain `1250.5`. [`parse_amount`] turns any of those into a
//! [`Decimal`] and refuses anything that is not a clean non-negative number
//! once the formatting characters are gone. A malformed amount is an error,
//! never zero.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency symbols that may surround an amount.
const CURRENCY_SYMBOLS: &[char] = &['₦', '$', '£', '€'];

/// Thousands separators allowed between groups of three digits.
const GROUP_SEPARATORS: &[char] = &[',', '_', ' ', '\u{a0}'];

/// Currency codes that may prefix an amount.
const CODE_PREFIXES: &[&str] = &["NGN", "USD"];

/// Maximum number of fractional digits (kobo precision).
const MAX_DECIMALS: usize = 2;

/// Errors that can occur when parsing a display amount.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Nothing left after stripping formatting.
    #[error("amount is required")]
    Empty,
    /// The amount has a leading minus sign.
    #[error("amount cannot be negative")]
    Negative,
    /// More fractional digits than the currency supports.
    #[error("amount can have at most {max} decimal places")]
    TooManyDecimals {
        /// Maximum allowed fractional digits.
        max: usize,
    },
    /// The remaining text is not a number.
    #[error("'{0}' is not a valid amount")]
    Malformed(String),
}

/// Parse a display-formatted amount into a plain decimal.
///
/// # Errors
///
/// Returns an error if the input is empty, negative, has more than two
/// decimal places, or is not a number after formatting is removed.
///
/// # Examples
///
/// ```
/// use kasuwa_core::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("₦1,250.50").unwrap(), Decimal::new(125_050, 2));
/// assert_eq!(parse_amount("NGN 2,000").unwrap(), Decimal::new(2000, 0));
/// assert!(parse_amount("1.2.3").is_err());
/// assert!(parse_amount("").is_err());
/// ```
pub fn parse_amount(input: &str) -> Result<Decimal, AmountError> {
    let mut rest = input.trim();
    for code in CODE_PREFIXES {
        if let Some(prefix) = rest.get(..code.len())
            && prefix.eq_ignore_ascii_case(code)
        {
            rest = rest.get(code.len()..).unwrap_or_default();
            break;
        }
    }

    let number = rest.trim_matches(|c: char| CURRENCY_SYMBOLS.contains(&c) || c.is_whitespace());
    let malformed = || AmountError::Malformed(input.trim().to_owned());

    if number.chars().all(|c| GROUP_SEPARATORS.contains(&c)) {
        return Err(AmountError::Empty);
    }
    if number.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };

    let whole = ungroup(whole).ok_or_else(malformed)?;
    if fraction.is_some_and(|f| !is_digits(f)) {
        return Err(malformed());
    }
    if fraction.is_some_and(|f| f.len() > MAX_DECIMALS) {
        return Err(AmountError::TooManyDecimals { max: MAX_DECIMALS });
    }

    let cleaned = match fraction {
        Some(fraction) => format!("{whole}.{fraction}"),
        None => whole,
    };
    Decimal::from_str(&cleaned).map_err(|_| malformed())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Digits of a whole part, checking that any separators split it into
/// thousands (`1,250`, `12 345 678`).
fn ungroup(whole: &str) -> Option<String> {
    if !whole.contains(GROUP_SEPARATORS) {
        return is_digits(whole).then(|| whole.to_owned());
    }
    let mut groups = whole.split(GROUP_SEPARATORS);
    let lead = groups.next()?;
    if !is_digits(lead) || lead.len() > 3 {
        return None;
    }
    groups.try_fold(lead.to_owned(), |mut digits, group| {
        (group.len() == 3 && is_digits(group)).then(|| {
            digits.push_str(group);
            digits
        })
    })
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (naira, not kobo).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a naira price.
    #[must_use]
    pub const fn naira(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::NGN)
    }

    /// Parse a display amount as a naira price.
    ///
    /// # Errors
    ///
    /// See [`parse_amount`].
    pub fn parse_naira(input: &str) -> Result<Self, AmountError> {
        parse_amount(input).map(Self::naira)
    }

    /// Format for display with thousands separators, e.g. `₦1,250.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let fixed = format!("{:.2}", self.amount.round_dp(2));
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let (sign, digits) = whole
            .strip_prefix('-')
            .map_or(("", whole), |digits| ("-", digits));

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        format!(
            "{sign}{}{grouped}.{fraction}",
            self.currency_code.symbol()
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes accepted by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    NGN,
    USD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::NGN => "₦",
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naira_display_amount() {
        assert_eq!(parse_amount("₦1,250.50").unwrap(), Decimal::new(125_050, 2));
    }

    #[test]
    fn test_parse_currency_code_prefix() {
        assert_eq!(parse_amount("NGN 2,000").unwrap(), Decimal::new(2000, 0));
        assert_eq!(parse_amount("ngn15").unwrap(), Decimal::new(15, 0));
        assert_eq!(parse_amount("$ 10").unwrap(), Decimal::new(10, 0));
    }

    #[test]
    fn test_parse_plain_amount() {
        assert_eq!(parse_amount(" 99.9 ").unwrap(), Decimal::new(999, 1));
    }

    #[test]
    fn test_parse_empty_after_stripping() {
        assert_eq!(parse_amount(""), Err(AmountError::Empty));
        assert_eq!(parse_amount("₦ ,"), Err(AmountError::Empty));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(parse_amount("-500"), Err(AmountError::Negative));
    }

    #[test]
    fn test_parse_malformed_is_not_zero() {
        assert!(matches!(parse_amount("1.2.3"), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_amount("abc"), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_amount(".5"), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_amount("12."), Err(AmountError::Malformed(_))));
    }

    #[test]
    fn test_parse_checks_thousands_grouping() {
        assert_eq!(parse_amount("12 345 678").unwrap(), Decimal::new(12_345_678, 0));
        assert_eq!(parse_amount("₦1_000.5").unwrap(), Decimal::new(10_005, 1));
        for input in ["1 2 3", "1,2,3", "1,00", "1234,567", ",100", "1,000,", "1.000,50"] {
            assert!(
                matches!(parse_amount(input), Err(AmountError::Malformed(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_too_many_decimals() {
        assert_eq!(
            parse_amount("1.005"),
            Err(AmountError::TooManyDecimals { max: 2 })
        );
    }

    #[test]
    fn test_display_groups_thousands() {
        let price = Price::naira(Decimal::new(125_050, 2));
        assert_eq!(price.display(), "₦1,250.50");

        let price = Price::naira(Decimal::new(1_000_000, 0));
        assert_eq!(price.to_string(), "₦1,000,000.00");

        let price = Price::new(Decimal::new(5, 1), CurrencyCode::USD);
        assert_eq!(price.display(), "$0.50");
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        let price = Price::parse_naira("₦12,345.6").unwrap();
        assert_eq!(Price::parse_naira(&price.display()).unwrap(), price);
    }
}

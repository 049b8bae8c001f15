//! Quantity-based pricing tiers.
//!
//! Wholesale listings price each variant by quantity range, e.g. 10-49 units
//! at ₦1,200 and 50+ at ₦1,000. The lowest tier's starting quantity is the
//! listing's minimum order quantity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::{AmountError, parse_amount};

/// Errors that can occur when building a [`PricingTier`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TierError {
    /// A quantity is not a whole number.
    #[error("'{0}' is not a valid quantity")]
    InvalidQuantity(String),
    /// The starting quantity is zero.
    #[error("minimum quantity must be at least 1")]
    ZeroQuantity,
    /// The upper bound is below the lower bound.
    #[error("maximum quantity {max} is below minimum quantity {min}")]
    InvertedRange {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
    /// The unit price failed to parse.
    #[error("invalid unit price: {0}")]
    Price(#[from] AmountError),
}

/// A quantity range mapped to a unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    /// First quantity covered by this tier.
    pub min_quantity: u32,
    /// Last quantity covered, `None` for an open-ended tier.
    pub max_quantity: Option<u32>,
    /// Price per unit within the range.
    pub unit_price: Decimal,
}

impl PricingTier {
    /// Create a tier, checking that the range is well formed.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_quantity` is zero or `max_quantity` is below it.
    pub fn new(
        min_quantity: u32,
        max_quantity: Option<u32>,
        unit_price: Decimal,
    ) -> Result<Self, TierError> {
        if min_quantity == 0 {
            return Err(TierError::ZeroQuantity);
        }
        if let Some(max) = max_quantity
            && max < min_quantity
        {
            return Err(TierError::InvertedRange {
                min: min_quantity,
                max,
            });
        }
        Ok(Self {
            min_quantity,
            max_quantity,
            unit_price,
        })
    }

    /// Build a tier from raw form input. An empty `max` means open-ended.
    ///
    /// # Errors
    ///
    /// Returns an error if a quantity is not a whole number, the range is
    /// invalid, or the price does not parse.
    pub fn parse(min: &str, max: &str, price: &str) -> Result<Self, TierError> {
        let min_quantity = parse_quantity(min)?;
        let max_quantity = match max.trim() {
            "" => None,
            raw => Some(parse_quantity(raw)?),
        };
        let unit_price = parse_amount(price)?;
        Self::new(min_quantity, max_quantity, unit_price)
    }

    /// Whether `quantity` falls inside this tier.
    #[must_use]
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.min_quantity && self.max_quantity.is_none_or(|max| quantity <= max)
    }
}

fn parse_quantity(raw: &str) -> Result<u32, TierError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<u32>()
        .map_err(|_| TierError::InvalidQuantity(raw.trim().to_owned()))
}

/// The smallest quantity a buyer can order across all tiers.
///
/// Returns `None` when there are no tiers.
pub fn minimum_order_quantity<'a>(tiers: impl IntoIterator<Item = &'a PricingTier>) -> Option<u32> {
    tiers.into_iter().map(|tier| tier.min_quantity).min()
}

/// Unit price for `quantity`.
///
/// Quantities above every bounded tier use the tier with the highest
/// starting quantity. Quantities below the minimum order quantity have no
/// price.
pub fn unit_price_for<'a>(
    tiers: impl IntoIterator<Item = &'a PricingTier>,
    quantity: u32,
) -> Option<Decimal> {
    let tiers: Vec<&PricingTier> = tiers.into_iter().collect();

    if let Some(tier) = tiers.iter().find(|tier| tier.contains(quantity)) {
        return Some(tier.unit_price);
    }

    tiers
        .iter()
        .filter(|tier| tier.min_quantity <= quantity)
        .max_by_key(|tier| tier.min_quantity)
        .map(|tier| tier.unit_price)
}

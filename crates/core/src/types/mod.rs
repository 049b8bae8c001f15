//! Core types for Kasuwa.
//!
//! This module provides type-safe wrappers for marketplace concepts.

pub mod contact;
pub mod id;
pub mod otp;
pub mod price;
pub mod pricing;
pub mod status;

pub use contact::{Email, EmailError, PhoneError, PhoneNumber};
pub use id::*;
pub use otp::{OtpCode, OtpError};
pub use price::{AmountError, CurrencyCode, Price, parse_amount};
pub use pricing::{PricingTier, TierError, minimum_order_quantity, unit_price_for};
pub use status::*;

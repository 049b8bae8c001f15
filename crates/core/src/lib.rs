//! Kasuwa Core - Shared domain types.
//!
//! This crate provides the types used across the Kasuwa marketplace client:
//! - `client` - Authenticated API client, wizards and view controllers
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O and no HTTP
//! clients. Anything that needs to validate user input before it reaches the
//! marketplace API lives here so it can be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, naira prices, pricing tiers, contact details, OTP
//!   codes and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

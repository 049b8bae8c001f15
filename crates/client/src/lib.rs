//! Kasuwa marketplace client library.
//!
//! Everything a front end needs to talk to the marketplace API: one
//! authenticated request client, typed services on top of it, and the state
//! machines behind multi-step forms, filters and chat threads.
//!
//! # Modules
//!
//! - [`http`] - `ApiClient`: token attachment, header merging, error mapping
//! - [`api`] - Typed services (auth, catalog, wishlist, chat, wallet, profile)
//! - [`wizard`] - Multi-step form controller and the concrete flows
//! - [`selection`] - Dependent selections (category tree, state/LGA/area)
//! - [`images`] - Product image staging
//! - [`filter`] - Product search and pagination state
//! - [`thread`] - Open chat conversation with optimistic sends
//! - [`session`] - Session token storage
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod images;
pub mod models;
pub mod selection;
pub mod session;
pub mod thread;
pub mod wizard;

pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{ApiClient, Request};
pub use session::{MemorySession, SessionError, SessionProvider, SessionStore};

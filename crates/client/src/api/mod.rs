//! Typed services over [`ApiClient`](crate::http::ApiClient), one per area of
//! the marketplace API.

mod auth;
mod catalog;
mod chat;
mod profile;
mod wallet;
mod wishlist;

pub use auth::AuthApi;
pub use catalog::CatalogApi;
pub use chat::ChatApi;
pub use profile::ProfileApi;
pub use wallet::WalletApi;
pub use wishlist::WishlistApi;

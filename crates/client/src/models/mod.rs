//! Request and response shapes of the marketplace API.

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod location;
pub mod profile;
pub mod wallet;

pub use auth::*;
pub use catalog::*;
pub use chat::*;
pub use location::*;
pub use profile::*;
pub use wallet::*;

use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: u64,
}

impl<T> Page<T> {
    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_navigation_flags() {
        let page: Page<u8> = serde_json::from_str(r#"{"items":[1,2],"page":1,"total_pages":3}"#)
            .unwrap();
        assert!(page.has_next());
        assert!(!page.has_previous());
        assert_eq!(page.total, 0);
    }
}

//! Status enums for marketplace entities.

use serde::{Deserialize, Serialize};

/// Moderation status of a product listing.
///
/// New listings wait for review before buyers can see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    PendingReview,
    Active,
    Rejected,
    OutOfStock,
}

impl ProductStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingReview => "Pending review",
            Self::Active => "Active",
            Self::Rejected => "Rejected",
            Self::OutOfStock => "Out of stock",
        }
    }
}

/// Direction of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// Settlement state of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Successful,
    Failed,
}

/// Account role on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Buyer,
    Seller,
}

/// Identity verification state of a seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Pending,
    Verified,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::PendingReview).unwrap(),
            "\"pending_review\""
        );
        let status: ProductStatus = serde_json::from_str("\"out_of_stock\"").unwrap();
        assert_eq!(status, ProductStatus::OutOfStock);
        assert_eq!(status.label(), "Out of stock");
    }
}

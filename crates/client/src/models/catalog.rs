//! Catalog: category tree and products.

use chrono::{DateTime, Utc};
use kasuwa_core::{
    BrandId, CategoryId, Price, PricingTier, ProductId, ProductStatus, SubCategoryId, UserId,
    VariantId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A top-level category with its subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<SubCategory>,
}

/// A subcategory with the brands sold under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: String,
    #[serde(default)]
    pub brands: Vec<Brand>,
}

/// A brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

/// A product as shown in search results and seller listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub min_order_quantity: Option<u32>,
}

impl ProductSummary {
    /// Price in naira.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::naira(self.price)
    }
}

/// Full product detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    pub category_id: CategoryId,
    #[serde(default)]
    pub subcategory_id: Option<SubCategoryId>,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    pub seller_id: UserId,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub min_order_quantity: Option<u32>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A purchasable variation of a product (colour, size, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub id: Option<VariantId>,
    pub label: String,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub pricing_tiers: Vec<PricingTier>,
}

/// Editable product fields. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

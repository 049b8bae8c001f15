//! Search and filter state for product listings.
//!
//! Changing any filter sends the listing back to page 1, since the old page
//! number means nothing against a different result set.

use kasuwa_core::{AmountError, BrandId, CategoryId, SubCategoryId, parse_amount};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Page;

/// Default page size.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Errors raised while editing filters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A price bound did not parse.
    #[error("invalid {bound} price: {source}")]
    Price {
        /// `minimum` or `maximum`.
        bound: &'static str,
        /// Parse failure.
        source: AmountError,
    },
    /// Minimum above maximum.
    #[error("minimum price is above maximum price")]
    InvertedRange,
}

/// Filter and pagination state of a product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    search: Option<String>,
    category: Option<CategoryId>,
    subcategory: Option<SubCategoryId>,
    brand: Option<BrandId>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    page: u32,
    per_page: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            subcategory: None,
            brand: None,
            min_price: None,
            max_price: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ProductFilter {
    /// No filters, first page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Search text, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Selected category.
    #[must_use]
    pub const fn category(&self) -> Option<&CategoryId> {
        self.category.as_ref()
    }

    /// Selected subcategory.
    #[must_use]
    pub const fn subcategory(&self) -> Option<&SubCategoryId> {
        self.subcategory.as_ref()
    }

    /// Selected brand.
    #[must_use]
    pub const fn brand(&self) -> Option<&BrandId> {
        self.brand.as_ref()
    }

    /// Set the search text; blank clears it.
    pub fn set_search(&mut self, text: &str) {
        let text = text.trim();
        self.search = (!text.is_empty()).then(|| text.to_owned());
        self.page = 1;
    }

    /// Choose a category. Subcategory and brand are cleared when it changes.
    pub fn set_category(&mut self, category: Option<CategoryId>) {
        if self.category != category {
            self.subcategory = None;
            self.brand = None;
        }
        self.category = category;
        self.page = 1;
    }

    /// Choose a subcategory. Brand is cleared when it changes.
    pub fn set_subcategory(&mut self, subcategory: Option<SubCategoryId>) {
        if self.subcategory != subcategory {
            self.brand = None;
        }
        self.subcategory = subcategory;
        self.page = 1;
    }

    /// Choose a brand.
    pub fn set_brand(&mut self, brand: Option<BrandId>) {
        self.brand = brand;
        self.page = 1;
    }

    /// Set the price range from display amounts; blank bounds are open.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound does not parse or `min > max`. The previous
    /// range is kept on error.
    pub fn set_price_range(&mut self, min: &str, max: &str) -> Result<(), FilterError> {
        let parse = |raw: &str, bound: &'static str| -> Result<Option<Decimal>, FilterError> {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            parse_amount(raw)
                .map(Some)
                .map_err(|source| FilterError::Price { bound, source })
        };

        let min = parse(min, "minimum")?;
        let max = parse(max, "maximum")?;
        if let (Some(lo), Some(hi)) = (min, max)
            && lo > hi
        {
            return Err(FilterError::InvertedRange);
        }

        self.min_price = min;
        self.max_price = max;
        self.page = 1;
        Ok(())
    }

    /// Drop every filter and go back to page 1.
    pub fn clear(&mut self) {
        *self = Self {
            per_page: self.per_page,
            ..Self::default()
        };
    }

    /// Move to the next page if `current` has one.
    pub const fn next_page<T>(&mut self, current: &Page<T>) -> bool {
        if current.has_next() {
            self.page = current.page + 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous page if there is one.
    pub const fn previous_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a page (clamped to at least 1).
    pub fn go_to_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Query parameters for `GET /products`.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: String| query.push((key.to_owned(), value));

        if let Some(search) = &self.search {
            push("search", search.clone());
        }
        if let Some(category) = &self.category {
            push("category", category.to_string());
        }
        if let Some(subcategory) = &self.subcategory {
            push("subcategory", subcategory.to_string());
        }
        if let Some(brand) = &self.brand {
            push("brand", brand.to_string());
        }
        if let Some(min) = self.min_price {
            push("min_price", min.to_string());
        }
        if let Some(max) = self.max_price {
            push("max_price", max.to_string());
        }
        push("page", self.page.to_string());
        push("per_page", self.per_page.to_string());
        query
    }
}

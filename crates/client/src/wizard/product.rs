//! Seller "add product" flow: details and images, then variants with
//! quantity pricing tiers. Submitted as one multipart `POST /products`.

use std::sync::Arc;

use kasuwa_core::{PricingTier, minimum_order_quantity, parse_amount};
use rust_decimal::Decimal;

use super::{Completion, FieldErrors, Flow, Step, Wizard};
use crate::http::{FormPayload, Request};
use crate::images::{ImageError, StagedImage, StagedImages};
use crate::models::{Category, Variant};
use crate::selection::{Cascade, SelectionError};

const NAME_MAX_CHARS: usize = 120;

/// Steps of [`AddProductFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStep {
    /// Name, description, price, category and images.
    ProductDetails,
    /// Variants and their pricing tiers.
    VariantSetup,
}

impl Step for ProductStep {
    const FIRST: Self = Self::ProductDetails;

    fn next(self) -> Option<Self> {
        match self {
            Self::ProductDetails => Some(Self::VariantSetup),
            Self::VariantSetup => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::ProductDetails => None,
            Self::VariantSetup => Some(Self::ProductDetails),
        }
    }
}

/// One pricing tier as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierRow {
    pub min_quantity: String,
    /// Blank for an open-ended tier.
    pub max_quantity: String,
    pub unit_price: String,
}

/// One variant as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantRow {
    pub label: String,
    /// Blank when stock is not tracked.
    pub stock: String,
    pub tiers: Vec<TierRow>,
}

/// Everything collected by [`AddProductFlow`].
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    /// Display amount, e.g. `₦1,250.50`.
    pub price: String,
    /// Category, subcategory and brand ids.
    pub category: Cascade<3>,
    pub images: StagedImages,
    pub variants: Vec<VariantRow>,
}

impl ProductDraft {
    /// Cascade level of the category.
    pub const CATEGORY: usize = 0;
    /// Cascade level of the subcategory.
    pub const SUBCATEGORY: usize = 1;
    /// Cascade level of the brand.
    pub const BRAND: usize = 2;
}

/// The add-product flow over a loaded category tree.
#[derive(Debug, Clone)]
pub struct AddProductFlow {
    categories: Arc<[Category]>,
}

impl AddProductFlow {
    /// Create the flow with the category tree used by the pickers.
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: categories.into(),
        }
    }

    /// The category tree.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn validate_details(&self, draft: &ProductDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let name = draft.name.trim();
        if name.is_empty() {
            errors.insert("name", "product name is required");
        } else if name.chars().count() > NAME_MAX_CHARS {
            errors.insert(
                "name",
                format!("product name must be at most {NAME_MAX_CHARS} characters"),
            );
        }
        if draft.description.trim().is_empty() {
            errors.insert("description", "description is required");
        }

        match parse_amount(&draft.price) {
            Ok(price) if price <= Decimal::ZERO => {
                errors.insert("price", "price must be greater than zero");
            }
            Ok(_) => {}
            Err(e) => errors.insert("price", e.to_string()),
        }

        if draft.category.selected(ProductDraft::CATEGORY).is_none() {
            errors.insert("category", "choose a category");
        }
        if draft.category.selected(ProductDraft::SUBCATEGORY).is_none() {
            errors.insert("subcategory", "choose a subcategory");
        }
        let brand_offered = !draft
            .category
            .options(self.categories(), ProductDraft::BRAND)
            .is_empty();
        if brand_offered && draft.category.selected(ProductDraft::BRAND).is_none() {
            errors.insert("brand", "choose a brand");
        }

        if draft.images.is_empty() {
            errors.insert("images", "add at least one image");
        }
        errors
    }
}

impl Flow for AddProductFlow {
    type Step = ProductStep;
    type Fields = ProductDraft;

    const NAME: &'static str = "add_product";

    fn validate(&self, step: ProductStep, fields: &ProductDraft) -> FieldErrors {
        match step {
            ProductStep::ProductDetails => self.validate_details(fields),
            ProductStep::VariantSetup => parse_variants(&fields.variants).err().unwrap_or_default(),
        }
    }

    fn prepare(&self, fields: &ProductDraft) -> Result<Request, FieldErrors> {
        let mut errors = FieldErrors::new();
        let price = parse_amount(&fields.price).map_err(|e| {
            errors.insert("price", e.to_string());
        });
        let variants = parse_variants(&fields.variants).map_err(|e| errors.extend(e));
        let (Ok(price), Ok(variants)) = (price, variants) else {
            return Err(errors);
        };

        let variants_json = serde_json::to_string(&variants).map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.insert("variants", e.to_string());
            errors
        })?;
        let min_order_quantity =
            minimum_order_quantity(variants.iter().flat_map(|v| &v.pricing_tiers));

        let mut form = FormPayload::new()
            .text("name", fields.name.trim())
            .text("description", fields.description.trim())
            .text("price", price.to_string());
        for (field, level) in [
            ("category_id", ProductDraft::CATEGORY),
            ("subcategory_id", ProductDraft::SUBCATEGORY),
            ("brand_id", ProductDraft::BRAND),
        ] {
            if let Some(id) = fields.category.selected(level) {
                form = form.text(field, id);
            }
        }
        if let Some(moq) = min_order_quantity {
            form = form.text("min_order_quantity", moq.to_string());
        }
        form = form.text("variants", variants_json);
        form = fields.images.append_to(form, "images");

        Ok(Request::post("/products").multipart(form))
    }

    fn completion(&self) -> Completion {
        Completion::PendingReview
    }
}

fn parse_variants(rows: &[VariantRow]) -> Result<Vec<Variant>, FieldErrors> {
    let mut errors = FieldErrors::new();
    if rows.is_empty() {
        errors.insert("variants", "add at least one variant");
        return Err(errors);
    }

    let mut variants = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let label = row.label.trim();
        if label.is_empty() {
            errors.insert(format!("variants[{i}].label"), "variant name is required");
        }

        let stock = match row.stock.trim() {
            "" => None,
            raw => raw.parse::<u32>().map_or_else(
                |_| {
                    errors.insert(
                        format!("variants[{i}].stock"),
                        format!("'{raw}' is not a valid stock count"),
                    );
                    None
                },
                Some,
            ),
        };

        if row.tiers.is_empty() {
            errors.insert(format!("variants[{i}].tiers"), "add at least one pricing tier");
        }
        let mut tiers = Vec::with_capacity(row.tiers.len());
        for (j, tier) in row.tiers.iter().enumerate() {
            match PricingTier::parse(&tier.min_quantity, &tier.max_quantity, &tier.unit_price) {
                Ok(tier) => tiers.push(tier),
                Err(e) => errors.insert(format!("variants[{i}].tiers[{j}]"), e.to_string()),
            }
        }
        if tiers.len() == row.tiers.len() && overlapping(&tiers) {
            errors.insert(
                format!("variants[{i}].tiers"),
                "pricing tiers must not overlap",
            );
        }

        variants.push(Variant {
            id: None,
            label: label.to_owned(),
            stock,
            pricing_tiers: tiers,
        });
    }

    if errors.is_empty() {
        Ok(variants)
    } else {
        Err(errors)
    }
}

fn overlapping(tiers: &[PricingTier]) -> bool {
    let mut sorted: Vec<&PricingTier> = tiers.iter().collect();
    sorted.sort_by_key(|tier| tier.min_quantity);
    sorted.windows(2).any(|pair| match pair {
        [lower, upper] => lower
            .max_quantity
            .is_none_or(|max| max >= upper.min_quantity),
        _ => false,
    })
}

impl Wizard<AddProductFlow> {
    /// Choose the category; subcategory and brand are cleared when it changes.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a known category.
    pub fn select_category(&mut self, id: &str) -> Result<(), SelectionError> {
        self.update_with(|flow, draft| {
            draft
                .category
                .select(flow.categories(), ProductDraft::CATEGORY, id)
        })
    }

    /// Choose the subcategory; brand is cleared when it changes.
    ///
    /// # Errors
    ///
    /// Returns an error if no category is chosen or `id` is not one of its
    /// subcategories.
    pub fn select_subcategory(&mut self, id: &str) -> Result<(), SelectionError> {
        self.update_with(|flow, draft| {
            draft
                .category
                .select(flow.categories(), ProductDraft::SUBCATEGORY, id)
        })
    }

    /// Choose the brand.
    ///
    /// # Errors
    ///
    /// Returns an error if no subcategory is chosen or `id` is not one of its
    /// brands.
    pub fn select_brand(&mut self, id: &str) -> Result<(), SelectionError> {
        self.update_with(|flow, draft| {
            draft
                .category
                .select(flow.categories(), ProductDraft::BRAND, id)
        })
    }

    /// Swap in a freshly loaded category tree, dropping selections it no
    /// longer offers. Returns whether a selection was dropped.
    pub fn reload_categories(&mut self, categories: Vec<Category>) -> bool {
        self.flow.categories = categories.into();
        self.fields.category.prune(&*self.flow.categories)
    }

    /// Stage an image for upload.
    ///
    /// A rejection is also recorded as the `images` field error; a staged
    /// image clears it.
    ///
    /// # Errors
    ///
    /// Returns `LimitReached` when four images are already staged.
    pub fn stage_image(&mut self, image: StagedImage) -> Result<(), ImageError> {
        match self.fields.images.stage(image) {
            Ok(()) => {
                self.errors.remove("images");
                Ok(())
            }
            Err(e) => {
                self.errors.set("images", e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use kasuwa_core::{BrandId, CategoryId, SubCategoryId};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::http::{Body, FormPart};
    use crate::models::{Brand, SubCategory};
    use crate::wizard::WizardError;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: CategoryId::new("fashion"),
                name: "Fashion".to_string(),
                subcategories: vec![
                    SubCategory {
                        id: SubCategoryId::new("fabrics"),
                        name: "Fabrics".to_string(),
                        brands: Vec::new(),
                    },
                    SubCategory {
                        id: SubCategoryId::new("shoes"),
                        name: "Shoes".to_string(),
                        brands: vec![Brand {
                            id: BrandId::new("nike"),
                            name: "Nike".to_string(),
                        }],
                    },
                ],
            },
            Category {
                id: CategoryId::new("food"),
                name: "Food".to_string(),
                subcategories: vec![SubCategory {
                    id: SubCategoryId::new("grains"),
                    name: "Grains".to_string(),
                    brands: Vec::new(),
                }],
            },
        ]
    }

    fn tier(min: &str, max: &str, price: &str) -> TierRow {
        TierRow {
            min_quantity: min.to_string(),
            max_quantity: max.to_string(),
            unit_price: price.to_string(),
        }
    }

    fn image(name: &str) -> StagedImage {
        StagedImage::new(name, vec![0x89, 0x50, 0x4E, 0x47]).unwrap()
    }

    fn details_filled() -> Wizard<AddProductFlow> {
        let mut wizard = Wizard::new(AddProductFlow::new(categories()));
        wizard.update(|d| {
            d.name = "Ankara fabric".to_string();
            d.description = "Six yards, cotton".to_string();
            d.price = "₦1,250.50".to_string();
        });
        wizard.select_category("fashion").unwrap();
        wizard.select_subcategory("fabrics").unwrap();
        wizard.stage_image(image("front.png")).unwrap();
        wizard
    }

    fn text_parts(request: &Request) -> Vec<(String, String)> {
        let Some(Body::Multipart(form)) = request.body() else {
            panic!("expected multipart body");
        };
        form.parts()
            .iter()
            .filter_map(|part| match part {
                FormPart::Text { name, value } => Some((name.clone(), value.clone())),
                FormPart::File { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_details_step_requires_fields() {
        let mut wizard = Wizard::new(AddProductFlow::new(categories()));
        let Err(WizardError::Invalid(errors)) = wizard.advance() else {
            panic!("expected validation errors");
        };
        for field in ["name", "description", "price", "category", "subcategory", "images"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert_eq!(wizard.current_step(), ProductStep::ProductDetails);
    }

    #[test]
    fn test_malformed_price_is_an_error_not_zero() {
        let mut wizard = details_filled();
        wizard.update(|d| d.price = "1.2.3".to_string());
        assert!(wizard.advance().is_err());
        assert!(wizard.errors().contains("price"));

        wizard.update(|d| d.price = "₦0".to_string());
        assert!(wizard.advance().is_err());
    }

    #[test]
    fn test_brand_required_only_when_offered() {
        let mut wizard = details_filled();
        wizard.select_subcategory("shoes").unwrap();
        assert!(wizard.advance().is_err());
        assert!(wizard.errors().contains("brand"));

        wizard.select_brand("nike").unwrap();
        assert_eq!(wizard.advance().unwrap(), ProductStep::VariantSetup);
    }

    #[test]
    fn test_category_change_clears_dependents() {
        let mut wizard = details_filled();
        wizard.select_subcategory("shoes").unwrap();
        wizard.select_brand("nike").unwrap();

        wizard.select_category("food").unwrap();
        let category = &wizard.fields().category;
        assert_eq!(category.selected(ProductDraft::SUBCATEGORY), None);
        assert_eq!(category.selected(ProductDraft::BRAND), None);

        assert!(matches!(
            wizard.select_subcategory("shoes"),
            Err(SelectionError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_reload_prunes_missing_subcategory() {
        let mut wizard = details_filled();
        let mut reloaded = categories();
        reloaded[0].subcategories.retain(|s| s.id.as_str() != "fabrics");
        assert!(wizard.reload_categories(reloaded));
        assert_eq!(wizard.fields().category.path(), vec!["fashion".to_string()]);
    }

    #[test]
    fn test_fifth_image_rejected() {
        let mut wizard = details_filled();
        for name in ["2.png", "3.png", "4.png"] {
            wizard.stage_image(image(name)).unwrap();
        }
        assert_eq!(
            wizard.stage_image(image("5.png")),
            Err(ImageError::LimitReached { max: 4 })
        );
        assert_eq!(wizard.fields().images.len(), 4);
        assert_eq!(
            wizard.errors().get("images"),
            Some(ImageError::LimitReached { max: 4 }.to_string().as_str())
        );
    }

    #[test]
    fn test_staging_image_clears_images_error() {
        let mut wizard = Wizard::new(AddProductFlow::new(categories()));
        assert!(matches!(wizard.advance(), Err(WizardError::Invalid(_))));
        assert!(wizard.errors().contains("images"));

        wizard.stage_image(image("front.png")).unwrap();
        assert!(!wizard.errors().contains("images"));
    }

    #[test]
    fn test_variant_errors_are_indexed() {
        let mut wizard = details_filled();
        wizard.advance().unwrap();
        wizard.update(|d| {
            d.variants = vec![
                VariantRow {
                    label: "Blue".to_string(),
                    stock: "lots".to_string(),
                    tiers: vec![tier("10", "5", "₦1,000")],
                },
                VariantRow {
                    label: String::new(),
                    stock: String::new(),
                    tiers: Vec::new(),
                },
            ];
        });
        let Err(WizardError::Invalid(errors)) = wizard.begin_submit() else {
            panic!("expected validation errors");
        };
        assert!(errors.contains("variants[0].stock"));
        assert!(errors.contains("variants[0].tiers[0]"));
        assert!(errors.contains("variants[1].label"));
        assert!(errors.contains("variants[1].tiers"));
    }

    #[test]
    fn test_overlapping_tiers_rejected() {
        let rows = vec![VariantRow {
            label: "Red".to_string(),
            stock: String::new(),
            tiers: vec![tier("1", "", "₦1,000"), tier("10", "", "₦900")],
        }];
        let errors = parse_variants(&rows).unwrap_err();
        assert!(errors.contains("variants[0].tiers"));
    }

    #[test]
    fn test_prepare_normalises_price_and_minimum_order() {
        let mut wizard = details_filled();
        wizard.advance().unwrap();
        wizard.update(|d| {
            d.variants = vec![
                VariantRow {
                    label: "Blue".to_string(),
                    stock: "40".to_string(),
                    tiers: vec![tier("10", "49", "₦1,200"), tier("50", "", "₦1,000")],
                },
                VariantRow {
                    label: "Red".to_string(),
                    stock: String::new(),
                    tiers: vec![tier("5", "", "NGN 1,300")],
                },
            ];
        });

        let submission = wizard.begin_submit().unwrap();
        let request = &submission.request;
        assert_eq!(request.endpoint(), "/products");

        let parts = text_parts(request);
        let value = |name: &str| {
            parts
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(value("price").as_deref(), Some("1250.50"));
        assert_eq!(value("min_order_quantity").as_deref(), Some("5"));
        assert_eq!(value("category_id").as_deref(), Some("fashion"));
        assert_eq!(value("subcategory_id").as_deref(), Some("fabrics"));
        assert_eq!(value("brand_id"), None);

        let variants: serde_json::Value =
            serde_json::from_str(&value("variants").unwrap()).unwrap();
        assert_eq!(variants[0]["label"], "Blue");
        assert_eq!(variants[0]["stock"], 40);
        assert_eq!(variants[1]["pricing_tiers"][0]["min_quantity"], 5);

        let Some(Body::Multipart(form)) = request.body() else {
            panic!("expected multipart body");
        };
        assert_eq!(form.file_count(), 1);
    }
}

//! Catalog browsing and seller listings.

use std::path::PathBuf;

use clap::Args;
use kasuwa_client::filter::ProductFilter;
use kasuwa_client::images::StagedImage;
use kasuwa_client::models::{Category, ProductSummary, ProductUpdate};
use kasuwa_client::wizard::{AddProductFlow, Completion, TierRow, VariantRow, Wizard};
use kasuwa_core::{BrandId, CategoryId, Price, ProductId, SubCategoryId, parse_amount};

use super::Context;
use crate::error::CliError;

/// Filters for `products search`.
pub struct SearchArgs {
    pub query: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub min_price: String,
    pub max_price: String,
    pub page: u32,
}

/// Arguments of `products add`.
#[derive(Args)]
pub struct AddArgs {
    /// Product name
    #[arg(short, long)]
    name: String,

    /// Description
    #[arg(short, long)]
    description: String,

    /// Listed price (e.g. "₦1,250.50")
    #[arg(short, long)]
    price: String,

    /// Category id
    #[arg(long)]
    category: String,

    /// Subcategory id
    #[arg(long)]
    subcategory: String,

    /// Brand id, when the subcategory has brands
    #[arg(long)]
    brand: Option<String>,

    /// Variant as `LABEL;STOCK;MIN-MAX@PRICE|MIN-@PRICE` (stock and MAX may be blank)
    #[arg(long = "variant", required = true)]
    variants: Vec<String>,

    /// Image file (up to 4)
    #[arg(long = "image", required = true)]
    images: Vec<PathBuf>,
}

/// Print the category tree.
pub async fn categories(ctx: &Context) -> Result<(), CliError> {
    let categories = ctx.catalog().categories().await?;
    print_tree(&categories);
    Ok(())
}

fn print_tree(categories: &[Category]) {
    for category in categories {
        println!("{} ({})", category.name, category.id);
        for sub in &category.subcategories {
            println!("  {} ({})", sub.name, sub.id);
            for brand in &sub.brands {
                println!("    {} ({})", brand.name, brand.id);
            }
        }
    }
}

fn print_summary(product: &ProductSummary) {
    let moq = product
        .min_order_quantity
        .map(|q| format!(", min order {q}"))
        .unwrap_or_default();
    println!(
        "{}  {}  {}  [{}{}]",
        product.id,
        product.name,
        product.price().display(),
        product.status.label(),
        moq
    );
}

/// Search the catalog.
pub async fn search(ctx: &Context, args: SearchArgs) -> Result<(), CliError> {
    let mut filter = ProductFilter::new();
    if let Some(query) = &args.query {
        filter.set_search(query);
    }
    filter.set_category(args.category.map(CategoryId::new));
    filter.set_subcategory(args.subcategory.map(SubCategoryId::new));
    filter.set_brand(args.brand.map(BrandId::new));
    filter.set_price_range(&args.min_price, &args.max_price)?;
    filter.go_to_page(args.page);

    let page = ctx.catalog().search_products(&filter).await?;
    if page.items.is_empty() {
        println!("No products found");
        return Ok(());
    }
    for product in &page.items {
        print_summary(product);
    }
    println!("Page {} of {} ({} products)", page.page, page.total_pages, page.total);
    Ok(())
}

/// Show one product.
pub async fn show(ctx: &Context, id: &str) -> Result<(), CliError> {
    let product = ctx.catalog().product(&ProductId::new(id)).await?;
    println!("{} ({})", product.name, product.status.label());
    println!("{}", Price::naira(product.price).display());
    if !product.description.is_empty() {
        println!("\n{}\n", product.description);
    }
    for variant in &product.variants {
        let stock = variant
            .stock
            .map(|s| format!(" ({s} in stock)"))
            .unwrap_or_default();
        println!("- {}{}", variant.label, stock);
        for tier in &variant.pricing_tiers {
            let range = tier.max_quantity.map_or_else(
                || format!("{}+", tier.min_quantity),
                |max| format!("{}-{max}", tier.min_quantity),
            );
            println!("    {range}: {} each", Price::naira(tier.unit_price).display());
        }
    }
    Ok(())
}

/// List the seller's own products.
pub async fn mine(ctx: &Context, page: u32) -> Result<(), CliError> {
    let page = ctx.catalog().seller_products(page.max(1)).await?;
    for product in &page.items {
        print_summary(product);
    }
    println!("Page {} of {}", page.page, page.total_pages);
    Ok(())
}

/// List a new product through the add-product flow.
pub async fn add(ctx: &Context, args: AddArgs) -> Result<(), CliError> {
    let categories = ctx.catalog().categories().await?;
    let mut wizard = Wizard::new(AddProductFlow::new(categories));

    wizard.update(|draft| {
        draft.name = args.name;
        draft.description = args.description;
        draft.price = args.price;
    });
    wizard.select_category(&args.category)?;
    wizard.select_subcategory(&args.subcategory)?;
    if let Some(brand) = &args.brand {
        wizard.select_brand(brand)?;
    }
    for path in &args.images {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CliError::io(path, e))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        wizard.stage_image(StagedImage::new(file_name, bytes)?)?;
    }
    wizard.advance()?;

    let variants = args
        .variants
        .iter()
        .map(String::as_str)
        .map(parse_variant)
        .collect::<Result<Vec<_>, _>>()?;
    wizard.update(|draft| draft.variants = variants);

    if wizard.submit(ctx.client()).await? == Completion::PendingReview {
        println!("Product submitted. It will appear once it has been reviewed.");
    }
    Ok(())
}

/// Edit a listing.
pub async fn update(
    ctx: &Context,
    id: &str,
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    stock: Option<u32>,
) -> Result<(), CliError> {
    let update = ProductUpdate {
        name,
        description,
        price: price.as_deref().map(parse_amount).transpose()?,
        stock,
    };
    let product = ctx
        .catalog()
        .update_product(&ProductId::new(id), &update)
        .await?;
    println!("Updated {} ({})", product.name, product.status.label());
    Ok(())
}

/// Delete a listing.
pub async fn delete(ctx: &Context, id: &str) -> Result<(), CliError> {
    ctx.catalog().delete_product(&ProductId::new(id)).await?;
    println!("Deleted {id}. See your remaining products with `kasuwa products mine`.");
    Ok(())
}

/// Parse `LABEL;STOCK;MIN-MAX@PRICE|MIN-@PRICE`.
fn parse_variant(raw: &str) -> Result<VariantRow, CliError> {
    let invalid = |reason: &str| CliError::InvalidArgument(format!("variant '{raw}': {reason}"));

    let mut fields = raw.splitn(3, ';');
    let (Some(label), Some(stock), Some(tiers)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(invalid("expected LABEL;STOCK;TIERS"));
    };

    let tiers = tiers
        .split('|')
        .filter(|tier| !tier.trim().is_empty())
        .map(|tier| {
            let (range, price) = tier
                .split_once('@')
                .ok_or_else(|| invalid("each tier needs MIN-MAX@PRICE"))?;
            let (min, max) = range.split_once('-').unwrap_or((range, ""));
            Ok(TierRow {
                min_quantity: min.trim().to_owned(),
                max_quantity: max.trim().to_owned(),
                unit_price: price.trim().to_owned(),
            })
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    Ok(VariantRow {
        label: label.trim().to_owned(),
        stock: stock.trim().to_owned(),
        tiers,
    })
}

//! Saved products.

use kasuwa_core::ProductId;

use super::Context;
use crate::error::CliError;

pub async fn list(ctx: &Context) -> Result<(), CliError> {
    let products = ctx.wishlist().list().await?;
    if products.is_empty() {
        println!("Your wishlist is empty");
    }
    for product in &products {
        println!("{}  {}  {}", product.id, product.name, product.price().display());
    }
    Ok(())
}

pub async fn add(ctx: &Context, id: &str) -> Result<(), CliError> {
    ctx.wishlist().add(&ProductId::new(id)).await?;
    println!("Saved {id}");
    Ok(())
}

pub async fn remove(ctx: &Context, id: &str) -> Result<(), CliError> {
    ctx.wishlist().remove(&ProductId::new(id)).await?;
    println!("Removed {id}");
    Ok(())
}

//! Seller wallet.

use super::Context;
use crate::error::CliError;

pub async fn balance(ctx: &Context) -> Result<(), CliError> {
    let balance = ctx.wallet().balance().await?;
    println!("Available: {}", balance.available().display());
    println!("Pending:   {}", balance.pending().display());
    Ok(())
}

pub async fn transactions(ctx: &Context, page: u32) -> Result<(), CliError> {
    let page = ctx.wallet().transactions(page.max(1)).await?;
    if page.items.is_empty() {
        println!("No transactions");
    }
    for tx in &page.items {
        println!(
            "{}  {:>14}  {:?}  {}",
            tx.created_at.format("%Y-%m-%d %H:%M"),
            tx.signed_display(),
            tx.status,
            tx.description
        );
    }
    if page.has_next() {
        println!("More: kasuwa wallet transactions --page {}", page.page + 1);
    }
    Ok(())
}

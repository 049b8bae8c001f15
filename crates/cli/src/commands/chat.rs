//! Conversations.

use kasuwa_client::models::ProductSummary;
use kasuwa_client::thread::{ChatThread, ThreadEntry};
use kasuwa_client::wizard::{ShareProductFlow, Wizard};
use kasuwa_core::{ConversationId, ProductId};

use super::Context;
use crate::error::CliError;

pub async fn list(ctx: &Context) -> Result<(), CliError> {
    let conversations = ctx.chat().conversations().await?;
    if conversations.is_empty() {
        println!("No conversations yet");
    }
    for conversation in &conversations {
        let unread = if conversation.unread_count > 0 {
            format!(" ({} unread)", conversation.unread_count)
        } else {
            String::new()
        };
        println!(
            "{}  {}{}  {}",
            conversation.id,
            conversation.counterpart,
            unread,
            conversation.last_message.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}

fn print_entries(thread: &ChatThread) {
    for entry in thread.entries() {
        match entry {
            ThreadEntry::Confirmed(message) => {
                let product = message
                    .product
                    .as_ref()
                    .map(|p| format!(" [product {}]", p.product_id))
                    .unwrap_or_default();
                println!(
                    "{}  {}: {}{}",
                    message.sent_at.format("%Y-%m-%d %H:%M"),
                    message.sender_id,
                    message.text,
                    product
                );
            }
            ThreadEntry::Pending(pending) => println!("(sending)  {}", pending.text),
        }
    }
}

pub async fn show(ctx: &Context, id: &str) -> Result<(), CliError> {
    let mut thread = ChatThread::new();
    thread.load(&ctx.chat(), ConversationId::new(id)).await?;
    print_entries(&thread);
    Ok(())
}

pub async fn send(ctx: &Context, id: &str, text: &str) -> Result<(), CliError> {
    let chat = ctx.chat();
    let mut thread = ChatThread::new();
    thread.load(&chat, ConversationId::new(id)).await?;
    thread.send(&chat, text).await?;
    print_entries(&thread);
    Ok(())
}

/// Every product the seller has listed, across all pages.
async fn all_seller_products(ctx: &Context) -> Result<Vec<ProductSummary>, CliError> {
    let catalog = ctx.catalog();
    let mut products = Vec::new();
    let mut page_number = 1;
    loop {
        let page = catalog.seller_products(page_number).await?;
        let more = page.has_next();
        products.extend(page.items);
        if !more {
            return Ok(products);
        }
        page_number += 1;
    }
}

pub async fn share(ctx: &Context, id: &str, product: &str, note: String) -> Result<(), CliError> {
    let products = all_seller_products(ctx).await?;
    let mut wizard = Wizard::new(ShareProductFlow::new(ConversationId::new(id), products));

    wizard.update(|draft| draft.product = Some(ProductId::new(product)));
    wizard.advance()?;
    wizard.update(|draft| draft.note = note);
    wizard.submit(ctx.client()).await?;

    println!("Shared {product} in {id}");
    Ok(())
}

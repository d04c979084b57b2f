//! Cart commands.

use anyhow::Result;
use bazaar_commerce::catalog::CatalogClient;
use bazaar_commerce::ids::{LineItemId, ProductId, VariantId};
use bazaar_commerce::store::LineItemStore;

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CartCommand::Add {
            product,
            variant,
            quantity,
        } => add(&product, variant, quantity, ctx).await,
        CartCommand::Show => show(ctx).await,
        CartCommand::Update { line, quantity } => update(&line, quantity, ctx).await,
        CartCommand::Remove { line } => remove(&line, ctx).await,
        CartCommand::Clear => clear(ctx).await,
    }
}

async fn add(product_id: &str, variant: Option<String>, quantity: i64, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let product = catalog.product(&ProductId::new(product_id)).await?;
    let variant = match variant {
        Some(id) => Some(product.variant(&VariantId::new(id))?),
        None => product.default_variant(),
    };

    let repo = ctx.repository()?;
    let session = ctx.session()?;
    let line_id = repo.modify(&session, |store| store.add_product(&product, variant, quantity))?;

    let label = match variant.and_then(|v| v.name.as_deref()) {
        Some(name) => format!("{} ({name})", product.name),
        None => product.name.clone(),
    };
    ctx.output
        .success(&format!("Added {quantity} × {label} to cart"));
    ctx.output.debug(&format!("Line {line_id}"));
    Ok(())
}

async fn show(ctx: &Context) -> Result<()> {
    let store = ctx.repository()?.load(&ctx.session()?)?;

    if ctx.output.is_json() {
        ctx.output.json(&store.cart());
        return Ok(());
    }

    print_cart(&store, ctx)
}

async fn update(line: &str, quantity: i64, ctx: &Context) -> Result<()> {
    let repo = ctx.repository()?;
    let session = ctx.session()?;
    let line_id = LineItemId::new(line);

    repo.modify(&session, |store| store.update_quantity(&line_id, quantity))?;

    if quantity <= 0 {
        ctx.output.success(&format!("Removed line {line_id}"));
    } else {
        ctx.output
            .success(&format!("Line {line_id} now has quantity {quantity}"));
    }
    Ok(())
}

async fn remove(line: &str, ctx: &Context) -> Result<()> {
    let repo = ctx.repository()?;
    let session = ctx.session()?;
    let line_id = LineItemId::new(line);

    let removed = repo.modify(&session, |store| store.remove_item(&line_id))?;
    ctx.output.success(&format!("Removed {}", removed.name));
    Ok(())
}

async fn clear(ctx: &Context) -> Result<()> {
    let repo = ctx.repository()?;
    let session = ctx.session()?;

    repo.modify(&session, |store| {
        store.clear_cart();
        Ok(())
    })?;
    ctx.output.success("Cart cleared");
    Ok(())
}

fn print_cart(store: &LineItemStore, ctx: &Context) -> Result<()> {
    ctx.output.header("Cart");
    if store.cart().is_empty() {
        ctx.output.info("Your cart is empty");
    } else {
        ctx.output.line_items(store.cart());
        ctx.output.blank();
        ctx.output.kv("Items", &store.item_count().to_string());
    }

    if store.preorder().is_some() {
        ctx.output.blank();
        ctx.output
            .warn("A preorder is pending; checkout will place the preorder instead of the cart");
    }
    Ok(())
}

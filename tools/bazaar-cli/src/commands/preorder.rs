//! Preorder slot commands.

use anyhow::Result;
use bazaar_commerce::catalog::CatalogClient;
use bazaar_commerce::ids::{ProductId, VariantId};
use bazaar_commerce::money::amount::RawAmount;
use bazaar_commerce::store::PreorderRequest;

use super::{PreorderArgs, PreorderCommand};
use crate::context::Context;

/// Run the preorder command.
pub async fn run(args: PreorderArgs, ctx: &Context) -> Result<()> {
    match args.command {
        PreorderCommand::Set {
            product,
            variant,
            quantity,
            price,
        } => set(&product, variant, quantity, price, ctx).await,
        PreorderCommand::Show => show(ctx).await,
        PreorderCommand::Clear => clear(ctx).await,
    }
}

async fn set(
    product_id: &str,
    variant: Option<String>,
    quantity: i64,
    price: Option<String>,
    ctx: &Context,
) -> Result<()> {
    let catalog = ctx.catalog()?;
    let product = catalog.product(&ProductId::new(product_id)).await?;
    let variant = match variant {
        Some(id) => Some(product.variant(&VariantId::new(id))?),
        None => product.default_variant(),
    };

    let price = match price {
        Some(text) => RawAmount::from(text.as_str()),
        None => RawAmount::from(product.unit_price(variant)),
    };
    let mut request = PreorderRequest::new(product.id.clone(), product.name.clone(), price, quantity)
        .image(product.primary_image());
    if let Some(v) = variant {
        request = request.variant(v.id.clone(), v.name.clone());
    }

    let repo = ctx.repository()?;
    let session = ctx.session()?;
    let item = repo.modify(&session, |store| store.set_preorder(request.clone()).cloned())?;

    ctx.output.success(&format!(
        "Preordered {} × {} at {}",
        item.quantity,
        item.name,
        item.unit_price.display()
    ));
    ctx.output
        .info("Checkout now places this preorder; your cart is kept for later");
    Ok(())
}

async fn show(ctx: &Context) -> Result<()> {
    let store = ctx.repository()?.load(&ctx.session()?)?;

    if ctx.output.is_json() {
        ctx.output.json(&store.preorder());
        return Ok(());
    }

    ctx.output.header("Preorder");
    match store.preorder() {
        Some(item) => ctx.output.line_items(std::slice::from_ref(item)),
        None => ctx.output.info("No preorder pending"),
    }
    Ok(())
}

async fn clear(ctx: &Context) -> Result<()> {
    let repo = ctx.repository()?;
    let session = ctx.session()?;

    repo.modify(&session, |store| {
        store.clear_preorder();
        Ok(())
    })?;
    ctx.output.success("Preorder cleared");
    Ok(())
}

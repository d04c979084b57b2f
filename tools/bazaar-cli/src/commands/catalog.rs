//! Catalog browsing commands.

use anyhow::{bail, Result};
use bazaar_commerce::catalog::{
    load_product_page, load_shell, CatalogClient, Product, QuantitySelector,
};
use bazaar_commerce::ids::{CategoryId, ProductId};

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::stock_badge;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::List { category } => list(category, ctx).await,
        CatalogCommand::Show { id } => show(&id, ctx).await,
    }
}

async fn list(category: Option<String>, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let shell = match load_shell(&catalog).await {
        Ok(shell) => shell,
        Err(e) => bail!("{e} (back to {})", e.escape),
    };

    let products = match &category {
        Some(id) => catalog.products_by_category(&CategoryId::new(id.clone())).await?,
        None => catalog.products().await?,
    };

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&shell.business.name);
    if !shell.categories.is_empty() {
        let names: Vec<&str> = shell.categories.iter().map(|c| c.name.as_str()).collect();
        ctx.output.kv("Categories", &names.join(" · "));
    }
    ctx.output.blank();

    if products.is_empty() {
        ctx.output.info("No products found");
        return Ok(());
    }

    for product in &products {
        let price = product
            .listing_price()
            .map(|p| p.display())
            .unwrap_or_else(|| "-".to_string());
        let tag = if product.preorder_only { "preorder" } else { "" };
        ctx.output
            .table_row(&[product.id.as_str(), &product.name, &price, tag], &[14, 36, 12, 8]);
    }

    Ok(())
}

async fn show(id: &str, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let page = match load_product_page(&catalog, &ProductId::new(id)).await {
        Ok(page) => page,
        Err(e) => bail!("{e} (back to {})", e.escape),
    };

    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }

    let product = &page.product;
    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    if let Some(price) = product.listing_price() {
        ctx.output.kv("Price", &price.display());
    }
    ctx.output.kv("Image", product.primary_image());
    if let Some(desc) = &product.short_description {
        ctx.output.kv("About", desc);
    }
    if product.preorder_only {
        ctx.output
            .kv("Availability", "preorder only (use `bazaar preorder set`)");
    } else {
        let stock = product.available_stock(product.default_variant());
        ctx.output.kv("Availability", &stock_badge(stock));
        let mut selector = QuantitySelector::new(stock);
        while selector.can_increment() {
            selector.increment();
        }
        ctx.output.kv("Quantity", &format!("1 to {}", selector.count()));
    }

    print_variants(product, ctx);

    if !page.related.is_empty() {
        ctx.output.header("Related products");
        for related in &page.related {
            ctx.output
                .list_item(&format!("{} ({})", related.name, related.id));
        }
    }

    Ok(())
}

fn print_variants(product: &Product, ctx: &Context) {
    if product.variants.is_empty() {
        return;
    }
    ctx.output.header("Variants");
    for variant in &product.variants {
        let name = variant.name.as_deref().unwrap_or("-");
        let price = match (variant.effective_price(), variant.selling_price) {
            (Some(now), Some(was)) if variant.is_marked_down() => {
                format!("{} (was {})", now.display(), was.display())
            }
            (Some(now), _) => now.display(),
            (None, _) => "-".to_string(),
        };
        ctx.output.table_row(
            &[variant.id.as_str(), name, &price, &stock_badge(variant.stock)],
            &[14, 20, 24, 16],
        );
    }
}

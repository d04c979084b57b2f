//! Price the items that checkout would place.

use anyhow::Result;
use serde_json::json;

use super::QuoteArgs;
use crate::context::Context;

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let store = ctx.repository()?.load(&ctx.session()?)?;
    let items = store.effective_items();
    let policy = ctx.config.pricing_policy()?;
    let pricing = policy.calculate(items, args.area, args.payment, store.currency)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "is_preorder": store.is_preorder_checkout(),
            "delivery_area": args.area,
            "payment_method": args.payment,
            "pricing": pricing,
        }));
        return Ok(());
    }

    ctx.output.header(if store.is_preorder_checkout() {
        "Preorder quote"
    } else {
        "Cart quote"
    });
    if items.is_empty() {
        ctx.output.info("Nothing to check out");
        return Ok(());
    }

    ctx.output.pricing(&pricing, policy.deposit_percent);
    ctx.output.blank();
    let area = args.area.map_or("not chosen", |a| a.display_name());
    ctx.output.kv("Delivery area", area);
    ctx.output.kv("Payment", args.payment.display_name());
    Ok(())
}

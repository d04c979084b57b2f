//! Place the order for the current session.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use bazaar_commerce::checkout::{CheckoutForm, OrderSubmitter};
use bazaar_commerce::navigation::{LogNotifier, Notifier};
use bazaar_commerce::pricing::DeliveryArea;
use dialoguer::{Confirm, Input, Select};

use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(mut args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let repo = ctx.repository()?;
    let session = ctx.session()?;
    let mut store = repo.load(&session)?;

    let interactive = !args.yes && ctx.output.is_interactive();
    if interactive && !store.is_empty() {
        prompt_missing(&mut args)?;
    }

    let mut form = CheckoutForm::new()
        .name(args.name)
        .phone(args.phone)
        .address(args.address)
        .payment(args.payment)
        .transaction_id(args.txn);
    if let Some(area) = args.area {
        form = form.delivery_area(area);
    }
    if let Some(notes) = args.notes {
        form = form.notes(notes);
    }

    let policy = ctx.config.pricing_policy()?;
    if !store.is_empty() {
        ctx.output.header(if store.is_preorder_checkout() {
            "Preorder checkout"
        } else {
            "Checkout"
        });
        let pricing = policy.calculate(
            store.effective_items(),
            form.delivery_area,
            form.payment_method,
            store.currency,
        )?;
        ctx.output.pricing(&pricing, policy.deposit_percent);
        ctx.output.blank();
        ctx.output.kv("Payment", form.payment_method.display_name());
    }

    if interactive && !store.is_empty() {
        let confirmed = Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let output = Arc::new(ctx.output.clone());
    // JSON output has no toasts; notifications go to the log instead.
    let notifier: Arc<dyn Notifier> = if ctx.output.is_json() {
        Arc::new(LogNotifier)
    } else {
        output.clone()
    };
    let mut submitter = OrderSubmitter::new(notifier, output)
        .with_config(ctx.config.submission())
        .with_policy(policy);

    let spinner = ctx.output.spinner("Placing order...");
    let result = submitter.submit(&mut store, &form).await;
    spinner.finish_and_clear();

    let payload = result.context("Order not placed")?;
    repo.save(&session, &store)?;

    ctx.order_logger(&session)
        .info_value("order placed", "order", &payload);
    if ctx.output.is_json() {
        ctx.output.json(&payload);
    }
    Ok(())
}

/// Ask for whatever the flags left out.
fn prompt_missing(args: &mut CheckoutArgs) -> Result<()> {
    if args.name.trim().is_empty() {
        args.name = Input::<String>::new().with_prompt("Full name").interact_text()?;
    }
    if args.phone.trim().is_empty() {
        args.phone = Input::<String>::new()
            .with_prompt("Mobile number (11 digits)")
            .interact_text()?;
    }
    if args.address.trim().is_empty() {
        args.address = Input::<String>::new().with_prompt("Address").interact_text()?;
    }
    if args.area.is_none() {
        let areas = [DeliveryArea::InsideDhaka, DeliveryArea::OutsideDhaka];
        let labels: Vec<&str> = areas.iter().map(|a| a.display_name()).collect();
        let selection = Select::new()
            .with_prompt("Delivery area")
            .items(&labels)
            .default(0)
            .interact()?;
        args.area = areas.get(selection).copied();
    }
    if args.payment.requires_transaction_id() && args.txn.trim().is_empty() {
        args.txn = Input::<String>::new()
            .with_prompt(format!("{} transaction ID", args.payment.display_name()))
            .interact_text()?;
    }
    Ok(())
}

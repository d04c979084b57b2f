//! Output formatting for the CLI.

use bazaar_commerce::navigation::{Navigator, Notifier, Route};
use bazaar_commerce::pricing::CheckoutPricing;
use bazaar_commerce::store::LineItem;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stderr(),
        }
    }

    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    pub fn blank(&self) {
        if !self.json {
            println!();
        }
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  ").trim_end());
    }

    /// Print line items, one per row, with their line IDs.
    pub fn line_items(&self, items: &[LineItem]) {
        for item in items {
            let label = match &item.variant_name {
                Some(variant) => format!("{} ({variant})", item.name),
                None => item.name.clone(),
            };
            let price = format!("{} × {}", item.unit_price.display(), item.quantity);
            let tag = if item.is_preorder { "preorder" } else { "" };
            self.table_row(&[item.id.as_str(), &label, &price, tag], &[18, 32, 16, 8]);
        }
    }

    /// Print the order summary.
    pub fn pricing(&self, pricing: &CheckoutPricing, deposit_percent: i64) {
        if self.json {
            return;
        }
        for line in &pricing.lines {
            let mut charge = format!("{} × {}", line.charged_unit_price.display(), line.quantity);
            if line.is_deposit {
                charge.push_str(&format!(" ({deposit_percent}% deposit)"));
            }
            self.table_row(
                &[&line.name, &charge, &line.contribution.display()],
                &[32, 28, 12],
            );
        }
        println!();
        self.kv("Subtotal", &pricing.subtotal.display());
        self.kv("Delivery", &pricing.delivery_charge.display());
        println!(
            "  {}: {}",
            style("Total").bold(),
            style(pricing.grand_total.display()).bold()
        );
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json || !self.term.is_term() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Whether prompts can be shown.
    pub fn is_interactive(&self) -> bool {
        !self.json && self.term.is_term()
    }
}

impl Notifier for Output {
    fn success(&self, message: &str) {
        Output::success(self, message);
    }

    fn error(&self, message: &str) {
        Output::error(self, message);
    }
}

impl Navigator for Output {
    fn navigate(&self, route: Route) {
        self.debug(&format!("Navigating to {route}"));
        if route == Route::OrderConfirmation {
            self.info("Your order has been received. Thank you for shopping with us!");
        }
    }
}

/// Colour a stock count.
pub fn stock_badge(stock: Option<i64>) -> String {
    match stock {
        Some(n) if n > 0 => style(format!("{n} in stock")).green().to_string(),
        Some(_) => style("out of stock").red().to_string(),
        None => style("stock unknown").dim().to_string(),
    }
}

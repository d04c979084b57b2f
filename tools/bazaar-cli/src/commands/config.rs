//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    ctx.output.info("[store]");
    ctx.output.kv("name", &config.store.name);
    ctx.output.kv("currency", &config.store.currency);

    ctx.output.info("[pricing]");
    ctx.output
        .kv("deposit_percent", &config.pricing.deposit_percent.to_string());
    ctx.output
        .kv("inside_dhaka_fee", &config.pricing.inside_dhaka_fee.to_string());
    ctx.output
        .kv("outside_dhaka_fee", &config.pricing.outside_dhaka_fee.to_string());

    ctx.output.info("[checkout]");
    ctx.output
        .kv("submit_delay_ms", &config.checkout.submit_delay_ms.to_string());
    ctx.output
        .kv("redirect_delay_ms", &config.checkout.redirect_delay_ms.to_string());

    ctx.output.info("[catalog]");
    ctx.output.kv("path", &config.catalog.path.display().to_string());

    ctx.output.info("[logging]");
    ctx.output.kv(
        "format",
        match config.logging.format {
            bazaar_observability::LogFormat::Json => "json",
            bazaar_observability::LogFormat::Human => "human",
        },
    );
    ctx.output.kv("filter", &config.logging.filter);

    ctx.output.info("[storage]");
    ctx.output.kv("dir", &config.storage.dir.display().to_string());

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("bazaar.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let name = ctx
        .cwd
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Bazaar");

    fs::write(&config_path, generate_default_config(name))?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, mut warnings) = ctx.config.check();
    let catalog = ctx.resolve_path(&ctx.config.catalog.path);
    if !catalog.is_file() {
        warnings.push(format!("catalog file not found: {}", catalog.display()));
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

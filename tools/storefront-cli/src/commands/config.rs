//! Configuration management commands.

use anyhow::{bail, Result};
use storefront_core::config::{generate_default_config, CONFIG_FILE_NAMES};

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
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
    ctx.output.kv("environment", ctx.config.environment.as_str());

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("title", &ctx.config.store.title);

    let cookie = ctx.config.cookie_options();
    ctx.output.info("");
    ctx.output.info("[cookie]");
    ctx.output.kv("name", &ctx.config.cookie.name);
    ctx.output.kv("max_age_days", &ctx.config.cookie.max_age_days.to_string());
    ctx.output.kv("secure", &cookie.secure.to_string());
    ctx.output.kv("same_site", cookie.same_site.as_str());

    ctx.output.info("");
    ctx.output.info("[persistence]");
    ctx.output.kv("mode", ctx.config.persistence.mode.as_str());
    ctx.output.kv("data_dir", &ctx.data_dir().display().to_string());

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = generate_default_config(&ctx.config.store.title);
    std::fs::write(&config_path, content)?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    let cache = &ctx.config.cache;
    ctx.output.info("[cache]");
    ctx.output.kv("ledger_key", &cache.ledger_key);
    ctx.output.kv("cookie_path", &cache.cookie_path);
    ctx.output
        .kv("utc_offset_minutes", &cache.utc_offset_minutes.to_string());
    ctx.output.kv(
        "default_expires",
        &serde_json::to_string(&cache.default_expires)?,
    );

    ctx.output.info("[store]");
    ctx.output.kv(
        "data_dir",
        &ctx.resolve_path(&ctx.config.store.data_dir).display().to_string(),
    );
    ctx.output.kv("durable", &ctx.config.store.durable.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let path = ctx.cwd.join(CONFIG_NAMES[0]);

    if path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(&path, generate_default_config())?;
    ctx.output
        .success(&format!("Created {}", path.display()));
    Ok(())
}

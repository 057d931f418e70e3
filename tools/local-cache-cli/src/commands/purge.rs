//! Delete expired values.

use anyhow::Result;

use crate::context::Context;

/// Run the purge command.
pub fn run(ctx: &Context) -> Result<()> {
    let cache = ctx.open_cache()?;
    let removed = cache.durable()?.purge_expired()?;
    ctx.save_cache(&cache)?;

    if ctx.output.is_json() {
        ctx.output.json(&removed);
        return Ok(());
    }

    if removed.is_empty() {
        ctx.output.info("Nothing to purge");
    } else {
        for key in &removed {
            ctx.output.kv("removed", key);
        }
        ctx.output
            .success(&format!("Purged {} expired value(s)", removed.len()));
    }

    Ok(())
}

//! Read a cached value.

use anyhow::Result;

use super::{backend_options, GetArgs};
use crate::context::Context;

/// Run the get command.
pub fn run(args: GetArgs, ctx: &Context) -> Result<()> {
    let cache = ctx.open_cache()?;
    let found = cache.get_with(&args.key, &backend_options(args.cookies))?;

    // Reads can delete expired entries.
    ctx.save_cache(&cache)?;

    match found {
        Some(value) if ctx.output.is_json() => ctx.output.json(&value),
        Some(serde_json::Value::String(text)) => ctx.output.value(&text),
        Some(value) => ctx.output.value(&serde_json::to_string_pretty(&value)?),
        None if ctx.output.is_json() => ctx.output.json(&serde_json::Value::Null),
        None => ctx.output.warn(&format!("No value for '{}'", args.key)),
    }

    Ok(())
}

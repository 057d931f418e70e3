//! Write a value.

use anyhow::Result;
use serde_json::Value;

use super::{backend_options, SetArgs};
use crate::context::Context;

/// Run the set command.
pub fn run(args: SetArgs, ctx: &Context) -> Result<()> {
    let cache = ctx.open_cache()?;

    let mut options = backend_options(args.cookies);
    options.expires = args.expiry.to_spec();

    let value = parse_value(&args.value);
    let expires_at = cache.expiration_for(&options)?;
    cache.set_with(&args.key, &value, &options)?;
    ctx.save_cache(&cache)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "key": args.key,
            "expires_at": expires_at,
            "cookies": args.cookies,
        }));
    } else if value.is_null() {
        ctx.output.success(&format!("Cleared '{}'", args.key));
    } else {
        ctx.output
            .success(&format!("Stored '{}' until {}", args.key, expires_at.to_rfc3339()));
    }

    Ok(())
}

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

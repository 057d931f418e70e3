//! Delete a value.

use anyhow::Result;

use super::{backend_options, RmArgs};
use crate::context::Context;

/// Run the rm command.
pub fn run(args: RmArgs, ctx: &Context) -> Result<()> {
    let cache = ctx.open_cache()?;
    cache.remove_with(&args.key, &backend_options(args.cookies))?;
    ctx.save_cache(&cache)?;

    ctx.output.success(&format!("Removed '{}'", args.key));
    Ok(())
}

//! List tracked expirations.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use crate::context::Context;
use crate::output::format_duration;

#[derive(Serialize)]
struct LedgerRow {
    key: String,
    expires_at: String,
    remaining_secs: i64,
}

/// Run the ledger command.
pub fn run(ctx: &Context) -> Result<()> {
    let cache = ctx.open_cache()?;
    let ledger = cache.durable()?.ledger()?;
    let now = Utc::now();

    let rows: Vec<LedgerRow> = ledger
        .iter()
        .map(|entry| LedgerRow {
            key: entry.key.clone(),
            expires_at: entry.expires_at.to_rfc3339(),
            remaining_secs: (entry.expires_at - now).num_seconds(),
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header("Tracked Expirations");
    if rows.is_empty() {
        ctx.output.info("No tracked keys");
        return Ok(());
    }

    let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(3).max(3);
    let widths = [key_width, 25, 10];
    ctx.output.table_row(&["KEY", "EXPIRES", "REMAINING"], &widths);
    for row in &rows {
        let remaining = format_duration(row.remaining_secs);
        ctx.output.table_row(
            &[row.key.as_str(), row.expires_at.as_str(), remaining.as_str()],
            &widths,
        );
    }

    Ok(())
}

//! CLI command implementations.

pub mod config;
pub mod get;
pub mod ledger;
pub mod purge;
pub mod rm;
pub mod set;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use local_cache::{CacheOptions, ExpirySpec};

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Key to read.
    pub key: String,

    /// Read from the cookie jar.
    #[arg(long)]
    pub cookies: bool,
}

/// Arguments for the set command.
#[derive(Args)]
pub struct SetArgs {
    /// Key to write.
    pub key: String,

    /// Value as JSON; text that is not valid JSON is stored as a string.
    pub value: String,

    /// Write to the cookie jar.
    #[arg(long)]
    pub cookies: bool,

    #[command(flatten)]
    pub expiry: ExpiryArgs,
}

/// Expiration flags. With none given the configured default applies.
#[derive(Args, Default)]
pub struct ExpiryArgs {
    /// Absolute expiration (RFC 3339).
    #[arg(long)]
    pub date: Option<DateTime<Utc>>,

    /// Expire at the next midnight.
    #[arg(long)]
    pub at_midnight: bool,

    /// Minutes from now.
    #[arg(long, allow_hyphen_values = true)]
    pub minutes: Option<i64>,

    /// Hours from now.
    #[arg(long, allow_hyphen_values = true)]
    pub hours: Option<i64>,

    /// Days from now.
    #[arg(long, allow_hyphen_values = true)]
    pub days: Option<i64>,

    /// Months from now.
    #[arg(long, allow_hyphen_values = true)]
    pub months: Option<i64>,

    /// Years from now.
    #[arg(long, allow_hyphen_values = true)]
    pub years: Option<i64>,
}

impl ExpiryArgs {
    /// The expiration these flags describe, if any flag was given.
    pub fn to_spec(&self) -> Option<ExpirySpec> {
        let spec = ExpirySpec {
            date: self.date,
            at_midnight: self.at_midnight,
            minutes: self.minutes,
            hours: self.hours,
            days: self.days,
            months: self.months,
            years: self.years,
        };
        (spec != ExpirySpec::default()).then_some(spec)
    }
}

/// Arguments for the rm command.
#[derive(Args)]
pub struct RmArgs {
    /// Key to delete.
    pub key: String,

    /// Delete from the cookie jar.
    #[arg(long)]
    pub cookies: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Create a config file in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Options selecting the cookie jar when `cookies` is set.
pub fn backend_options(cookies: bool) -> CacheOptions {
    CacheOptions {
        use_cookies: cookies,
        expires: None,
    }
}

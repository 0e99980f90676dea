//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Voucherify client API from the command line.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection settings.
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the loaded client config.
#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Path to a client.toml config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Client application id.
    #[arg(long, global = true)]
    pub app_id: Option<String>,

    /// Client secret token.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Tracking identity for calls without a customer.
    #[arg(long, global = true)]
    pub tracking_id: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a voucher code, or promotions when no code is given.
    Validate {
        /// Voucher code.
        code: Option<String>,

        /// Order amount, e.g. 10,50 or 10.50.
        #[arg(long)]
        amount: Option<String>,

        /// Metadata entry, repeatable.
        #[arg(long = "metadata", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        metadata: Vec<(String, String)>,

        /// Customer source id.
        #[arg(long)]
        source_id: Option<String>,
    },

    /// Redeem a voucher code.
    Redeem {
        /// Voucher code.
        code: String,

        /// Customer source id.
        #[arg(long)]
        source_id: Option<String>,

        /// Order amount, e.g. 10,50 or 10.50.
        #[arg(long)]
        amount: Option<String>,
    },

    /// Publish a voucher from a campaign.
    Publish {
        /// Campaign name.
        campaign: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// List vouchers.
    List {
        #[arg(long)]
        campaign: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Track a custom event.
    Track {
        /// Event name.
        event: String,

        /// Metadata entry, repeatable.
        #[arg(long = "metadata", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        metadata: Vec<(String, String)>,

        /// Customer source id.
        #[arg(long)]
        source_id: Option<String>,
    },

    /// Price after applying a voucher (offline).
    Price(PricingArgs),

    /// Discount a voucher gives (offline).
    Discount(PricingArgs),
}

#[derive(Debug, Args)]
pub struct PricingArgs {
    /// Base price in major units.
    pub base: f64,

    /// Voucher JSON, as returned by validate.
    #[arg(long)]
    pub voucher: String,

    /// Unit price for UNIT discounts.
    #[arg(long)]
    pub unit_price: Option<f64>,
}

/// Parses `key=value`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

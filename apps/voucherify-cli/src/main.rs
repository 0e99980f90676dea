//! # Voucherify CLI
//!
//! Runs client API calls and offline pricing from the command line.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          voucherify <command>                           │
//! │                                                                         │
//! │  validate/redeem/publish/list/track                                     │
//! │     client.toml + VOUCHERIFY_* env + flags ──► VoucherifyClient ──► API │
//! │                                                                         │
//! │  price/discount                                                         │
//! │     --voucher JSON ──► voucherify-core pricing (no network)             │
//! │                                                                         │
//! │  stdout: success payload (pretty JSON)                                  │
//! │  stderr: {"type":"error",...} and logs, exit code 1                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;

use clap::Parser;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use voucherify_client::{
    ClientConfig, ClientError, Customer, ErrorObject, ListFilters, Order, PublishPayload,
    RedeemPayload, TrackEvent, ValidateParams, VoucherifyClient,
};
use voucherify_core::validation::{parse_amount_input, validate_email};
use voucherify_core::{PricingError, ValidationError, Voucher};

use crate::cli::{Cli, Commands, ConnectionArgs, PricingArgs};

/// Failures of a single command.
#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Input(#[from] ValidationError),

    #[error("Invalid voucher JSON: {0}")]
    VoucherJson(#[from] serde_json::Error),
}

impl CommandError {
    fn to_error_object(&self) -> ErrorObject {
        match self {
            CommandError::Client(e) => e.to_error_object(),
            other => ErrorObject::new(other.to_string(), Value::Null),
        }
    }

    /// Hint for amounts the API refused.
    fn hint(&self) -> Option<&'static str> {
        match self {
            CommandError::Client(e) => e
                .api_error_key()
                .filter(|key| key.is_amount_error())
                .map(|_| "The order amount was rejected; pass --amount as a positive number."),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.to_error_object())?);
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            std::process::exit(1);
        }
    }
}

/// Initializes tracing on stderr.
///
/// ## Log Levels
/// - Set via RUST_LOG environment variable
/// - Default: warnings, plus info from the SDK crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,voucherify=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<Value, CommandError> {
    let connection = cli.connection;

    let response = match cli.command {
        Commands::Price(args) => {
            let voucher = parse_voucher(&args)?;
            let price = voucher.calculate_price(args.base, args.unit_price)?;
            return Ok(json!({ "price": price }));
        }
        Commands::Discount(args) => {
            let voucher = parse_voucher(&args)?;
            let discount = voucher.calculate_discount(args.base, args.unit_price)?;
            return Ok(json!({ "discount": discount }));
        }
        Commands::Validate {
            code,
            amount,
            metadata,
            source_id,
        } => {
            let params = ValidateParams {
                code,
                amount: amount.as_deref().map(parse_amount_input).transpose()?,
                metadata: to_map(metadata),
                customer: source_id.map(Customer::with_source_id),
                ..Default::default()
            };
            build_client(&connection)?.validate(params).await?
        }
        Commands::Redeem {
            code,
            source_id,
            amount,
        } => {
            let order = amount
                .as_deref()
                .map(parse_amount_input)
                .transpose()?
                .map(|amount| Order {
                    amount: Some(amount),
                    ..Default::default()
                });
            let payload = RedeemPayload {
                customer: source_id.map(Customer::with_source_id),
                order,
                ..Default::default()
            };
            build_client(&connection)?.redeem(&code, payload).await?
        }
        Commands::Publish {
            campaign,
            email,
            name,
            phone,
        } => {
            if let Some(email) = &email {
                validate_email(email)?;
            }
            let payload = PublishPayload {
                customer: Some(Customer {
                    email,
                    name,
                    phone,
                    ..Default::default()
                }),
                ..Default::default()
            };
            build_client(&connection)?.publish(&campaign, payload).await?
        }
        Commands::List {
            campaign,
            category,
            limit,
        } => {
            let filters = ListFilters {
                campaign,
                category,
                limit,
                ..Default::default()
            };
            build_client(&connection)?.list_vouchers(filters).await?
        }
        Commands::Track {
            event,
            metadata,
            source_id,
        } => {
            let event = TrackEvent {
                event,
                metadata: to_map(metadata),
                customer: source_id.map(Customer::with_source_id),
            };
            build_client(&connection)?.track(event).await?
        }
    };

    Ok(response.into_body())
}

/// Loads config, applies flag overrides, and builds the client.
fn build_client(args: &ConnectionArgs) -> Result<VoucherifyClient, ClientError> {
    let mut config = ClientConfig::load(args.config.clone())?;

    if let Some(app_id) = &args.app_id {
        config.application_id = app_id.clone();
    }
    if let Some(token) = &args.token {
        config.token = token.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    config.validate()?;

    debug!(api_base = %config.api_base, "Client config ready");
    let mut client = VoucherifyClient::new(config)?;
    if let Some(tracking_id) = &args.tracking_id {
        client.set_identity(tracking_id.clone());
    }
    Ok(client)
}

fn parse_voucher(args: &PricingArgs) -> Result<Voucher, CommandError> {
    Ok(serde_json::from_str(&args.voucher)?)
}

fn to_map(pairs: Vec<(String, String)>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voucherify_core::ApiErrorKey;

    fn pricing(args: &[&str]) -> Result<Value, CommandError> {
        let cli = Cli::parse_from(args);
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(run(cli))
    }

    #[test]
    fn test_price_command() {
        let out = pricing(&[
            "voucherify",
            "price",
            "100",
            "--voucher",
            r#"{"discount":{"type":"PERCENT","percent_off":20}}"#,
        ])
        .unwrap();
        assert_eq!(out, json!({ "price": 80.0 }));
    }

    #[test]
    fn test_discount_command_with_unit_price() {
        let out = pricing(&[
            "voucherify",
            "discount",
            "50",
            "--voucher",
            r#"{"discount":{"type":"UNIT","unit_off":2}}"#,
            "--unit-price",
            "12.5",
        ])
        .unwrap();
        assert_eq!(out, json!({ "discount": 25.0 }));
    }

    #[test]
    fn test_pricing_errors_become_error_objects() {
        let err = pricing(&["voucherify", "price", "10", "--voucher", "{}"]).unwrap_err();
        assert!(matches!(err, CommandError::Pricing(_)));
        assert_eq!(err.to_error_object().kind, "error");

        let err = pricing(&["voucherify", "price", "10", "--voucher", "not json"]).unwrap_err();
        assert!(matches!(err, CommandError::VoucherJson(_)));
    }

    #[test]
    fn test_amount_hint() {
        let err = CommandError::Client(ClientError::UnexpectedStatus {
            status: 400,
            body: Some(json!({ "key": ApiErrorKey::InvalidNumber.as_str() })),
        });
        assert!(err.hint().is_some());

        let err = CommandError::Client(ClientError::UnexpectedStatus {
            status: 400,
            body: Some(json!({ "key": "invalid_customer_phone" })),
        });
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_to_map() {
        let map = to_map(vec![("lang".into(), "en".into())]);
        assert_eq!(Value::Object(map), json!({ "lang": "en" }));
    }
}

//! # voucherify-client: Client API Layer for the Voucherify SDK
//!
//! Talks to the Voucherify client-side API: validates, redeems and
//! publishes vouchers, lists them, and tracks customer events.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                VoucherifyClient (cheap to clone)                 │  │
//! │  │                                                                  │  │
//! │  │  ClientConfig (credentials, timeout, tracking id, channel)       │  │
//! │  │  Arc<dyn Transport>                                              │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ QueryBuilder   │  │   Transport    │  │  interpret_response    │    │
//! │  │                │  │                │  │                        │    │
//! │  │ code, amount,  │  │ reqwest or any │  │ status 200-399 and a   │    │
//! │  │ item[0][k],    │  │ embedder impl  │  │ recognized body shape  │    │
//! │  │ metadata[k]    │  │                │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  DELIVERY:                                                             │
//! │  • async fn → ClientResult<ApiResponse>                                │
//! │  • dispatch(prepare_*(..), cb) → cb gets Ok(payload) or ErrorObject    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - `VoucherifyClient` and its operations
//! - [`config`] - Credentials and settings (TOML + env)
//! - [`error`] - Client error types
//! - [`protocol`] - Endpoints, payloads, response shapes
//! - [`query`] - Bracket-notation query string encoding
//! - [`transport`] - `Transport` trait and the `reqwest` implementation
//! - [`callback`] - Callback delivery and `ErrorObject`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use voucherify_client::{ValidateParams, VoucherifyClient};
//!
//! let mut client = VoucherifyClient::initialize("app-id", "client-token", None)?;
//! client.set_identity("visitor-42");
//!
//! let response = client.validate(ValidateParams::code("SUMMER20")).await?;
//! if let Some(voucher) = response.voucher() {
//!     println!("Price: {}", voucher.calculate_price(100.0, None)?);
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod query;
pub mod transport;

// =============================================================================
// Re-exports
// =============================================================================

pub use callback::{into_outcome, ErrorObject, Outcome};
pub use client::{PreparedRequest, VoucherifyClient};
pub use config::{ClientConfig, DEFAULT_API_BASE, DEFAULT_CHANNEL, DEFAULT_TIMEOUT_MS};
pub use error::{ClientError, ClientResult};
pub use protocol::{
    Address, ApiResponse, Customer, Endpoint, ListFilters, Order, OrderItem, PublishPayload,
    RedeemPayload, ResponseShape, TrackEvent, ValidateParams,
};
pub use query::QueryBuilder;
pub use transport::{
    interpret_response, HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport,
};

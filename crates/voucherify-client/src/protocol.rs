//! # API Protocol
//!
//! Endpoints, request payloads and response shapes of the Voucherify client
//! API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Client API (v1)                                │
//! │                                                                         │
//! │  Operation      Method  Path                             Success shape  │
//! │  ─────────────  ──────  ───────────────────────────────  ────────────── │
//! │  validate       GET     /client/v1/validate              valid: bool    │
//! │  validate promo GET     /client/v1/promotions/validation valid: bool    │
//! │  redeem         POST    /client/v1/redeem                result: string │
//! │  publish        POST    /client/v1/publish               voucher: {}    │
//! │  list vouchers  GET     /client/v1/vouchers              vouchers: []   │
//! │  track          POST    /client/v1/events                object:"event" │
//! │                                                                         │
//! │  GET parameters go in the query string, POST payloads in a JSON body.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payload structs model the fields this SDK fills in and keep everything
//! else in a flattened `extra` map, so callers can send fields the SDK
//! doesn't know about.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use voucherify_core::{Money, Voucher};

use crate::transport::HttpMethod;

// =============================================================================
// Endpoints
// =============================================================================

/// The fixed set of endpoints the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Validate,
    ValidatePromotion,
    Redeem,
    Publish,
    ListVouchers,
    Events,
}

impl Endpoint {
    /// Path relative to the API base.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Validate => "/client/v1/validate",
            Endpoint::ValidatePromotion => "/client/v1/promotions/validation",
            Endpoint::Redeem => "/client/v1/redeem",
            Endpoint::Publish => "/client/v1/publish",
            Endpoint::ListVouchers => "/client/v1/vouchers",
            Endpoint::Events => "/client/v1/events",
        }
    }

    /// HTTP method used for this endpoint.
    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::Validate | Endpoint::ValidatePromotion | Endpoint::ListVouchers => {
                HttpMethod::Get
            }
            Endpoint::Redeem | Endpoint::Publish | Endpoint::Events => HttpMethod::Post,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

// =============================================================================
// Shared Payload Parts
// =============================================================================

/// A customer as sent to redeem/publish/track, and as query parameters to
/// validate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Caller's identifier for the customer; falls back to the tracking id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    /// Creates a customer identified by `source_id`.
    pub fn with_source_id(source_id: impl Into<String>) -> Self {
        Customer {
            source_id: Some(source_id.into()),
            ..Self::default()
        }
    }
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// One line of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    /// Unit price in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The order a redemption applies to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order total in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItem>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sets `customer.source_id` to the tracking id when the caller gave none.
///
/// The customer object is always present afterwards, even when there is no
/// tracking id to copy in.
pub(crate) fn fill_source_id(customer: &mut Option<Customer>, tracking_id: Option<&str>) {
    let customer = customer.get_or_insert_with(Customer::default);
    if customer.source_id.is_none() {
        customer.source_id = tracking_id.map(str::to_string);
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Parameters of a validate call.
///
/// Without a code this validates against promotions instead, which needs an
/// amount or items to price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateParams {
    pub code: Option<String>,
    /// Order amount in cents.
    pub amount: Option<Money>,
    pub items: Vec<OrderItem>,
    pub metadata: Map<String, Value>,
    pub customer: Option<Customer>,
}

impl ValidateParams {
    /// Validates a single code.
    pub fn code(code: impl Into<String>) -> Self {
        ValidateParams {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Validates promotions for an order amount.
    pub fn promotion(amount: Money) -> Self {
        ValidateParams {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_item(mut self, item: OrderItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    /// True when there is enough to validate promotions without a code.
    pub fn has_promotion_context(&self) -> bool {
        self.amount.is_some() || !self.items.is_empty()
    }
}

/// Body of a redeem call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedeemPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a publish call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,

    /// Publication channel; defaults to the client's channel marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters of a list-vouchers call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub campaign: Option<String>,
    pub category: Option<String>,
    pub limit: Option<u32>,
    /// Any other filter, passed through verbatim.
    pub extra: BTreeMap<String, String>,
}

impl ListFilters {
    /// Flat `key=value` pairs in a stable order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(campaign) = &self.campaign {
            pairs.push(("campaign".to_string(), campaign.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category".to_string(), category.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

/// Body of a track call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    pub event: String,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl TrackEvent {
    pub fn new(event: impl Into<String>) -> Self {
        TrackEvent {
            event: event.into(),
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }
}

// =============================================================================
// Responses
// =============================================================================

/// The recognized shapes of a successful response body.
///
/// ## Recognition Order
/// ```text
/// valid: bool               → Validation
/// result: string            → Redemption
/// voucher: object           → Publication
/// vouchers: object | array  → VoucherList
/// object: "event", type: s  → Event
/// anything else             → not recognized (ResponseShape error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Validation,
    Redemption,
    Publication,
    VoucherList,
    Event,
}

impl ResponseShape {
    /// Classifies a parsed body, or returns `None` for unrecognized bodies.
    pub fn recognize(body: &Value) -> Option<Self> {
        let obj = body.as_object()?;

        if obj.get("valid").is_some_and(Value::is_boolean) {
            return Some(ResponseShape::Validation);
        }
        if obj.get("result").is_some_and(Value::is_string) {
            return Some(ResponseShape::Redemption);
        }
        if obj.get("voucher").is_some_and(Value::is_object) {
            return Some(ResponseShape::Publication);
        }
        if obj
            .get("vouchers")
            .is_some_and(|v| v.is_object() || v.is_array())
        {
            return Some(ResponseShape::VoucherList);
        }
        if obj.get("object").and_then(Value::as_str) == Some("event")
            && obj.get("type").is_some_and(Value::is_string)
        {
            return Some(ResponseShape::Event);
        }

        None
    }
}

/// A successful, shape-checked response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    shape: ResponseShape,
    body: Value,
}

impl ApiResponse {
    /// Wraps a body, returning it back when its shape isn't recognized.
    pub fn from_body(body: Value) -> Result<Self, Value> {
        match ResponseShape::recognize(&body) {
            Some(shape) => Ok(ApiResponse { shape, body }),
            None => Err(body),
        }
    }

    pub fn shape(&self) -> ResponseShape {
        self.shape
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// `valid` of a validation response; false for other shapes.
    pub fn is_valid(&self) -> bool {
        self.body.get("valid").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Tracking id the service assigned, when present.
    pub fn tracking_id(&self) -> Option<&str> {
        self.body.get("tracking_id").and_then(Value::as_str)
    }

    /// The voucher descriptor carried by the response.
    ///
    /// Validation responses carry `discount`/`gift` at the top level;
    /// publication responses nest them under `voucher`.
    pub fn voucher(&self) -> Option<Voucher> {
        let source = match self.shape {
            ResponseShape::Validation => &self.body,
            ResponseShape::Publication | ResponseShape::Redemption => self.body.get("voucher")?,
            ResponseShape::VoucherList | ResponseShape::Event => return None,
        };
        serde_json::from_value(source.clone()).ok()
    }

    /// Vouchers of a list response. Entries that don't parse are skipped.
    pub fn vouchers(&self) -> Vec<Voucher> {
        self.body
            .get("vouchers")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

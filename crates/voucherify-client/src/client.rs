//! # Voucherify Client
//!
//! One client object per application, configured once, shared by clone.
//!
//! ## Call Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Operation Flow                                 │
//! │                                                                         │
//! │  validate / redeem / publish / list_vouchers / track                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────┐  missing id/token/code                            │
//! │  │ prepare_*        │ ───────────────────────► Err(Configuration)      │
//! │  └────────┬─────────┘  (logged, nothing sent)                           │
//! │           ▼                                                             │
//! │  ┌──────────────────┐                                                   │
//! │  │ Build request    │  query string (GET) or JSON body (POST),          │
//! │  │                  │  tracking-id and channel fallbacks                │
//! │  └────────┬─────────┘                                                   │
//! │           ▼                                                             │
//! │  send: Transport ──► interpret_response ──► Ok(ApiResponse) / Err(..)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests are independent. Concurrent calls share nothing but the
//! immutable config and the transport.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;
use voucherify_core::validation::{sanitize_code, validate_campaign, validate_code, validate_event_name};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::protocol::{
    fill_source_id, ApiResponse, Endpoint, ListFilters, PublishPayload, RedeemPayload,
    TrackEvent, ValidateParams,
};
use crate::query::QueryBuilder;
use crate::transport::{interpret_response, HttpRequest, ReqwestTransport, Transport};

/// Client for the Voucherify client-side API.
#[derive(Debug, Clone)]
pub struct VoucherifyClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl VoucherifyClient {
    /// Creates a client from credentials with the bundled transport.
    ///
    /// A missing or zero timeout falls back to 5000 ms. Empty credentials
    /// are accepted here and rejected by each call.
    pub fn initialize(
        application_id: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> ClientResult<Self> {
        Self::new(ClientConfig::new(application_id, token, timeout))
    }

    /// Creates a client from a full config with the bundled transport.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client that sends through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        info!(
            api_base = %config.api_base,
            transport = transport.name(),
            timeout_ms = config.timeout_ms,
            "Voucherify client initialized"
        );
        VoucherifyClient { config, transport }
    }

    /// Sets the tracking identity used when a call names no customer.
    pub fn set_identity(&mut self, tracking_id: impl Into<String>) {
        let tracking_id = tracking_id.into();
        debug!(%tracking_id, "Tracking identity set");
        self.config.tracking_id = Some(tracking_id);
    }

    pub fn tracking_id(&self) -> Option<&str> {
        self.config.tracking_id.as_deref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Validates a voucher code, or promotions when no code is given.
    pub async fn validate(&self, params: ValidateParams) -> ClientResult<ApiResponse> {
        let prepared = self.prepare_validate(params)?;
        self.send(prepared).await
    }

    /// Redeems a voucher code against an order.
    pub async fn redeem(&self, code: &str, payload: RedeemPayload) -> ClientResult<ApiResponse> {
        let prepared = self.prepare_redeem(code, payload)?;
        self.send(prepared).await
    }

    /// Publishes a voucher from `campaign` to a customer.
    pub async fn publish(&self, campaign: &str, payload: PublishPayload) -> ClientResult<ApiResponse> {
        let prepared = self.prepare_publish(campaign, payload)?;
        self.send(prepared).await
    }

    /// Lists vouchers matching `filters`.
    pub async fn list_vouchers(&self, filters: ListFilters) -> ClientResult<ApiResponse> {
        let prepared = self.prepare_list_vouchers(filters)?;
        self.send(prepared).await
    }

    /// Records a custom event for a customer.
    pub async fn track(&self, event: TrackEvent) -> ClientResult<ApiResponse> {
        let prepared = self.prepare_track(event)?;
        self.send(prepared).await
    }

    /// Sends a prepared request and classifies the response.
    pub async fn send(&self, prepared: PreparedRequest) -> ClientResult<ApiResponse> {
        let PreparedRequest { endpoint, url, body } = prepared;
        debug!(%endpoint, transport = self.transport.name(), "Sending request");

        let request = HttpRequest::new(&self.config, endpoint.method(), url, body);
        let result = match self.transport.send(request).await {
            Ok(response) => interpret_response(response),
            Err(e) => Err(e),
        };

        match &result {
            Ok(response) => debug!(%endpoint, shape = ?response.shape(), "Request succeeded"),
            Err(e) => warn!(%endpoint, error = %e, "Request failed"),
        }
        result
    }

    // =========================================================================
    // Request Preparation
    // =========================================================================
    //
    // Every local check happens here, synchronously. A failure is logged and
    // returned before anything is sent.

    /// Builds a validate request.
    ///
    /// ## Query Parameters
    /// ```text
    /// code=SUMMER20            (absent for promotion validation)
    /// amount=1050              order amount in cents
    /// item[0][product_id]=..   one group per order item
    /// metadata[key]=..
    /// customer[source_id]=..
    /// tracking_id=..           when an identity is set
    /// ```
    pub fn prepare_validate(&self, params: ValidateParams) -> ClientResult<PreparedRequest> {
        let base = self.preflight()?;

        let code = params
            .code
            .as_deref()
            .map(sanitize_code)
            .filter(|code| !code.is_empty());

        let (endpoint, code) = match code {
            Some(code) => (Endpoint::Validate, Some(self.local(validate_code(&code))?)),
            None if params.has_promotion_context() => (Endpoint::ValidatePromotion, None),
            None => return Err(self.local_failure(missing_code())),
        };

        let mut query = QueryBuilder::new(&base, endpoint)?;
        query.push_opt("code", code.as_deref());

        if let Some(amount) = params.amount {
            debug!(%endpoint, %amount, "Order amount");
            query.push("amount", &amount.cents().to_string());
        }
        if !params.items.is_empty() {
            query.push_flattened("item", &serde_json::to_value(&params.items)?);
        }
        if !params.metadata.is_empty() {
            query.push_flattened("metadata", &Value::Object(params.metadata));
        }
        if let Some(customer) = &params.customer {
            query.push_flattened("customer", &serde_json::to_value(customer)?);
        }
        query.push_opt("tracking_id", self.tracking_id());

        Ok(PreparedRequest::new(endpoint, query.build(), None))
    }

    /// Builds a redeem request.
    pub fn prepare_redeem(
        &self,
        code: &str,
        mut payload: RedeemPayload,
    ) -> ClientResult<PreparedRequest> {
        let base = self.preflight()?;

        let code = sanitize_code(code);
        if code.is_empty() {
            return Err(self.local_failure(missing_code()));
        }
        let code = self.local(validate_code(&code))?;

        fill_source_id(&mut payload.customer, self.tracking_id());

        let mut query = QueryBuilder::new(&base, Endpoint::Redeem)?;
        query.push("code", &code);

        let body = serde_json::to_value(&payload)?;
        Ok(PreparedRequest::new(Endpoint::Redeem, query.build(), Some(body)))
    }

    /// Builds a publish request.
    pub fn prepare_publish(
        &self,
        campaign: &str,
        mut payload: PublishPayload,
    ) -> ClientResult<PreparedRequest> {
        let base = self.preflight()?;

        let campaign = validate_campaign(campaign).map_err(|_| {
            self.local_failure(ClientError::Configuration(
                "campaign is required to publish a voucher".into(),
            ))
        })?;

        fill_source_id(&mut payload.customer, self.tracking_id());
        if payload.channel.is_none() {
            payload.channel = Some(self.config.channel.clone());
        }

        let mut query = QueryBuilder::new(&base, Endpoint::Publish)?;
        query.push("campaign", &campaign);

        let body = serde_json::to_value(&payload)?;
        Ok(PreparedRequest::new(Endpoint::Publish, query.build(), Some(body)))
    }

    /// Builds a list-vouchers request.
    pub fn prepare_list_vouchers(&self, filters: ListFilters) -> ClientResult<PreparedRequest> {
        let base = self.preflight()?;

        let mut query = QueryBuilder::new(&base, Endpoint::ListVouchers)?;
        for (key, value) in filters.to_pairs() {
            query.push(&key, &value);
        }

        Ok(PreparedRequest::new(Endpoint::ListVouchers, query.build(), None))
    }

    /// Builds a track request.
    pub fn prepare_track(&self, mut event: TrackEvent) -> ClientResult<PreparedRequest> {
        let base = self.preflight()?;

        event.event = self.local(validate_event_name(&event.event))?;
        fill_source_id(&mut event.customer, self.tracking_id());

        let url = QueryBuilder::new(&base, Endpoint::Events)?.build();
        let body = serde_json::to_value(&event)?;
        Ok(PreparedRequest::new(Endpoint::Events, url, Some(body)))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Credential and base URL checks shared by every operation.
    fn preflight(&self) -> ClientResult<Url> {
        self.config
            .ensure_credentials()
            .and_then(|_| self.config.base_url())
            .map_err(|e| self.local_failure(e))
    }

    fn local<T, E: Into<ClientError>>(&self, result: Result<T, E>) -> ClientResult<T> {
        result.map_err(|e| self.local_failure(e.into()))
    }

    fn local_failure(&self, err: ClientError) -> ClientError {
        error!(error = %err, "Voucherify client ERROR");
        err
    }
}

/// A request that passed every local check, ready for [`VoucherifyClient::send`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    endpoint: Endpoint,
    url: Url,
    body: Option<Value>,
}

impl PreparedRequest {
    fn new(endpoint: Endpoint, url: Url, body: Option<Value>) -> Self {
        PreparedRequest {
            endpoint,
            url,
            body,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

fn missing_code() -> ClientError {
    ClientError::Configuration(
        "could not verify code, because it is missing - please provide Voucher Code".into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Customer, OrderItem, ResponseShape};
    use crate::transport::{HttpMethod, HttpResponse};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use voucherify_core::Money;

    /// Records requests and answers with canned responses.
    #[derive(Debug, Default)]
    struct RecordingTransport {
        requests: Mutex<Vec<HttpRequest>>,
        responses: Mutex<VecDeque<ClientResult<HttpResponse>>>,
    }

    impl RecordingTransport {
        fn replying(body: Value) -> Arc<Self> {
            let transport = Self::default();
            transport.push(Ok(HttpResponse::new(200, body.to_string())));
            Arc::new(transport)
        }

        fn push(&self, response: ClientResult<HttpResponse>) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn last(&self) -> HttpRequest {
            self.requests().pop().expect("no request recorded")
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::new(200, r#"{"valid":true}"#)))
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn client_with(transport: Arc<RecordingTransport>) -> VoucherifyClient {
        let config = ClientConfig::new("app-id", "secret", None);
        VoucherifyClient::with_transport(config, transport)
    }

    fn query_pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn has_pair(url: &Url, key: &str, value: &str) -> bool {
        query_pairs(url)
            .iter()
            .any(|(k, v)| k == key && v == value)
    }

    #[tokio::test]
    async fn test_missing_application_id_never_sends() {
        let transport = Arc::new(RecordingTransport::default());
        let client = VoucherifyClient::with_transport(
            ClientConfig::new("", "secret", None),
            transport.clone(),
        );

        let err = client.validate(ValidateParams::code("SAVE")).await.unwrap_err();
        assert!(err.is_config_error());
        assert!(client.redeem("SAVE", RedeemPayload::default()).await.is_err());
        assert!(client.track(TrackEvent::new("x")).await.is_err());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_never_sends() {
        let transport = Arc::new(RecordingTransport::default());
        let client = VoucherifyClient::with_transport(
            ClientConfig::new("app-id", "", None),
            transport.clone(),
        );

        let err = client.list_vouchers(ListFilters::default()).await.unwrap_err();
        assert!(err.to_string().contains("Missing Client Token"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_validate_sanitizes_code_and_sets_headers() {
        let transport = RecordingTransport::replying(json!({ "valid": true, "code": "SUMMER20" }));
        let client = client_with(transport.clone());

        let response = client
            .validate(ValidateParams::code(" SUMMER\r\n20 "))
            .await
            .unwrap();
        assert!(response.is_valid());

        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url.path(), "/client/v1/validate");
        assert!(has_pair(&request.url, "code", "SUMMER20"));
        assert_eq!(request.header("X-Client-Application-Id"), Some("app-id"));
        assert_eq!(request.header("X-Client-Token"), Some("secret"));
        assert_eq!(request.header("X-Voucherify-Channel"), Some("Voucherify.js"));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_validate_query_parameters() {
        let transport = RecordingTransport::replying(json!({ "valid": false }));
        let mut client = client_with(transport.clone());
        client.set_identity("track-7");

        let item = OrderItem {
            product_id: Some("prod_1".into()),
            quantity: Some(2),
            ..Default::default()
        };
        let params = ValidateParams::code("SAVE")
            .with_amount(Money::from_cents(1050))
            .with_item(item)
            .with_metadata("lang", "en")
            .with_customer(Customer::with_source_id("cust-1"));
        client.validate(params).await.unwrap();

        let url = transport.last().url;
        assert!(has_pair(&url, "amount", "1050"));
        assert!(has_pair(&url, "item[0][product_id]", "prod_1"));
        assert!(has_pair(&url, "item[0][quantity]", "2"));
        assert!(has_pair(&url, "metadata[lang]", "en"));
        assert!(has_pair(&url, "customer[source_id]", "cust-1"));
        assert!(has_pair(&url, "tracking_id", "track-7"));
    }

    #[tokio::test]
    async fn test_validate_without_code_uses_promotions() {
        let transport = RecordingTransport::replying(json!({ "valid": true }));
        let client = client_with(transport.clone());

        client
            .validate(ValidateParams::promotion(Money::from_cents(2000)))
            .await
            .unwrap();

        let url = transport.last().url;
        assert_eq!(url.path(), "/client/v1/promotions/validation");
        assert!(!query_pairs(&url).iter().any(|(k, _)| k == "code"));
        assert!(has_pair(&url, "amount", "2000"));
    }

    #[tokio::test]
    async fn test_validate_without_code_or_context_fails_locally() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport.clone());

        let err = client
            .validate(ValidateParams::code(" \n "))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_prepare_runs_local_checks_without_sending() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport.clone());

        let prepared = client
            .prepare_redeem(" SAVE ", RedeemPayload::default())
            .unwrap();
        assert_eq!(prepared.endpoint(), Endpoint::Redeem);
        assert!(has_pair(prepared.url(), "code", "SAVE"));
        assert!(prepared.body().is_some());

        let err = client.prepare_validate(ValidateParams::code(" \n ")).unwrap_err();
        assert!(err.is_config_error());
        let err = client
            .prepare_publish("", PublishPayload::default())
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_validate_rejects_overlong_code() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport.clone());

        let err = client
            .validate(ValidateParams::code("X".repeat(101)))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_redeem_fills_source_id_from_tracking_id() {
        let transport = RecordingTransport::replying(json!({ "result": "SUCCESS" }));
        let mut client = client_with(transport.clone());
        client.set_identity("track-1");

        let response = client
            .redeem("SAVE 10", RedeemPayload::default())
            .await
            .unwrap();
        assert_eq!(response.shape(), ResponseShape::Redemption);

        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url.path(), "/client/v1/redeem");
        assert!(has_pair(&request.url, "code", "SAVE10"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body.unwrap(),
            json!({ "customer": { "source_id": "track-1" } })
        );
    }

    #[tokio::test]
    async fn test_redeem_keeps_caller_source_id() {
        let transport = RecordingTransport::replying(json!({ "result": "SUCCESS" }));
        let mut client = client_with(transport.clone());
        client.set_identity("track-1");

        let payload = RedeemPayload {
            customer: Some(Customer::with_source_id("own-id")),
            ..Default::default()
        };
        client.redeem("SAVE", payload).await.unwrap();

        let body = transport.last().body.unwrap();
        assert_eq!(body["customer"]["source_id"], "own-id");
    }

    #[tokio::test]
    async fn test_publish_defaults_channel() {
        let transport = RecordingTransport::replying(json!({ "voucher": { "code": "PUB-1" } }));
        let client = client_with(transport.clone());

        let response = client
            .publish("Summer Sale", PublishPayload::default())
            .await
            .unwrap();
        assert_eq!(response.voucher().unwrap().code.as_deref(), Some("PUB-1"));

        let request = transport.last();
        assert!(has_pair(&request.url, "campaign", "Summer Sale"));
        let body = request.body.unwrap();
        assert_eq!(body["channel"], "Voucherify.js");
        assert_eq!(body["customer"], json!({}));
    }

    #[tokio::test]
    async fn test_publish_requires_campaign() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport.clone());

        let err = client
            .publish("  ", PublishPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_vouchers_filters() {
        let transport = RecordingTransport::replying(json!({ "vouchers": [] }));
        let client = client_with(transport.clone());

        let filters = ListFilters {
            campaign: Some("Summer".into()),
            limit: Some(5),
            ..Default::default()
        };
        client.list_vouchers(filters).await.unwrap();

        let url = transport.last().url;
        assert_eq!(url.path(), "/client/v1/vouchers");
        assert!(has_pair(&url, "campaign", "Summer"));
        assert!(has_pair(&url, "limit", "5"));
    }

    #[tokio::test]
    async fn test_track_body() {
        let transport = RecordingTransport::replying(json!({ "object": "event", "type": "checkout" }));
        let mut client = client_with(transport.clone());
        client.set_identity("track-9");

        client
            .track(TrackEvent::new(" checkout ").with_metadata("total", 42))
            .await
            .unwrap();

        let request = transport.last();
        assert_eq!(request.url.path(), "/client/v1/events");
        assert_eq!(
            request.body.unwrap(),
            json!({
                "event": "checkout",
                "metadata": { "total": 42 },
                "customer": { "source_id": "track-9" }
            })
        );
    }

    #[tokio::test]
    async fn test_unrecognized_body_is_shape_error() {
        let transport = RecordingTransport::replying(json!({ "foo": 1 }));
        let client = client_with(transport);

        let err = client.validate(ValidateParams::code("SAVE")).await.unwrap_err();
        match err {
            ClientError::ResponseShape { context } => assert_eq!(context, json!({ "foo": 1 })),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let transport = Arc::new(RecordingTransport::default());
        transport.push(Err(ClientError::Transport("connection refused".into())));
        let client = client_with(transport);

        let err = client
            .redeem("SAVE", RedeemPayload::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_error_object().message, "HTTP transport error.");
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport.clone());

        let (a, b) = tokio::join!(
            client.validate(ValidateParams::code("A")),
            client.validate(ValidateParams::code("B")),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.requests().len(), 2);
    }
}

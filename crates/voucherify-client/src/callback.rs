//! # Callback Delivery
//!
//! Callback-style sugar over the async operations. Each dispatched call
//! hands its callback exactly one [`Outcome`]: the success payload, or an
//! [`ErrorObject`] shaped like the one browser integrations expect.
//!
//! ```text
//! { "type": "error", "message": "Unexpected status code.", "context": 404 }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::client::{PreparedRequest, VoucherifyClient};
use crate::error::ClientResult;
use crate::protocol::ApiResponse;

const ERROR_TYPE: &str = "error";

/// Structured error delivered to callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Always `"error"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// Malformed body, numeric status, or transport error text.
    pub context: Value,
}

impl ErrorObject {
    pub fn new(message: impl Into<String>, context: Value) -> Self {
        ErrorObject {
            kind: ERROR_TYPE.to_string(),
            message: message.into(),
            context,
        }
    }
}

impl std::fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.context)
    }
}

impl std::error::Error for ErrorObject {}

/// What a callback receives.
pub type Outcome = Result<ApiResponse, ErrorObject>;

/// Converts an operation result into a callback outcome.
pub fn into_outcome(result: ClientResult<ApiResponse>) -> Outcome {
    result.map_err(|e| e.to_error_object())
}

impl VoucherifyClient {
    /// Sends a prepared request in the background and hands its outcome to
    /// `callback`.
    ///
    /// Takes the result of a `prepare_*` call, so every local check has
    /// already run. Returns `None` without spawning when that result is an
    /// error (already logged) or no tokio runtime is running; the callback
    /// is not invoked then.
    ///
    /// ## Example
    /// ```rust,no_run
    /// # async fn run(client: voucherify_client::VoucherifyClient) {
    /// use voucherify_client::ValidateParams;
    ///
    /// let handle = client.dispatch(
    ///     client.prepare_validate(ValidateParams::code("SUMMER20")),
    ///     |outcome| match outcome {
    ///         Ok(response) => println!("valid: {}", response.is_valid()),
    ///         Err(err) => eprintln!("{}", err.message),
    ///     },
    /// );
    /// if let Some(handle) = handle {
    ///     handle.await.ok();
    /// }
    /// # }
    /// ```
    pub fn dispatch<C>(
        &self,
        request: ClientResult<PreparedRequest>,
        callback: C,
    ) -> Option<JoinHandle<()>>
    where
        C: FnOnce(Outcome) + Send + 'static,
    {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, config = e.is_config_error(), "Dispatch skipped");
                return None;
            }
        };

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "No async runtime to dispatch on");
                return None;
            }
        };

        let client = self.clone();
        Some(handle.spawn(async move {
            callback(into_outcome(client.send(request).await));
        }))
    }
}

//! # Query String Encoding
//!
//! GET endpoints take all of their parameters in the query string. Nested
//! values are flattened with bracketed keys:
//!
//! ```text
//! items    [{ "name": "Tea", "qty": 2 }]   → item[0][name]=Tea&item[0][qty]=2
//! metadata { "lang": "en" }                → metadata[lang]=en
//! customer { "address": { "city": "X" } }  → customer[address][city]=X
//! ```
//!
//! Pairs are form-urlencoded by `url`, so brackets in keys arrive escaped.

use serde_json::Value;
use url::Url;

use crate::error::ClientResult;
use crate::protocol::Endpoint;

/// Builds an endpoint URL with query parameters.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    url: Url,
}

impl QueryBuilder {
    /// Starts from `base` plus the endpoint path. Any path prefix on `base`
    /// is kept.
    pub fn new(base: &Url, endpoint: Endpoint) -> ClientResult<Self> {
        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), endpoint.path());
        Ok(QueryBuilder {
            url: Url::parse(&joined)?,
        })
    }

    /// Appends one `key=value` pair.
    pub fn push(&mut self, key: &str, value: &str) -> &mut Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    /// Appends a pair only when `value` is present.
    pub fn push_opt(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Appends `value` under `prefix`, flattening objects and arrays.
    ///
    /// Nulls are skipped. Strings go in raw, other scalars as JSON text.
    pub fn push_flattened(&mut self, prefix: &str, value: &Value) -> &mut Self {
        match value {
            Value::Null => {}
            Value::Object(map) => {
                for (key, nested) in map {
                    self.push_flattened(&format!("{prefix}[{key}]"), nested);
                }
            }
            Value::Array(items) => {
                for (index, nested) in items.iter().enumerate() {
                    self.push_flattened(&format!("{prefix}[{index}]"), nested);
                }
            }
            Value::String(s) => {
                self.push(prefix, s);
            }
            other => {
                self.push(prefix, &other.to_string());
            }
        }
        self
    }

    /// Decoded pairs pushed so far.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn build(self) -> Url {
        self.url
    }
}

//! JSON-RPC provider seam.
//!
//! Resolvers talk to chains through the [`JsonRpcProvider`] trait so tests
//! can substitute canned responses; [`HttpProvider`] is the reqwest-backed
//! production implementation.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::ProviderError;

/// A transport capable of one JSON-RPC 2.0 request.
#[async_trait]
pub trait JsonRpcProvider: Send + Sync {
    /// Issue a single request and return the response's `result` member.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

/// HTTP JSON-RPC provider.
pub struct HttpProvider {
    url: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The endpoint this provider posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl JsonRpcProvider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        debug!(%method, url = %self.url, "sending rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(classify_reqwest)?;

        let json: Value = response.json().await.map_err(classify_reqwest)?;

        if let Some(error) = json.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc error")
                .to_string();
            return Err(ProviderError::Rpc { code, message });
        }

        json.get("result").cloned().ok_or(ProviderError::MissingResult)
    }
}

/// Connect-level failures (DNS, refused connection, timeout) mean the node is
/// unreachable; everything else is an HTTP-level fault.
fn classify_reqwest(err: reqwest::Error) -> ProviderError {
    if err.is_connect() || err.is_timeout() {
        ProviderError::Unreachable(err.to_string())
    } else {
        ProviderError::Http(err.to_string())
    }
}

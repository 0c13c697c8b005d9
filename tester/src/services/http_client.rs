//! Real HTTP client for the service under test
//!
//! Sends JSON requests relative to a base URL and sorts every response into
//! success or failure with the shared classification heuristic.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::Value;

use shared::{Component, HttpMethod, component_debug};
use crate::core::classify_response;
use crate::error::{TesterError, TesterResult};
use crate::traits::HttpClient;
use crate::types::{ApiRequest, HttpOutcome, TransportError};

/// reqwest-backed [`HttpClient`]
#[derive(Clone)]
pub struct RealHttpClient {
    base_url: String,
    client: Client,
}

impl RealHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> TesterResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TesterError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HttpClient for RealHttpClient {
    async fn send(&self, request: ApiRequest) -> Result<HttpOutcome, TransportError> {
        let url = self.url(&request.path);
        component_debug!(Component::current(), "🌐 {} {}", request.method, url);

        let mut builder = self.client.request(method(request.method), &url);
        if let Some(token) = request.bearer.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = read_body(response).await?;

        Ok(classify_response(status, body))
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// JSON when it parses, the raw text otherwise, `null` for an empty body
async fn read_body(response: Response) -> Result<Value, TransportError> {
    let text = response.text().await.map_err(transport_error)?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

fn transport_error(error: reqwest::Error) -> TransportError {
    let message = error.to_string();
    if error.is_timeout() {
        TransportError::Timeout { message }
    } else if error.is_connect() {
        TransportError::Connect { message }
    } else {
        TransportError::Request { message }
    }
}

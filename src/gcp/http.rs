//! HTTP utilities for GCP REST API calls

use crate::error::{AdminError, Result};
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull the provider's message out of a `{"error": {"message": ...}}` body
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
}

/// Turn a non-success response into an [`AdminError::Api`]
fn api_error(status: StatusCode, body: &str) -> AdminError {
    // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
    tracing::error!("API error: {} - {}", status, sanitize_for_log(body));
    let message = extract_error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });
    AdminError::Api {
        status: status.as_u16(),
        message,
    }
}

/// One ranged slice of a media download
#[derive(Debug, Clone)]
pub struct RangeResponse {
    pub status: u16,
    /// Raw `Content-Range` header, if the server sent one
    pub content_range: Option<String>,
    pub body: Vec<u8>,
}

/// HTTP client wrapper for GCP API calls
#[derive(Clone)]
pub struct GcpHttpClient {
    client: Client,
}

impl GcpHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gcpadmin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Send a JSON request and parse the JSON response
    ///
    /// An empty success body comes back as `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &response_body));
        }

        if response_body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&response_body)?)
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str, token: &str) -> Result<Value> {
        self.request(Method::GET, url, token, None).await
    }

    /// Make a POST request to a GCP API
    pub async fn post(&self, url: &str, token: &str, body: Option<&Value>) -> Result<Value> {
        self.request(Method::POST, url, token, body).await
    }

    /// Make a PUT request to a GCP API
    pub async fn put(&self, url: &str, token: &str, body: &Value) -> Result<Value> {
        self.request(Method::PUT, url, token, Some(body)).await
    }

    /// Fetch the inclusive byte range `start..=end` of a media URL
    ///
    /// 416 is passed through rather than treated as an error, the
    /// downloader reads it as an empty object.
    pub async fn get_range(
        &self,
        url: &str,
        token: &str,
        start: u64,
        end: u64,
    ) -> Result<RangeResponse> {
        tracing::debug!("GET {} bytes={}-{}", url, start, end);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(RANGE, format!("bytes={}-{}", start, end))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(RangeResponse {
                status: status.as_u16(),
                content_range: None,
                body: Vec::new(),
            });
        }

        if !status.is_success() {
            let body = response.text().await?;
            return Err(api_error(status, &body));
        }

        let content_range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?.to_vec();

        Ok(RangeResponse {
            status: status.as_u16(),
            content_range,
            body,
        })
    }
}

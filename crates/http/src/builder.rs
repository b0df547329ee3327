//! Builder for the books HTTP client

use std::time::Duration;

use reqwest::Url;
use shelf_kernel::settings::ApiSettings;
use shelf_kernel::ApiError;

use crate::HttpBooksApi;

/// Builder for constructing an [`HttpBooksApi`]
pub struct BooksClientBuilder {
    endpoint: String,
    timeout: Option<Duration>,
    request_id: bool,
}

impl BooksClientBuilder {
    /// Create a builder for the collection at `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: None,
            request_id: true,
        }
    }

    /// Start from loaded API settings
    pub fn from_settings(settings: &ApiSettings) -> Self {
        let builder = Self::new(settings.endpoint.clone());
        match settings.request_timeout_ms {
            Some(timeout_ms) => builder.with_timeout(timeout_ms),
            None => builder,
        }
    }

    /// Abort requests that take longer than `timeout_ms`
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Toggle the `x-request-id` header on outgoing requests
    pub fn with_request_id(mut self, enabled: bool) -> Self {
        self.request_id = enabled;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HttpBooksApi, ApiError> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| ApiError::invalid_endpoint(&self.endpoint, e.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(ApiError::invalid_endpoint(
                &self.endpoint,
                "endpoint cannot carry path segments",
            ));
        }

        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client
            .build()
            .map_err(|e| ApiError::invalid_endpoint(&self.endpoint, e.to_string()))?;

        tracing::debug!(
            endpoint = %endpoint,
            timeout_ms = ?self.timeout.map(|t| t.as_millis()),
            "books client built"
        );

        Ok(HttpBooksApi::from_parts(client, endpoint, self.request_id))
    }
}

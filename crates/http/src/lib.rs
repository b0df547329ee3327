//! HTTP client for the remote books collection.
//!
//! Outcomes are classified from the response status alone: a non-2xx reply
//! becomes [`ApiError::Rejected`] and its body is dropped unread.

use async_trait::async_trait;
use reqwest::{Response, Url};
use uuid::{Timestamp, Uuid};

use shelf_kernel::{ApiError, Book, BooksApi, CopiesChange, NewBook, Operation};

pub mod builder;

pub use builder::BooksClientBuilder;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// `BooksApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpBooksApi {
    client: reqwest::Client,
    endpoint: Url,
    request_id: bool,
}

impl HttpBooksApi {
    /// Start building a client for the collection at `endpoint`
    pub fn builder(endpoint: impl Into<String>) -> BooksClientBuilder {
        BooksClientBuilder::new(endpoint)
    }

    /// Build a client from loaded API settings
    pub fn from_settings(settings: &shelf_kernel::settings::ApiSettings) -> Result<Self, ApiError> {
        BooksClientBuilder::from_settings(settings).build()
    }

    pub(crate) const fn from_parts(client: reqwest::Client, endpoint: Url, request_id: bool) -> Self {
        Self {
            client,
            endpoint,
            request_id,
        }
    }

    /// URL of the books collection
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build `{endpoint}/{segment}/...` with each segment percent-encoded
    fn member_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::invalid_endpoint(self.endpoint.as_str(), "endpoint cannot carry path segments")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and keep only success responses
    async fn send(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, ApiError> {
        let request = match self.request_id.then(make_request_id) {
            Some(id) => request.header(REQUEST_ID_HEADER, id),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(operation, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                operation = %operation,
                status_code = %status.as_u16(),
                "books request rejected"
            );
            return Err(ApiError::rejected(operation, status.as_u16()));
        }

        tracing::debug!(
            operation = %operation,
            status_code = %status.as_u16(),
            "books request succeeded"
        );
        Ok(response)
    }
}

#[async_trait]
impl BooksApi for HttpBooksApi {
    async fn list(&self) -> Result<Vec<Book>, ApiError> {
        let response = self
            .send(Operation::List, self.client.get(self.endpoint.clone()))
            .await?;

        response
            .json::<Vec<Book>>()
            .await
            .map_err(|e| ApiError::decode(Operation::List, e.to_string()))
    }

    async fn create(&self, book: &NewBook) -> Result<(), ApiError> {
        self.send(
            Operation::Create,
            self.client.post(self.endpoint.clone()).json(book),
        )
        .await?;
        Ok(())
    }

    async fn adjust_copies(&self, id: &str, change: i64) -> Result<(), ApiError> {
        let url = self.member_url(&[id, "copies"])?;
        self.send(
            Operation::AdjustCopies,
            self.client.put(url).json(&CopiesChange { change }),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.member_url(&[id])?;
        self.send(Operation::Delete, self.client.delete(url)).await?;
        Ok(())
    }
}

/// Time-ordered request id for correlating client calls in server logs
fn make_request_id() -> String {
    let timestamp = Timestamp::now(uuid::NoContext);
    Uuid::new_v7(timestamp).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(endpoint: &str) -> HttpBooksApi {
        HttpBooksApi::builder(endpoint).build().unwrap()
    }

    #[test]
    fn member_url_appends_segments() {
        let url = api("http://localhost:5000/books")
            .member_url(&["65f1c0", "copies"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/books/65f1c0/copies");
    }

    #[test]
    fn member_url_ignores_trailing_slash() {
        let url = api("http://localhost:5000/books/").member_url(&["b-1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/books/b-1");
    }

    #[test]
    fn member_url_encodes_identifier() {
        let url = api("http://localhost:5000/books")
            .member_url(&["a/b c"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/books/a%2Fb%20c");
    }

    #[test]
    fn request_ids_are_v7() {
        let id = make_request_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }
}

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{Book, NewBook};

/// Contract for the remote "books" collection.
///
/// Implementations classify outcomes by response status only: any rejection
/// surfaces as an [`ApiError`] without interpreting the server's error body.
#[async_trait]
pub trait BooksApi: Send + Sync {
    /// Fetch the full collection in server order
    async fn list(&self) -> Result<Vec<Book>, ApiError>;

    /// Submit a new record; the server assigns its identifier
    async fn create(&self, book: &NewBook) -> Result<(), ApiError>;

    /// Apply a signed delta to a record's available copies
    async fn adjust_copies(&self, id: &str, change: i64) -> Result<(), ApiError>;

    /// Remove a record
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl<T> BooksApi for &T
where
    T: BooksApi + ?Sized,
{
    async fn list(&self) -> Result<Vec<Book>, ApiError> {
        (**self).list().await
    }

    async fn create(&self, book: &NewBook) -> Result<(), ApiError> {
        (**self).create(book).await
    }

    async fn adjust_copies(&self, id: &str, change: i64) -> Result<(), ApiError> {
        (**self).adjust_copies(id, change).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        (**self).delete(id).await
    }
}

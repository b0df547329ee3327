use shelf_kernel::{ApiError, Book, BooksApi, Operation};

use super::form::{BookForm, FormField};

pub const CREATE_FAILED: &str = "Invalid book data";
pub const ADJUST_FAILED: &str = "Cannot update copies (negative stock or invalid book)";
pub const DELETE_FAILED: &str = "Book can be deleted only when copies are 0";

/// Fixed user-facing message for a failed mutation
pub const fn failure_message(operation: Operation) -> Option<&'static str> {
    match operation {
        Operation::Create => Some(CREATE_FAILED),
        Operation::AdjustCopies => Some(ADJUST_FAILED),
        Operation::Delete => Some(DELETE_FAILED),
        Operation::List => None,
    }
}

/// User-initiated events handled by [`BooksController::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Re-fetch the collection
    Refresh,
    /// Replace one field of the form buffer
    EditField(FormField, String),
    /// Submit the form buffer as a new book
    Submit,
    /// Apply a signed delta to a book's available copies
    AdjustCopies { id: String, change: i64 },
    /// Remove a book
    Delete { id: String },
}

/// Result of handling one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action took effect
    Applied,
    /// The server refused a mutation; the error indicator is set
    Rejected,
    /// A refresh could not fetch the list; the previous list is kept
    RefreshFailed,
}

/// Owner of the client-side state: the displayed list, the form buffer, and
/// the error indicator.
///
/// The list is never patched locally. After every successful mutation it is
/// replaced wholesale by a fresh list from the server; after a failed one it
/// is left as it was.
pub struct BooksController<A> {
    api: A,
    books: Vec<Book>,
    form: BookForm,
    error: Option<String>,
}

impl<A: BooksApi> BooksController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            books: Vec::new(),
            form: BookForm::new(),
            error: None,
        }
    }

    /// Books from the last successful refresh, in server order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub const fn form(&self) -> &BookForm {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Initial refresh at startup
    pub async fn load(&mut self) -> Outcome {
        tracing::info!(module = "books", "loading books");
        self.refresh().await
    }

    /// Fetch the list and replace the local copy
    pub async fn refresh(&mut self) -> Outcome {
        match self.api.list().await {
            Ok(books) => {
                tracing::debug!(module = "books", count = books.len(), "books refreshed");
                self.books = books;
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(module = "books", error = %e, "failed to refresh books");
                Outcome::RefreshFailed
            }
        }
    }

    pub fn edit_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Submit the form buffer; it is cleared only if the server accepts it
    pub async fn submit(&mut self) -> Outcome {
        self.error = None;

        let book = self.form.to_new_book();
        match self.api.create(&book).await {
            Ok(()) => {
                tracing::info!(module = "books", title = %book.title, "book created");
                self.form.clear();
                self.refresh_after_mutation().await
            }
            Err(e) => self.reject(Operation::Create, &e),
        }
    }

    pub async fn adjust_copies(&mut self, id: &str, change: i64) -> Outcome {
        self.error = None;

        match self.api.adjust_copies(id, change).await {
            Ok(()) => {
                tracing::info!(module = "books", id, change, "copies adjusted");
                self.refresh_after_mutation().await
            }
            Err(e) => self.reject(Operation::AdjustCopies, &e),
        }
    }

    pub async fn increment(&mut self, id: &str) -> Outcome {
        self.adjust_copies(id, 1).await
    }

    pub async fn decrement(&mut self, id: &str) -> Outcome {
        self.adjust_copies(id, -1).await
    }

    pub async fn delete(&mut self, id: &str) -> Outcome {
        self.error = None;

        match self.api.delete(id).await {
            Ok(()) => {
                tracing::info!(module = "books", id, "book deleted");
                self.refresh_after_mutation().await
            }
            Err(e) => self.reject(Operation::Delete, &e),
        }
    }

    /// Dispatch an action to its handler
    pub async fn update(&mut self, action: Action) -> Outcome {
        match action {
            Action::Refresh => self.refresh().await,
            Action::EditField(field, value) => {
                self.edit_field(field, value);
                Outcome::Applied
            }
            Action::Submit => self.submit().await,
            Action::AdjustCopies { id, change } => self.adjust_copies(&id, change).await,
            Action::Delete { id } => self.delete(&id).await,
        }
    }

    /// The mutation already succeeded, so a failed refresh only leaves the
    /// list stale.
    async fn refresh_after_mutation(&mut self) -> Outcome {
        self.refresh().await;
        Outcome::Applied
    }

    fn reject(&mut self, operation: Operation, error: &ApiError) -> Outcome {
        tracing::info!(
            module = "books",
            operation = %operation,
            error = %error,
            "books mutation rejected"
        );
        self.error = failure_message(operation).map(str::to_string);
        Outcome::Rejected
    }
}

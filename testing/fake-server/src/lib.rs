//! In-process stand-in for the remote books service.
//!
//! Enforces the rules the real service owns: non-empty text fields, integer
//! numeric fields, copies never negative, deletion only at zero copies, and
//! 404 for unknown identifiers. Counts list requests so tests can observe
//! when the client refreshes.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::trace::TraceLayer;

use shelf_kernel::Book;

pub mod error;

use error::AppError;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Default)]
struct Inventory {
    books: Vec<Book>,
    next_id: u64,
}

impl Inventory {
    fn allocate_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("book-{}", self.next_id);
            if !self.books.iter().any(|book| book.id == id) {
                return id;
            }
        }
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Book, AppError> {
        self.books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| AppError::not_found(format!("book '{id}' not found")))
    }
}

/// Shared state of a running fake server
#[derive(Default)]
pub struct FakeState {
    inventory: Mutex<Inventory>,
    request_ids: Mutex<Vec<String>>,
    list_requests: AtomicUsize,
    fail_listing: AtomicBool,
}

impl FakeState {
    fn with_books(books: Vec<Book>) -> Self {
        Self {
            inventory: Mutex::new(Inventory { books, next_id: 0 }),
            ..Self::default()
        }
    }

    fn inventory(&self) -> MutexGuard<'_, Inventory> {
        self.inventory.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_request_id(&self, headers: &HeaderMap) {
        if let Some(id) = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            self.request_ids
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(id.to_string());
        }
    }
}

/// Build the books router over the given state
pub fn router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/{id}", axum::routing::delete(delete_book))
        .route("/books/{id}/copies", put(adjust_copies))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A fake books service listening on an ephemeral local port
pub struct FakeBooksServer {
    addr: SocketAddr,
    state: Arc<FakeState>,
    handle: JoinHandle<()>,
}

impl FakeBooksServer {
    /// Start an empty server
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(Vec::new()).await
    }

    /// Start a server seeded with `books`, kept in the given order
    pub async fn spawn_with(books: Vec<Book>) -> anyhow::Result<Self> {
        let state = Arc::new(FakeState::with_books(books));
        let app = router(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind fake books server")?;
        let addr = listener
            .local_addr()
            .context("failed to read fake books server address")?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "fake books server stopped");
            }
        });

        tracing::debug!(%addr, "fake books server listening");

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// URL of the books collection
    pub fn endpoint(&self) -> String {
        format!("http://{}/books", self.addr)
    }

    /// Snapshot of the stored records
    pub fn books(&self) -> Vec<Book> {
        self.state.inventory().books.clone()
    }

    /// Number of `GET /books` requests served so far
    pub fn list_requests(&self) -> usize {
        self.state.list_requests.load(Ordering::SeqCst)
    }

    /// Make `GET /books` answer 500 until switched back
    pub fn set_list_failure(&self, failing: bool) {
        self.state.fail_listing.store(failing, Ordering::SeqCst);
    }

    /// `x-request-id` values seen so far, in arrival order
    pub fn request_ids(&self) -> Vec<String> {
        self.state
            .request_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for FakeBooksServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Fixture record
pub fn sample_book(id: &str, title: &str, available_copies: i64) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: "Test Author".to_string(),
        category: "Fiction".to_string(),
        published_year: 2001,
        available_copies,
    }
}

async fn list_books(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Book>>, AppError> {
    state.record_request_id(&headers);
    state.list_requests.fetch_add(1, Ordering::SeqCst);

    if state.fail_listing.load(Ordering::SeqCst) {
        return Err(AppError::Internal(anyhow::anyhow!("listing disabled")));
    }

    Ok(Json(state.inventory().books.clone()))
}

async fn create_book(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    state.record_request_id(&headers);

    let mut details = Vec::new();
    let mut text_field = |name: &str| match body.get(name).and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => {
            details.push(json!({ "field": name, "error": "required" }));
            String::new()
        }
    };
    let title = text_field("title");
    let author = text_field("author");
    let category = text_field("category");

    let published_year = body.get("publishedYear").and_then(Value::as_i64);
    if published_year.is_none() {
        details.push(json!({ "field": "publishedYear", "error": "integer required" }));
    }
    let available_copies = body.get("availableCopies").and_then(Value::as_i64);
    match available_copies {
        None => details.push(json!({ "field": "availableCopies", "error": "integer required" })),
        Some(copies) if copies < 0 => {
            details.push(json!({ "field": "availableCopies", "error": "must not be negative" }));
        }
        Some(_) => {}
    }

    let (Some(published_year), Some(available_copies), true) =
        (published_year, available_copies, details.is_empty())
    else {
        return Err(AppError::validation(details, "invalid book data"));
    };

    let mut inventory = state.inventory();
    let book = Book {
        id: inventory.allocate_id(),
        title,
        author,
        category,
        published_year,
        available_copies,
    };
    inventory.books.push(book.clone());

    Ok((StatusCode::CREATED, Json(book)))
}

async fn adjust_copies(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Book>, AppError> {
    state.record_request_id(&headers);

    let change = body.get("change").and_then(Value::as_i64).ok_or_else(|| {
        AppError::validation(
            vec![json!({ "field": "change", "error": "integer required" })],
            "invalid copies change",
        )
    })?;

    let mut inventory = state.inventory();
    let book = inventory.find_mut(&id)?;
    let copies = book
        .available_copies
        .checked_add(change)
        .filter(|copies| *copies >= 0)
        .ok_or_else(|| {
            AppError::validation(
                vec![json!({ "field": "availableCopies", "error": "must not be negative" })],
                "copies cannot go negative",
            )
        })?;
    book.available_copies = copies;

    Ok(Json(book.clone()))
}

async fn delete_book(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    state.record_request_id(&headers);

    let mut inventory = state.inventory();
    let copies = inventory.find_mut(&id)?.available_copies;
    if copies != 0 {
        return Err(AppError::conflict(format!(
            "book '{id}' still has {copies} copies"
        )));
    }
    inventory.books.retain(|book| book.id != id);

    Ok(Json(json!({ "deleted": id })))
}

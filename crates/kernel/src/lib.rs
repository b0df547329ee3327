pub mod api;
pub mod error;
pub mod models;
pub mod settings;

pub use api::BooksApi;
pub use error::{ApiError, Operation};
pub use models::{Book, CopiesChange, NewBook, Numeric};

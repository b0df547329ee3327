//! Terminal client for a remote book inventory.
//!
//! The screen state lives in a single [`BooksController`]: it is re-derived
//! from the server after every successful change and left untouched after a
//! rejected one.

pub mod modules;
pub mod shell;

/// Re-export commonly used types
pub use modules::books::{Action, BookForm, BooksController, FormField, Outcome};

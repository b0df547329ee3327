//! Books screen: form buffer, controller, and text view.

pub mod controller;
pub mod form;
pub mod view;

use shelf_http::HttpBooksApi;
use shelf_kernel::settings::Settings;

pub use controller::{Action, BooksController, Outcome};
pub use form::{BookForm, FormField};

/// Build a controller talking to the configured books endpoint
pub fn create_controller(settings: &Settings) -> anyhow::Result<BooksController<HttpBooksApi>> {
    let api = HttpBooksApi::from_settings(&settings.api)?;
    tracing::info!(
        module = "books",
        endpoint = %api.endpoint(),
        environment = settings.environment.as_str(),
        "books module initialized"
    );
    Ok(BooksController::new(api))
}

//! Document search API server module
//!
//! HTTP REST API over the translate and search operations.
//! Run with `docsearch-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, google_translators, run_api_server, AppState, TranslatorFactory};

//! STR document search - translate and search property registration spreadsheets
//!
//! This library loads `.xls` / `.xlsx` property registration records,
//! machine-translates Marathi cells to English, and runs case-insensitive
//! literal substring searches over the results.
//!
//! # Features
//!
//! - Per-cell translation with bounded retry and fallback to the original text
//! - `translated_<name>` export of every translated workbook
//! - Property description search over a session's translated frames
//! - Document-details search over English exports in either known layout
//!
//! # Example
//!
//! ```no_run
//! use str_docsearch::search::{DocumentSearch, SearchField};
//! use str_docsearch::upload::UploadedFile;
//!
//! let uploads = vec![UploadedFile::from_path("haveli_2023.xlsx")];
//! let outcome = DocumentSearch::new(SearchField::SellerParty, "patil").run(&uploads);
//!
//! println!("{}", outcome.summary());
//! for warning in &outcome.warnings {
//!     eprintln!("{}", warning);
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod frame;
pub mod search;
pub mod session;
pub mod translate;
pub mod upload;
pub mod warning;

// Re-export commonly used types
pub use error::{DocSearchError, DocSearchResult};
pub use frame::{Cell, Frame, ResultTable};
pub use session::Session;
pub use warning::Warning;

//! Marathi → English translation of uploaded spreadsheets
//!
//! The service is reached through the [`Translator`] trait so the pipeline
//! can run against [`GoogleTranslator`] in production and a scripted fake in
//! tests.

mod google;
mod pipeline;
mod retry;

pub use google::{parse_translation, GoogleTranslator};
pub use pipeline::{CellOutcome, TranslatedFile, TranslationPipeline, TranslationReport, TranslationRun};
pub use retry::{Backoff, RetryPolicy};

use crate::error::DocSearchResult;

/// A machine translation service
pub trait Translator: Send + Sync {
    /// Translate `text` from language code `source` to `target`
    fn translate(&self, text: &str, source: &str, target: &str) -> DocSearchResult<String>;
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn translate(&self, text: &str, source: &str, target: &str) -> DocSearchResult<String> {
        (**self).translate(text, source, target)
    }
}

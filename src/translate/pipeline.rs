//! Load → translate every cell → export, one uploaded file at a time

use super::{RetryPolicy, Translator};
use crate::config::TranslationConfig;
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::frame::Frame;
use crate::upload::UploadedFile;
use crate::warning::Warning;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What happened to one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    Translated(String),
    /// Blank text, never sent to the service
    Skipped(String),
    /// Every attempt failed; the original text is kept
    Fallback(String),
}

impl CellOutcome {
    pub fn into_text(self) -> String {
        match self {
            CellOutcome::Translated(s) | CellOutcome::Skipped(s) | CellOutcome::Fallback(s) => s,
        }
    }
}

/// Per-file summary of a translation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedFile {
    pub original_name: String,
    pub rows: usize,
    pub cells_translated: usize,
    pub cells_fallback: usize,
    /// `None` when the export could not be written
    pub export_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslationReport {
    pub files: Vec<TranslatedFile>,
    pub warnings: Vec<Warning>,
}

/// Frames produced by one trigger of the pipeline, plus its report
#[derive(Debug, Clone, Default)]
pub struct TranslationRun {
    pub frames: Vec<Frame>,
    pub report: TranslationReport,
}

pub struct TranslationPipeline<'a> {
    translator: &'a dyn Translator,
    policy: RetryPolicy,
    source_lang: String,
    target_lang: String,
    exporter: ExcelExporter,
}

impl<'a> TranslationPipeline<'a> {
    pub fn new<P: AsRef<Path>>(
        translator: &'a dyn Translator,
        config: &TranslationConfig,
        output_dir: P,
    ) -> Self {
        Self {
            translator,
            policy: config.retry_policy(),
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
            exporter: ExcelExporter::new(output_dir),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Translate one cell. Never fails: service errors end in a fallback.
    pub fn translate_text(&self, text: &str) -> CellOutcome {
        if text.trim().is_empty() {
            return CellOutcome::Skipped(text.to_string());
        }

        let result = self.policy.run(|_| {
            self.translator
                .translate(text, &self.source_lang, &self.target_lang)
        });

        match result {
            Ok(translated) => CellOutcome::Translated(translated),
            Err(e) => {
                warn!(error = %e, "Translation failed, keeping original text");
                CellOutcome::Fallback(text.to_string())
            }
        }
    }

    /// Translate every filled cell, column by column.
    ///
    /// Returns `(translated, fallback)` cell counts.
    pub fn translate_frame(&self, frame: &mut Frame) -> (usize, usize) {
        let mut translated = 0;
        let mut fallback = 0;

        for col in 0..frame.width() {
            for row in frame.rows.iter_mut() {
                let Some(text) = row[col].take() else {
                    continue;
                };
                let outcome = self.translate_text(&text);
                match outcome {
                    CellOutcome::Translated(_) => translated += 1,
                    CellOutcome::Fallback(_) => fallback += 1,
                    CellOutcome::Skipped(_) => {}
                }
                row[col] = Some(outcome.into_text());
            }
        }

        (translated, fallback)
    }

    /// Translate and export every upload in order.
    ///
    /// A file that cannot be loaded is skipped with a warning. A file whose
    /// export fails is still returned, without an export path.
    pub fn run(&self, uploads: &[UploadedFile]) -> TranslationRun {
        let mut run = TranslationRun::default();

        for upload in uploads {
            let name = upload.name();
            let mut frame = match ExcelImporter::new(upload).import() {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(file = %name, error = %e, "Skipping file");
                    run.report.warnings.push(Warning::from_load_error(name, &e));
                    continue;
                }
            };

            let (cells_translated, cells_fallback) = self.translate_frame(&mut frame);

            let export_path = match self.exporter.export(&frame, name) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(file = %name, error = %e, "Export failed");
                    run.report.warnings.push(Warning::ExportFailed {
                        file: name.to_string(),
                        message: e.to_string(),
                    });
                    None
                }
            };

            info!(
                file = %name,
                rows = frame.height(),
                cells_translated,
                cells_fallback,
                "File {} has been translated.",
                name
            );

            run.report.files.push(TranslatedFile {
                original_name: name.to_string(),
                rows: frame.height(),
                cells_translated,
                cells_fallback,
                export_path,
            });
            run.frames.push(frame);
        }

        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DocSearchError, DocSearchResult};
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Dictionary translator; words listed in `broken` always fail
    struct FakeTranslator {
        words: HashMap<&'static str, &'static str>,
        broken: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeTranslator {
        fn new(words: &[(&'static str, &'static str)]) -> Self {
            Self {
                words: words.iter().copied().collect(),
                broken: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Translator for FakeTranslator {
        fn translate(&self, text: &str, source: &str, target: &str) -> DocSearchResult<String> {
            assert_eq!((source, target), ("mr", "en"));
            self.calls.lock().unwrap().push(text.to_string());
            if self.broken.iter().any(|b| *b == text) {
                return Err(DocSearchError::Translation("connection reset".to_string()));
            }
            Ok(self.words.get(text).copied().unwrap_or(text).to_string())
        }
    }

    fn pipeline<'a>(translator: &'a FakeTranslator, dir: &Path) -> TranslationPipeline<'a> {
        TranslationPipeline::new(translator, &TranslationConfig::default(), dir)
            .with_retry_policy(RetryPolicy::immediate(3))
    }

    fn marathi_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "DocNo").unwrap();
        sheet.write_string(0, 1, "PropertyDescription").unwrap();
        sheet.write_number(1, 0, 101.0).unwrap();
        sheet.write_string(1, 1, "सदनिका").unwrap();
        sheet.write_number(2, 0, 102.0).unwrap();
        sheet.write_string(2, 1, "दुकान").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_fallback_keeps_original_text() {
        let temp_dir = TempDir::new().unwrap();
        let mut translator = FakeTranslator::new(&[]);
        translator.broken.push("सदनिका");

        let outcome = pipeline(&translator, temp_dir.path()).translate_text("सदनिका");
        assert_eq!(outcome, CellOutcome::Fallback("सदनिका".to_string()));
        assert_eq!(translator.calls().len(), 3);
    }

    #[test]
    fn test_blank_text_not_sent() {
        let temp_dir = TempDir::new().unwrap();
        let translator = FakeTranslator::new(&[]);

        let outcome = pipeline(&translator, temp_dir.path()).translate_text("   ");
        assert_eq!(outcome, CellOutcome::Skipped("   ".to_string()));
        assert!(translator.calls().is_empty());
    }

    #[test]
    fn test_translate_frame_column_major() {
        let temp_dir = TempDir::new().unwrap();
        let translator = FakeTranslator::new(&[("सदनिका", "Flat")]);

        let mut frame = Frame::new("a.xlsx", vec!["a".to_string(), "b".to_string()]);
        frame.push_row(vec![Some("1".to_string()), Some("सदनिका".to_string())]);
        frame.push_row(vec![Some("2".to_string()), None]);

        let (translated, fallback) =
            pipeline(&translator, temp_dir.path()).translate_frame(&mut frame);

        assert_eq!((translated, fallback), (3, 0));
        assert_eq!(translator.calls(), vec!["1", "2", "सदनिका"]);
        assert_eq!(frame.rows[0][1], Some("Flat".to_string()));
        assert_eq!(frame.rows[1][1], None);
    }

    #[test]
    fn test_run_translates_exports_and_skips_bad_files() {
        let temp_dir = TempDir::new().unwrap();
        let translator = FakeTranslator::new(&[("सदनिका", "Flat"), ("दुकान", "Shop")]);

        let uploads = vec![
            UploadedFile::from_bytes("haveli.xlsx", marathi_workbook()),
            UploadedFile::from_bytes("broken.xlsx", b"garbage".to_vec()),
        ];
        let run = pipeline(&translator, temp_dir.path()).run(&uploads);

        assert_eq!(run.frames.len(), 1);
        assert_eq!(
            run.frames[0].rows[1],
            vec![Some("102".to_string()), Some("Shop".to_string())]
        );
        // Export keeps the original column case
        assert_eq!(run.frames[0].columns, vec!["DocNo", "PropertyDescription"]);

        let file = &run.report.files[0];
        assert_eq!(file.original_name, "haveli.xlsx");
        assert_eq!(file.rows, 2);
        assert_eq!(file.cells_translated, 4);
        let export = file.export_path.as_ref().unwrap();
        assert_eq!(export, &temp_dir.path().join("translated_haveli.xlsx"));
        assert!(export.exists());

        assert_eq!(run.report.warnings.len(), 1);
        assert!(matches!(
            &run.report.warnings[0],
            Warning::LoadFailed { file, .. } if file == "broken.xlsx"
        ));
    }
}

//! Per-user session state
//!
//! A [`Session`] owns the frames of the latest translation run. The CLI
//! keeps one for the lifetime of the process; the HTTP server keeps one per
//! client in a [`SessionStore`].

use crate::frame::Frame;
use crate::search::{search_property_description, SearchOutcome};
use crate::translate::{TranslationReport, TranslationRun};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A translated workbook offered for download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    /// Name of the uploaded file; the download key
    pub original_name: String,
    pub path: PathBuf,
}

impl ExportArtifact {
    /// File name offered to the browser
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    translated: Vec<Frame>,
    exports: Vec<ExportArtifact>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            translated: Vec::new(),
            exports: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn translated_frames(&self) -> &[Frame] {
        &self.translated
    }

    pub fn exports(&self) -> &[ExportArtifact] {
        &self.exports
    }

    pub fn export_for(&self, original_name: &str) -> Option<&ExportArtifact> {
        self.exports.iter().find(|e| e.original_name == original_name)
    }

    /// Replace the previous run's frames and exports with `run`.
    ///
    /// Column names are lower-cased on the way in so later searches resolve
    /// columns case-insensitively.
    pub fn replace_translations(&mut self, run: TranslationRun) -> TranslationReport {
        let TranslationRun { mut frames, report } = run;
        for frame in &mut frames {
            frame.lowercase_columns();
        }

        self.exports = report
            .files
            .iter()
            .filter_map(|f| {
                f.export_path.as_ref().map(|path| ExportArtifact {
                    original_name: f.original_name.clone(),
                    path: path.clone(),
                })
            })
            .collect();
        self.translated = frames;

        tracing::info!(
            session = %self.id,
            frames = self.translated.len(),
            "Replaced translated frames"
        );
        report
    }

    pub fn search_property_description(&self, query: &str) -> SearchOutcome {
        search_property_description(&self.translated, query)
    }
}

/// Sessions of the HTTP server, keyed by id
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new empty session and return its id
    pub async fn create(&self) -> Uuid {
        let session = Session::new();
        let id = session.id();
        self.sessions.write().await.insert(id, session);
        id
    }

    /// Tear down a session, returning it if it existed
    pub async fn remove(&self, id: Uuid) -> Option<Session> {
        self.sessions.write().await.remove(&id)
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&Session) -> R) -> Option<R> {
        self.sessions.read().await.get(&id).map(f)
    }

    pub async fn with_session_mut<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        self.sessions.write().await.get_mut(&id).map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::TranslatedFile;

    fn run_with(frames: Vec<Frame>, export: Option<&str>) -> TranslationRun {
        let files = frames
            .iter()
            .map(|f| TranslatedFile {
                original_name: f.source.clone(),
                rows: f.height(),
                cells_translated: f.rows.len(),
                cells_fallback: 0,
                export_path: export.map(PathBuf::from),
            })
            .collect();
        TranslationRun {
            frames,
            report: TranslationReport {
                files,
                warnings: Vec::new(),
            },
        }
    }

    fn translated(source: &str, description: &str) -> Frame {
        let mut frame = Frame::new(source, vec!["PropertyDescription".to_string()]);
        frame.push_row(vec![Some(description.to_string())]);
        frame
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.translated_frames().is_empty());
        assert!(session.exports().is_empty());
        assert!(!session.search_property_description("flat").has_results());
    }

    #[test]
    fn test_replace_lowercases_and_records_exports() {
        let mut session = Session::new();
        session.replace_translations(run_with(
            vec![translated("a.xlsx", "Flat")],
            Some("out/translated_a.xlsx"),
        ));

        assert_eq!(session.translated_frames()[0].columns, vec!["propertydescription"]);
        let export = session.export_for("a.xlsx").unwrap();
        assert_eq!(export.file_name(), "translated_a.xlsx");
        assert!(session.export_for("b.xlsx").is_none());
    }

    #[test]
    fn test_replace_discards_previous_run() {
        let mut session = Session::new();
        session.replace_translations(run_with(vec![translated("a.xlsx", "Flat")], Some("x")));
        session.replace_translations(run_with(vec![translated("b.xlsx", "Shop")], None));

        assert_eq!(session.translated_frames().len(), 1);
        assert_eq!(session.translated_frames()[0].source, "b.xlsx");
        assert!(session.exports().is_empty());
        assert!(!session.search_property_description("flat").has_results());
        assert!(session.search_property_description("shop").has_results());
    }

    #[tokio::test]
    async fn test_store_lifecycle() {
        let store = SessionStore::new();
        let id = store.create().await;
        assert!(store.contains(id).await);
        assert_eq!(store.len().await, 1);

        let frames = store
            .with_session(id, |s| s.translated_frames().len())
            .await;
        assert_eq!(frames, Some(0));

        let removed = store.remove(id).await.unwrap();
        assert_eq!(removed.id(), id);
        assert!(removed.created_at() <= Utc::now());
        assert!(store.remove(id).await.is_none());
        assert!(store.is_empty().await);
        assert!(store.with_session(id, |_| ()).await.is_none());
    }
}

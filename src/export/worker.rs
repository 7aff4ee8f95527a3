//! Off-thread exports.
//!
//! The interactive app must stay responsive while an image is rendered, so
//! each export runs on its own thread and reports back over a channel that
//! the event loop polls, the same way file changes are delivered.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::document::Document;

use super::{ExportError, Exporter, ImageSink};

/// What an export worker reports: the saved path, or why nothing was saved.
pub type ExportOutcome = Result<PathBuf, ExportError>;

/// Handle to one in-flight export.
#[derive(Debug)]
pub struct ExportJob {
    rx: Receiver<ExportOutcome>,
}

impl ExportJob {
    /// Start exporting `doc` on a background thread.
    pub fn spawn<S>(exporter: Arc<Exporter>, doc: Document, mut sink: S) -> Self
    where
        S: ImageSink + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("ai-share-export".to_string())
            .spawn({
                let tx = tx.clone();
                move || {
                    let outcome = exporter.export(&doc, &mut sink).map(|(path, _)| path);
                    if let Err(err) = &outcome {
                        tracing::warn!(error = %err, "export failed");
                    }
                    let _ = tx.send(outcome);
                }
            });
        if let Err(err) = spawned {
            let _ = tx.send(Err(ExportError::Save {
                path: PathBuf::new(),
                source: err,
            }));
        }
        Self { rx }
    }

    /// The outcome, once the worker is done. A worker that died without
    /// reporting yields an error so the caller never stays busy forever.
    pub fn try_finished(&self) -> Option<ExportOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ExportError::Save {
                path: PathBuf::new(),
                source: std::io::Error::other("export worker stopped unexpectedly"),
            })),
        }
    }

    /// Block until the worker reports.
    pub fn wait(self) -> ExportOutcome {
        self.rx.recv().unwrap_or_else(|_| {
            Err(ExportError::Save {
                path: PathBuf::new(),
                source: std::io::Error::other("export worker stopped unexpectedly"),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::document::{self, RenderDescriptor};
    use crate::export::DirectorySink;
    use crate::layout::FontBook;
    use crate::theme::ThemeId;

    fn exporter() -> Arc<Exporter> {
        Arc::new(Exporter::new(Arc::new(FontBook::empty())).with_settle(Duration::ZERO))
    }

    fn doc() -> Document {
        document::render(&RenderDescriptor::new("# Title", ThemeId::Dark.theme()))
    }

    #[test]
    fn test_job_reports_saved_path() {
        let dir = tempfile::tempdir().unwrap();
        let job = ExportJob::spawn(exporter(), doc(), DirectorySink::new(dir.path()));
        let path = job.wait().unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.exists());
    }

    #[test]
    fn test_job_reports_failure_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let job = ExportJob::spawn(exporter(), doc(), DirectorySink::new(&missing));
        assert!(job.wait().is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_try_finished_eventually_yields() {
        let dir = tempfile::tempdir().unwrap();
        let job = ExportJob::spawn(exporter(), doc(), DirectorySink::new(dir.path()));
        let outcome = loop {
            if let Some(outcome) = job.try_finished() {
                break outcome;
            }
            thread::sleep(Duration::from_millis(5));
        };
        assert!(outcome.is_ok());
    }
}

//! Where exported images go, and what they are called.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::ExportError;

/// Receives finished image bytes.
pub trait ImageSink {
    /// Save `bytes` under `file_name`, returning where they went.
    ///
    /// # Errors
    /// Returns [`ExportError::Save`] if the bytes cannot be stored. A failed
    /// save must not leave a partial file behind.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes images into a directory atomically.
///
/// Bytes go to a temporary file in the target directory which is then
/// renamed into place, so readers never observe a half-written PNG.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        let target = self.dir.join(file_name);
        let save_err = |source: std::io::Error| ExportError::Save {
            path: target.clone(),
            source,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(save_err)?;
        tmp.write_all(bytes).map_err(save_err)?;
        tmp.as_file().sync_all().map_err(save_err)?;
        tmp.persist(&target).map_err(|err| save_err(err.error))?;

        tracing::info!(path = %target.display(), bytes = bytes.len(), "saved export");
        Ok(target)
    }
}

/// Keeps saved images in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub saved: Vec<(String, Vec<u8>)>,
}

impl ImageSink for MemorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        self.saved.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

/// Produces `ai-share-<unix-ms>.png` names that never repeat.
///
/// Timestamps are forced to be strictly increasing, so two exports in the
/// same millisecond still get distinct names.
#[derive(Debug, Default)]
pub struct FileNamer {
    last: AtomicU64,
}

impl FileNamer {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Name for an export created now.
    pub fn next_name(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        self.name_at(now)
    }

    /// Name for an export created at `now_ms`.
    pub fn name_at(&self, now_ms: u64) -> String {
        let mut stamp = now_ms;
        let _ = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                stamp = now_ms.max(last.saturating_add(1));
                Some(stamp)
            });
        file_name(stamp)
    }
}

pub fn file_name(timestamp_ms: u64) -> String {
    format!("ai-share-{timestamp_ms}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_format() {
        assert_eq!(file_name(1_700_000_000_123), "ai-share-1700000000123.png");
    }

    #[test]
    fn test_namer_is_strictly_increasing_within_a_millisecond() {
        let namer = FileNamer::new();
        let a = namer.name_at(1000);
        let b = namer.name_at(1000);
        let c = namer.name_at(999);
        assert_eq!(a, "ai-share-1000.png");
        assert_eq!(b, "ai-share-1001.png");
        assert_eq!(c, "ai-share-1002.png");
    }

    #[test]
    fn test_namer_uses_clock() {
        let namer = FileNamer::new();
        let name = namer.next_name();
        assert!(name.starts_with("ai-share-"));
        assert!(name.ends_with(".png"));
        assert_ne!(name, namer.next_name());
    }

    #[test]
    fn test_directory_sink_persists_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        let path = sink.save("ai-share-1.png", b"png-bytes").unwrap();
        assert_eq!(path, dir.path().join("ai-share-1.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary file must not linger");
    }

    #[test]
    fn test_directory_sink_missing_dir_is_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("missing"));
        let err = sink.save("x.png", b"data").unwrap_err();
        assert!(matches!(err, ExportError::Save { .. }));
    }
}

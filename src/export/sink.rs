//! Destinations for rendered documents.
//!
//! Delivery happens in two phases so that several documents can be published
//! together: `stage` prepares a complete document without touching the
//! destination, `finalize` publishes it, and `rollback` undoes the last
//! `finalize` (or drops a staged document) when a sibling document failed.
//! `release` forgets the undo state once the whole set is published.
use crate::error::ExportError;
use crate::image::io::ensure_parent_dir;
use log::warn;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::{NamedTempFile, TempPath};

pub trait DocumentSink: Send {
    /// Prepare the complete document for publication.
    fn stage(&mut self, bytes: &[u8]) -> Result<(), ExportError>;

    /// Publish the staged document.
    fn finalize(&mut self) -> Result<(), ExportError>;

    /// Drop a staged document and restore what the destination held before
    /// the last `finalize`.
    fn rollback(&mut self) -> Result<(), ExportError>;

    /// Forget rollback state.
    fn release(&mut self) {}

    /// Human-readable destination for logs.
    fn describe(&self) -> String;

    /// Stage and publish a single document.
    fn commit(&mut self, bytes: &[u8]) -> Result<(), ExportError> {
        self.stage(bytes)?;
        self.finalize()?;
        self.release();
        Ok(())
    }
}

/// How to undo a published file.
#[derive(Debug)]
enum Undo {
    /// The destination did not exist before.
    Remove,
    /// The previous file, moved aside.
    Restore(TempPath),
}

/// Writes to a temporary file next to `path` and renames it into place.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    staged: Option<NamedTempFile>,
    undo: Option<Undo>,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            staged: None,
            undo: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn persist_error(&self, reason: impl ToString) -> ExportError {
        ExportError::Persist {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl DocumentSink for FileSink {
    fn stage(&mut self, bytes: &[u8]) -> Result<(), ExportError> {
        if self.path.is_dir() {
            return Err(self.persist_error("destination is a directory"));
        }
        ensure_parent_dir(&self.path)?;
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        self.staged = Some(tmp);
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), ExportError> {
        let tmp = self
            .staged
            .take()
            .ok_or_else(|| self.persist_error("no document staged"))?;
        let undo = if self.path.exists() {
            let backup = NamedTempFile::new_in(self.dir())?.into_temp_path();
            fs::rename(&self.path, &backup)?;
            Undo::Restore(backup)
        } else {
            Undo::Remove
        };
        if let Err(err) = tmp.persist(&self.path) {
            if let Undo::Restore(backup) = undo {
                if let Err(restore) = backup.persist(&self.path) {
                    warn!(
                        "FileSink: could not restore {}: {}",
                        self.path.display(),
                        restore.error
                    );
                }
            }
            return Err(self.persist_error(err.error));
        }
        self.undo = Some(undo);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ExportError> {
        self.staged = None;
        match self.undo.take() {
            Some(Undo::Restore(backup)) => backup
                .persist(&self.path)
                .map_err(|e| self.persist_error(e.error))?,
            Some(Undo::Remove) => fs::remove_file(&self.path)?,
            None => {}
        }
        Ok(())
    }

    fn release(&mut self) {
        self.undo = None;
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the published document in memory. Clones share the same buffer, so
/// a caller can keep one handle and give the other to the pipeline.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    contents: Arc<Mutex<Option<Vec<u8>>>>,
    staged: Option<Vec<u8>>,
    previous: Option<Option<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The published bytes, `None` until something was published.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Vec<u8>>>, ExportError> {
        self.contents
            .lock()
            .map_err(|_| ExportError::Io(std::io::Error::other("memory sink lock poisoned")))
    }
}

impl DocumentSink for MemorySink {
    fn stage(&mut self, bytes: &[u8]) -> Result<(), ExportError> {
        self.staged = Some(bytes.to_vec());
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), ExportError> {
        let doc = self.staged.take().ok_or_else(|| {
            ExportError::Io(std::io::Error::other("memory sink has no staged document"))
        })?;
        let previous = self.lock()?.replace(doc);
        self.previous = Some(previous);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ExportError> {
        self.staged = None;
        if let Some(previous) = self.previous.take() {
            *self.lock()? = previous;
        }
        Ok(())
    }

    fn release(&mut self) {
        self.previous = None;
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn file_sink_creates_directories_and_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.txt");
        let mut sink = FileSink::new(&path);
        sink.commit(b"first").unwrap();
        sink.commit(b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        // only the final file remains in the directory
        assert_eq!(entries(path.parent().unwrap()), 1);
    }

    #[test]
    fn staging_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, b"old").unwrap();
        let mut sink = FileSink::new(&path);
        sink.stage(b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"old");
        sink.rollback().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"old");
        assert_eq!(entries(dir.path()), 1);
    }

    #[test]
    fn rollback_restores_replaced_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, b"old").unwrap();
        let mut sink = FileSink::new(&path);
        sink.stage(b"new").unwrap();
        sink.finalize().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        sink.rollback().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"old");
        assert_eq!(entries(dir.path()), 1);
    }

    #[test]
    fn rollback_removes_newly_created_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut sink = FileSink::new(&path);
        sink.stage(b"new").unwrap();
        sink.finalize().unwrap();
        sink.rollback().unwrap();
        assert!(!path.exists());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn release_drops_the_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, b"old").unwrap();
        let mut sink = FileSink::new(&path);
        sink.stage(b"new").unwrap();
        sink.finalize().unwrap();
        assert_eq!(entries(dir.path()), 2);
        sink.release();
        assert_eq!(entries(dir.path()), 1);
        sink.rollback().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn directory_destination_fails_at_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path());
        let err = sink.stage(b"doc").unwrap_err();
        assert!(matches!(err, ExportError::Persist { .. }));
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn memory_sink_clones_share_contents() {
        let handle = MemorySink::new();
        let mut sink = handle.clone();
        assert!(handle.contents().is_none());
        sink.commit(b"abc").unwrap();
        assert_eq!(handle.contents().unwrap(), b"abc");
        sink.stage(b"def").unwrap();
        sink.finalize().unwrap();
        sink.rollback().unwrap();
        assert_eq!(handle.contents().unwrap(), b"abc");
    }
}

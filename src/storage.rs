//! Staging of uploaded exports and produced line files.
//!
//! Uploads land in the import directory as `<id>.json`, where `<id>` is a
//! freshly generated UUID. Processing converts an upload into
//! `<export>/<id>.md` and removes the upload. Exports older than the configured
//! time-to-live are deleted by [`FileStorage::cleanup_export_directory`], which
//! a [`CleanupWorker`] can run periodically.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatflat::Result<()> {
//! use std::sync::Arc;
//! use chatflat::config::StorageConfig;
//! use chatflat::pipeline::Pipeline;
//! use chatflat::storage::{FileStorage, spawn_cleanup_worker};
//!
//! let storage = Arc::new(FileStorage::new(StorageConfig::from_env(), Pipeline::new())?);
//! let _worker = spawn_cleanup_worker(Arc::clone(&storage))?;
//!
//! let id = storage.upload_file("result.json")?;
//! let result = storage.process_file(&id, None);
//! if result.is_completed() {
//!     println!("{}", storage.export_file(&id)?.display());
//! }
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::collections::HashSet;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::core::filter::MessageFilter;
use crate::error::{ChatflatError, Result};
use crate::pipeline::Pipeline;

const IMPORT_EXTENSION: &str = "json";
const EXPORT_EXTENSION: &str = "md";

/// Export directories with a sweep in progress, shared by every
/// [`FileStorage`] in the process.
static ACTIVE_SWEEPS: LazyLock<Mutex<HashSet<PathBuf>>> = LazyLock::new(Default::default);

/// Marks one export directory as being swept until dropped.
struct SweepGuard {
    dir: PathBuf,
}

impl SweepGuard {
    /// `None` if a sweep of `dir` is already running anywhere in the process.
    fn try_acquire(dir: &Path) -> Option<Self> {
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut active = ACTIVE_SWEEPS.lock().unwrap_or_else(PoisonError::into_inner);
        active.insert(dir.clone()).then_some(Self { dir })
    }
}

impl Drop for SweepGuard {
    fn drop(&mut self) {
        ACTIVE_SWEEPS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.dir);
    }
}

/// Outcome of a processing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    Completed,
    Failed,
}

/// Report for one [`FileStorage::process_file`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub file_id: String,
    pub status: ProcessingStatus,
    /// Error message, without filesystem paths. `None` on success.
    pub error: Option<String>,
    /// Number of lines written. Zero on failure.
    pub lines: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ProcessingResult {
    fn completed(file_id: &str, lines: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            file_id: file_id.to_string(),
            status: ProcessingStatus::Completed,
            error: None,
            lines,
            started_at,
            completed_at: Utc::now(),
        }
    }

    fn failed(file_id: &str, error: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            file_id: file_id.to_string(),
            status: ProcessingStatus::Failed,
            error: Some(error.into()),
            lines: 0,
            started_at,
            completed_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProcessingStatus::Completed
    }
}

/// Result of a cleanup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Another sweep was running; this request was dropped.
    Skipped,
    /// The sweep ran and deleted `removed` exports.
    Completed { removed: usize },
}

/// Import/export staging directories plus the pipeline that converts between
/// them.
#[derive(Debug)]
pub struct FileStorage {
    config: StorageConfig,
    pipeline: Pipeline,
}

impl FileStorage {
    /// Creates the storage, creating both directories if needed.
    pub fn new(config: StorageConfig, pipeline: Pipeline) -> Result<Self> {
        for dir in [&config.import_dir, &config.export_dir] {
            fs::create_dir_all(dir).map_err(|err| {
                error!(dir = %dir.display(), error = %err, "cannot create staging directory");
                ChatflatError::Io(err)
            })?;
        }
        info!(
            import = %config.import_dir.display(),
            export = %config.export_dir.display(),
            "staging directories ready"
        );

        Ok(Self {
            config,
            pipeline,
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn import_dir(&self) -> &Path {
        &self.config.import_dir
    }

    pub fn export_dir(&self) -> &Path {
        &self.config.export_dir
    }

    /// Copies `source` into the import directory and returns its new id.
    pub fn upload_file(&self, source: impl AsRef<Path>) -> Result<String> {
        let source = source.as_ref();
        let id = Uuid::new_v4();
        let target = self.import_path(id);

        fs::copy(source, &target).map_err(|err| ChatflatError::from_io_at(err, source))?;
        info!(file_id = %id, source = %source.display(), "upload staged");

        Ok(id.to_string())
    }

    /// Stores `bytes` in the import directory and returns their new id.
    pub fn upload_bytes(&self, bytes: &[u8]) -> Result<String> {
        let id = Uuid::new_v4();
        fs::write(self.import_path(id), bytes)?;
        info!(file_id = %id, size = bytes.len(), "upload staged");

        Ok(id.to_string())
    }

    /// Converts the staged upload `file_id` into its export.
    ///
    /// Never returns an error: failures are reported in the result. The
    /// upload is removed only when the export was written. Once the export
    /// exists the result is `Completed`, even if the upload cannot be removed.
    pub fn process_file(&self, file_id: &str, filter: Option<&MessageFilter>) -> ProcessingResult {
        let started_at = Utc::now();

        let Some(id) = parse_id(file_id) else {
            warn!(file_id, "rejecting malformed file id");
            return ProcessingResult::failed(file_id, ChatflatError::not_found(file_id).to_string(), started_at);
        };

        match self.convert(id, filter) {
            Ok(lines) => {
                info!(file_id, lines, "file processed");
                ProcessingResult::completed(file_id, lines, started_at)
            }
            Err(err) => {
                warn!(file_id, error = %err, code = err.code(), "file processing failed");
                ProcessingResult::failed(file_id, err.to_string(), started_at)
            }
        }
    }

    fn convert(&self, id: Uuid, filter: Option<&MessageFilter>) -> Result<usize> {
        let import = self.import_path(id);
        let document = fs::read_to_string(&import).map_err(|err| ChatflatError::from_io_at(err, &import))?;

        let lines = self
            .pipeline
            .run_to_destination(&document, self.export_path(id), filter)?;
        discard_upload(&import);

        Ok(lines)
    }

    /// Path of the export for `file_id`.
    ///
    /// # Errors
    ///
    /// [`ChatflatError::NotFound`] if the id is malformed or no export exists.
    pub fn export_file(&self, file_id: &str) -> Result<PathBuf> {
        let id = parse_id(file_id).ok_or_else(|| ChatflatError::not_found(file_id))?;
        let path = self.export_path(id);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ChatflatError::not_found(path))
        }
    }

    pub fn export_file_exists(&self, file_id: &str) -> bool {
        self.export_file(file_id).is_ok()
    }

    /// Deletes exports last modified more than `export_ttl` ago.
    ///
    /// At most one sweep of an export directory runs at a time in the
    /// process, across all `FileStorage` values sharing that directory. A
    /// call made while another sweep is in progress returns
    /// [`CleanupOutcome::Skipped`] immediately.
    pub fn cleanup_export_directory(&self) -> CleanupOutcome {
        let Some(_guard) = SweepGuard::try_acquire(self.export_dir()) else {
            info!("cleanup already running, skipping");
            return CleanupOutcome::Skipped;
        };

        let removed = self.sweep();
        info!(removed, "cleanup finished");
        CleanupOutcome::Completed { removed }
    }

    fn sweep(&self) -> usize {
        let entries = match fs::read_dir(self.export_dir()) {
            Ok(entries) => entries,
            Err(err) => {
                error!(dir = %self.export_dir().display(), error = %err, "cannot list export directory");
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXPORT_EXTENSION) {
                continue;
            }

            let modified = match entry.metadata().and_then(|meta| meta.modified()) {
                Ok(modified) => modified,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "cannot read modification time");
                    continue;
                }
            };

            // A timestamp in the future is never stale.
            let Ok(age) = now.duration_since(modified) else {
                continue;
            };
            if age <= self.config.export_ttl {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "removed stale export");
                    removed += 1;
                }
                Err(err) => warn!(path = %path.display(), error = %err, "cannot remove stale export"),
            }
        }

        removed
    }

    fn import_path(&self, id: Uuid) -> PathBuf {
        self.config
            .import_dir
            .join(format!("{id}.{IMPORT_EXTENSION}"))
    }

    fn export_path(&self, id: Uuid) -> PathBuf {
        self.config
            .export_dir
            .join(format!("{id}.{EXPORT_EXTENSION}"))
    }
}

/// Removes a consumed upload. Failure is logged, not reported.
fn discard_upload(import: &Path) -> bool {
    match fs::remove_file(import) {
        Ok(()) => true,
        Err(err) => {
            warn!(path = %import.display(), error = %err, "cannot remove processed upload");
            false
        }
    }
}

/// Only canonical UUIDs name staged files, so ids can never escape the
/// staging directories.
fn parse_id(file_id: &str) -> Option<Uuid> {
    Uuid::parse_str(file_id).ok()
}

/// Handle to the background cleanup thread.
///
/// The thread stops when [`stop`](Self::stop) is called or the handle is
/// dropped.
#[derive(Debug)]
pub struct CleanupWorker {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CleanupWorker {
    /// Stops the worker and waits for an in-flight sweep to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("cleanup worker panicked");
            }
        }
    }
}

impl Drop for CleanupWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs [`FileStorage::cleanup_export_directory`] every `cleanup_interval`
/// on a dedicated thread.
pub fn spawn_cleanup_worker(storage: Arc<FileStorage>) -> Result<CleanupWorker> {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let interval = storage.config.cleanup_interval;

    let handle = thread::Builder::new()
        .name("chatflat-cleanup".to_string())
        .spawn(move || {
            info!(interval = ?interval, "cleanup worker started");
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        storage.cleanup_export_directory();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("cleanup worker stopped");
        })?;

    Ok(CleanupWorker {
        stop: Some(stop_tx),
        handle: Some(handle),
    })
}

//! File-backed record store (one `rkyv` file per record).

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use tracing::{debug, warn};

use crate::constants::{RECORD_FILE_EXTENSION, RECORD_TEMP_EXTENSION};

use super::backend::{RecordBackend, ScannedRecord};
use super::error::{StoreError, StoreResult};
use super::model::CacheRecord;

const BACKEND_NAME: &str = "file";

#[derive(Debug, Clone)]
/// Stores each [`CacheRecord`] as `{root}/{id}.rkyv`.
///
/// Writes go to a temp file and are renamed into place, so a concurrent scan
/// sees either the old file or the complete new one. Blocking I/O runs on the
/// tokio blocking pool.
pub struct FileBackend {
    root: PathBuf,
    temp_seq: Arc<AtomicU64>,
}

impl FileBackend {
    /// Creates a backend rooted at `root` (created lazily on first write).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            temp_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a backend and its root directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let backend = Self::new(root);
        ensure_root(&backend.root)?;
        Ok(backend)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn run_blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(PathBuf) -> StoreResult<T> + Send + 'static,
    {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || op(root))
            .await
            .map_err(|e| StoreError::unavailable(BACKEND_NAME, format!("I/O task failed: {}", e)))?
    }
}

fn io_unavailable(context: &str, path: &Path, err: std::io::Error) -> StoreError {
    StoreError::unavailable(
        BACKEND_NAME,
        format!("{} '{}': {}", context, path.display(), err),
    )
}

fn ensure_root(root: &Path) -> StoreResult<()> {
    if root.exists() && !root.is_dir() {
        return Err(StoreError::unavailable(
            BACKEND_NAME,
            format!("storage path is not a directory: {}", root.display()),
        ));
    }
    fs::create_dir_all(root).map_err(|e| io_unavailable("failed to create", root, e))
}

/// `true` if `root` is a directory, or is absent under a directory it can be
/// created in. Never touches the filesystem.
fn root_is_usable(root: &Path) -> bool {
    if root.exists() {
        return root.is_dir();
    }
    root.ancestors()
        .skip(1)
        .find(|p| p.exists())
        .is_none_or(|p| p.is_dir())
}

fn write_temp_file(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut file = File::create(path).map_err(|e| io_unavailable("failed to create", path, e))?;
    file.write_all(bytes)
        .map_err(|e| io_unavailable("failed to write", path, e))?;
    file.sync_all()
        .map_err(|e| io_unavailable("failed to sync", path, e))
}

/// Record ids become file names, so only a conservative character set is allowed.
fn validate_id(id: &str) -> StoreResult<()> {
    if id.is_empty() || id.starts_with('.') {
        return Err(StoreError::invalid(id, "id is not a valid file name"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(StoreError::invalid(
            id,
            "id may only contain ASCII letters, digits, '-', '_' and '.'",
        ));
    }
    Ok(())
}

fn record_path(root: &Path, id: &str) -> PathBuf {
    root.join(format!("{}.{}", id, RECORD_FILE_EXTENSION))
}

fn is_record_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == RECORD_FILE_EXTENSION)
}

fn decode_record(bytes: &[u8]) -> Result<CacheRecord, String> {
    // Archived f32/i64 fields need aligned input; plain `fs::read` buffers are not.
    let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);
    rkyv::from_bytes::<CacheRecord, RkyvError>(&aligned).map_err(|e| e.to_string())
}

fn read_record_file(path: &Path) -> Result<CacheRecord, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    let record = decode_record(&bytes)?;

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if record.id != stem {
        return Err(format!(
            "record id '{}' does not match file name '{}'",
            record.id, stem
        ));
    }
    Ok(record)
}

fn list_record_files(root: &Path) -> StoreResult<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(root).map_err(|e| io_unavailable("failed to read", root, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_unavailable("failed to read", root, e))?;
        let path = entry.path();
        if is_record_file(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

impl RecordBackend for FileBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn is_ready(&self) -> bool {
        self.run_blocking(|root| Ok(root_is_usable(&root)))
            .await
            .unwrap_or(false)
    }

    async fn put(&self, record: CacheRecord) -> StoreResult<()> {
        validate_id(&record.id)?;

        let bytes = rkyv::to_bytes::<RkyvError>(&record)
            .map_err(|e| StoreError::invalid(&record.id, format!("serialization failed: {}", e)))?;
        let temp_seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);

        self.run_blocking(move |root| {
            ensure_root(&root)?;

            let final_path = record_path(&root, &record.id);
            let temp_path =
                root.join(format!("{}.{}.{}", record.id, temp_seq, RECORD_TEMP_EXTENSION));

            let written = write_temp_file(&temp_path, &bytes).and_then(|()| {
                fs::rename(&temp_path, &final_path)
                    .map_err(|e| io_unavailable("failed to rename", &temp_path, e))
            });
            if let Err(err) = written {
                if let Err(e) = fs::remove_file(&temp_path)
                    && e.kind() != std::io::ErrorKind::NotFound
                {
                    warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
                }
                return Err(err);
            }

            debug!(id = %record.id, bytes = bytes.len(), "Record written");
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<CacheRecord>> {
        validate_id(id)?;
        let id = id.to_string();

        self.run_blocking(move |root| {
            let path = record_path(&root, &id);
            if !path.exists() {
                return Ok(None);
            }
            read_record_file(&path)
                .map(Some)
                .map_err(|reason| StoreError::invalid(&id, reason))
        })
        .await
    }

    async fn scan(&self) -> StoreResult<Vec<ScannedRecord>> {
        self.run_blocking(|root| {
            let files = list_record_files(&root)?;
            Ok(files
                .into_iter()
                .map(|path| match read_record_file(&path) {
                    Ok(record) => ScannedRecord::Decoded(record),
                    Err(reason) => ScannedRecord::Malformed {
                        key: path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                        reason,
                    },
                })
                .collect())
        })
        .await
    }

    async fn count(&self) -> StoreResult<usize> {
        self.run_blocking(|root| list_record_files(&root).map(|files| files.len()))
            .await
    }
}

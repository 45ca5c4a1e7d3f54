use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::lock::{FileLock, LockError};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};

/// Error type for flat-file store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is corrupt ({source}); its contents were copied to the recovery log")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize records: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// One domain's records, persisted as a pretty-printed JSON array.
///
/// Every `load` re-reads the file; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    data_dir: PathBuf,
    path: PathBuf,
    _records: PhantomData<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// A store for `file_name` inside `data_dir`. An absolute `file_name` is used as-is.
    pub fn new(data_dir: &Path, file_name: &str) -> Self {
        JsonStore {
            data_dir: data_dir.to_path_buf(),
            path: data_dir.join(file_name),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File name for log messages and recovery entries
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Read every record. A missing or blank file is an empty store and is
    /// not created. An unparsable file is `StoreError::Corrupt`, with the raw
    /// content copied to the recovery log first (once per distinct content).
    pub fn load(&self) -> Result<Vec<T>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            log::warn!("{} is corrupt: {}", self.path.display(), e);
            recovery::log_recovery_once(
                &self.data_dir,
                RecoveryEntry::new(RecoveryCategory::Corrupt, "unparsable store")
                    .field("Store", self.name())
                    .field("Error", e.to_string())
                    .body(content.as_str()),
                "Store",
            );
            StoreError::Corrupt {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    /// Overwrite the whole file with `records`.
    pub fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let mut content = serde_json::to_string_pretty(records)?;
        content.push('\n');
        write_or_recover(&self.data_dir, &self.path, &content)?;
        log::debug!("wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Take the data directory's write lock, creating the directory if needed.
    /// Hold the guard across a load/modify/save cycle.
    pub fn lock(&self) -> Result<FileLock, StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::WriteError {
            path: self.data_dir.clone(),
            source: e,
        })?;
        Ok(FileLock::acquire_default(&self.data_dir)?)
    }

    /// Sidecar holding the next event id: `<store>.seq`
    fn sequence_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".seq");
        PathBuf::from(name)
    }

    /// Persisted high-water mark for ids. A missing or unreadable sidecar reads as 0;
    /// callers combine it with the ids actually present.
    pub fn read_sequence(&self) -> u64 {
        let path = self.sequence_path();
        let Ok(content) = fs::read_to_string(&path) else {
            return 0;
        };
        match serde_json::from_str::<Sequence>(&content) {
            Ok(seq) => seq.next_id,
            Err(e) => {
                log::warn!("ignoring unreadable {}: {}", path.display(), e);
                0
            }
        }
    }

    pub fn write_sequence(&self, next_id: u64) -> Result<(), StoreError> {
        let content = serde_json::to_string(&Sequence { next_id })?;
        write_or_recover(&self.data_dir, &self.sequence_path(), &content)
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Sequence {
    next_id: u64,
}

fn write_or_recover(data_dir: &Path, path: &Path, content: &str) -> Result<(), StoreError> {
    let result = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
    .and_then(|()| recovery::atomic_write(path, content.as_bytes()));

    if let Err(e) = result {
        log::warn!("write to {} failed: {}", path.display(), e);
        recovery::log_recovery(
            data_dir,
            RecoveryEntry::new(RecoveryCategory::Write, "store write failed")
                .field("Target", path.display().to_string())
                .field("Error", e.to_string())
                .body(content),
        );
        return Err(StoreError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

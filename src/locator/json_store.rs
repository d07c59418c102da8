//! File-backed key-value store.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError};

/// Current store file format version.
///
/// Increment this when making breaking changes to the format.
const STORE_FILE_VERSION: u32 = 1;

/// On-disk store format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    version: u32,

    /// Unix timestamp of the last write. Informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_at: Option<String>,

    entries: BTreeMap<String, String>,
}

fn unix_timestamp_now() -> String {
    use std::time::SystemTime;

    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", duration.as_secs())
}

/// [`KeyValueStore`] persisted as a single JSON file.
///
/// # Atomic Writes
///
/// Every `put` rewrites the file through `{path}.tmp` followed by a rename,
/// so the file is either the previous or the next version, never partial.
/// Writers within one process are serialized.
///
/// A missing file is an empty store. A file that cannot be parsed, or that
/// carries an unknown version, is reported as [`StoreError::Corrupted`].
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store at the given path. Nothing is touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Returns the path of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreFile, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(StoreFile {
                    version: STORE_FILE_VERSION,
                    ..StoreFile::default()
                });
            }
            Err(e) => return Err(StoreError::Read(e)),
        };

        let file: StoreFile =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
                reason: format!("Invalid JSON: {e}"),
            })?;

        if file.version != STORE_FILE_VERSION {
            return Err(StoreError::Corrupted {
                reason: format!(
                    "Incompatible version: expected {STORE_FILE_VERSION}, got {}",
                    file.version
                ),
            });
        }
        Ok(file)
    }

    /// Performs the blocking save; run inside `spawn_blocking`.
    fn save_blocking(path: &Path, file: &StoreFile) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(file).map_err(StoreError::Serialize)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::Write)?;
            }
        }

        // store.json -> store.json.tmp
        let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
        std::fs::write(&temp_path, content).map_err(StoreError::Write)?;
        std::fs::rename(&temp_path, path).map_err(StoreError::Write)?;

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut file = self.load().await?;
        Ok(file.entries.remove(key))
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut file = self.load().await?;
        file.entries.insert(key.to_string(), value);
        file.saved_at = Some(unix_timestamp_now());

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::save_blocking(&path, &file))
            .await
            .map_err(|e| StoreError::Write(std::io::Error::other(e)))?
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

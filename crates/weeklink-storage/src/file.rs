use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};
use weeklink_core::error::Result;
use weeklink_core::{KeyValueStore, StorageError};

/// A [`KeyValueStore`] persisted as a single JSON object on disk.
///
/// Every key lives in one file. Writes go to a sibling temporary file which
/// is then renamed over the original, so a crash mid-write leaves the
/// previous contents intact. Writes from the same process are serialized;
/// writes from other processes are not coordinated.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file does not need to exist; it is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn load(&self) -> Result<Map<String, Value>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "store file does not exist yet");
                return Ok(Map::new());
            }
            Err(e) => return Err(map_io_error("failed to read store file", e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::InvalidData(format!(
                "store file '{}' does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store file is not valid JSON");
                Err(StorageError::InvalidData(format!(
                    "store file '{}' is not valid JSON: {e}",
                    self.path.display()
                )))
            }
        }
    }
}

fn map_io_error(operation: &str, err: std::io::Error) -> StorageError {
    let message = format!("{operation}: {err}");
    match err.kind() {
        ErrorKind::TimedOut => StorageError::Timeout(message),
        ErrorKind::PermissionDenied => StorageError::Unavailable(message),
        _ => StorageError::Io(message),
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut map = self.load().await?;
        Ok(map.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut map = self.load().await?;
        map.insert(key.to_owned(), value);

        let json = serde_json::to_vec_pretty(&Value::Object(map)).map_err(|e| {
            StorageError::Serialization(format!("failed to serialize store file: {e}"))
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| map_io_error("failed to create store directory", e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| map_io_error("failed to write temporary store file", e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| map_io_error("failed to replace store file", e))?;

        debug!(path = %self.path.display(), key, "wrote store file");
        Ok(())
    }
}

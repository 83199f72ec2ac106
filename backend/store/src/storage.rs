//! Options storage ports.
//!
//! `FileOptionsStorage` keeps a small JSON key-value document on disk, the
//! local counterpart of browser local storage. `MemoryOptionsStorage` keeps
//! the value in process.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use playground_core::{Options, OptionsStorage, PlaygroundError, Result};

/// Storage key holding the serialized options.
pub const OPTIONS_KEY: &str = "__options__";

/// Default file name within the state directory.
pub const STORAGE_FILE_NAME: &str = "local_storage.json";

/// File-backed key-value storage. Writes replace the file atomically.
pub struct FileOptionsStorage {
    path: PathBuf,
}

impl FileOptionsStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage file inside `state_dir`.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(STORAGE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents, or `None` when nothing has been stored yet.
    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            PlaygroundError::Storage(format!("failed to read {}: {e}", self.path.display()))
        })?;
        Ok(Some(raw).filter(|raw| !raw.trim().is_empty()))
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        let Some(raw) = self.read_raw()? else {
            return Ok(Map::new());
        };
        serde_json::from_str(&raw).map_err(|e| {
            PlaygroundError::Storage(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    /// Document to write into. Contents that are not a JSON object are
    /// dropped and the file is overwritten on the next write.
    fn writable_document(&self) -> Result<Map<String, Value>> {
        let Some(raw) = self.read_raw()? else {
            return Ok(Map::new());
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => {
                warn!(
                    path = %self.path.display(),
                    "Storage document is not an object; overwriting"
                );
                Ok(Map::new())
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Storage document unreadable; overwriting"
                );
                Ok(Map::new())
            }
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    PlaygroundError::Storage(format!("failed to create {}: {e}", parent.display()))
                })?;
            }
        }
        let raw = serde_json::to_string_pretty(document)
            .map_err(|e| PlaygroundError::Storage(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, raw).map_err(|e| {
            PlaygroundError::Storage(format!("failed to write {}: {e}", tmp_path.display()))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            PlaygroundError::Storage(format!("failed to replace {}: {e}", self.path.display()))
        })?;
        Ok(())
    }
}

impl OptionsStorage for FileOptionsStorage {
    fn load_options(&self) -> Result<Option<Options>> {
        let document = self.read_document()?;
        match document.get(OPTIONS_KEY) {
            Some(value) => {
                let options = serde_json::from_value(value.clone()).map_err(|e| {
                    PlaygroundError::Storage(format!("invalid {OPTIONS_KEY} entry: {e}"))
                })?;
                info!(path = %self.path.display(), "Loaded stored options");
                Ok(Some(options))
            }
            None => Ok(None),
        }
    }

    fn save_options(&self, options: &Options) -> Result<()> {
        let mut document = self.writable_document()?;
        let value =
            serde_json::to_value(options).map_err(|e| PlaygroundError::Storage(e.to_string()))?;
        document.insert(OPTIONS_KEY.to_string(), value);
        self.write_document(&document)?;
        debug!(path = %self.path.display(), "Persisted options");
        Ok(())
    }
}

/// In-process storage.
#[derive(Default)]
pub struct MemoryOptionsStorage {
    options: Mutex<Option<Options>>,
}

impl MemoryOptionsStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            options: Mutex::new(Some(options)),
        }
    }

    /// Currently stored value.
    pub fn stored(&self) -> Option<Options> {
        self.options
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl OptionsStorage for MemoryOptionsStorage {
    fn load_options(&self) -> Result<Option<Options>> {
        Ok(self.stored())
    }

    fn save_options(&self, options: &Options) -> Result<()> {
        *self
            .options
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(options.clone());
        Ok(())
    }
}

use crate::error::{ReaderError, Result};
use crate::settings::Settings;
use async_trait::async_trait;
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Storage key of the settings record
pub const SETTINGS_KEY: &str = "user_settings_v1";

/// Key-value storage holding JSON values
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Storage kept in memory, lost on drop
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<IndexMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ReaderError::Storage(format!("Storage lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ReaderError::Storage(format!("Storage lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage in a single JSON object file, rewritten on every set
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<IndexMap<String, Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(IndexMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(IndexMap::new()),
            Err(e) => Err(ReaderError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_all().await?.shift_remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            ReaderError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

/// Reads and writes the settings record, supplying defaults when absent
#[derive(Clone)]
pub struct SettingsStore {
    backend: Arc<dyn StorageBackend>,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Store backed by memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Current settings; a missing or unreadable record yields the defaults
    pub async fn get(&self) -> Result<Settings> {
        match self.backend.get(SETTINGS_KEY).await? {
            None => Ok(Settings::default()),
            Some(value) => match serde_json::from_value(value) {
                Ok(settings) => Ok(settings),
                Err(e) => {
                    warn!("Stored settings are malformed, using defaults: {}", e);
                    Ok(Settings::default())
                }
            },
        }
    }

    /// Replace the whole record
    pub async fn set(&self, settings: &Settings) -> Result<()> {
        debug!("Saving settings");
        self.backend
            .set(SETTINGS_KEY, serde_json::to_value(settings)?)
            .await
    }

    /// Write the defaults if no record exists yet. Returns whether it wrote.
    pub async fn ensure_defaults(&self) -> Result<bool> {
        if self.backend.get(SETTINGS_KEY).await?.is_some() {
            return Ok(false);
        }
        info!("No settings stored, writing defaults");
        self.set(&Settings::default()).await?;
        Ok(true)
    }

    /// Replace the record with the defaults
    pub async fn reset(&self) -> Result<Settings> {
        let defaults = Settings::default();
        self.set(&defaults).await?;
        Ok(defaults)
    }
}

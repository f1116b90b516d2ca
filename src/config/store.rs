//! Config store: owns the in-memory `DayPlannerConfig` and its persisted copy.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::DayPlannerConfig;
use crate::error::ConfigError;
use crate::storage::Storage;

/// Storage slot holding the serialized config.
pub const CONFIG_STORAGE_KEY: &str = "day-planner-config";

/// Durable, write-through config store.
///
/// Every mutation persists immediately. A failed write is logged and the
/// in-memory value is kept.
pub struct ConfigStore {
    storage: Arc<dyn Storage>,
    current: RwLock<DayPlannerConfig>,
    /// Set once storage has been read or the value has been written.
    loaded: AtomicBool,
}

impl ConfigStore {
    /// Create a store holding the default config. Call [`ConfigStore::load`] to read storage.
    pub fn new(storage: Arc<dyn Storage>) -> Arc<Self> {
        Arc::new(Self {
            storage,
            current: RwLock::new(DayPlannerConfig::default()),
            loaded: AtomicBool::new(false),
        })
    }

    /// Create a store and load the persisted config into it.
    pub async fn open(storage: Arc<dyn Storage>) -> Arc<Self> {
        let store = Self::new(storage);
        store.load().await;
        store
    }

    /// Read the persisted config, falling back to defaults.
    ///
    /// Storage is read only the first time; afterwards the in-memory value is
    /// authoritative and returned as-is, so a failed persist never rolls it
    /// back. Never fails: a missing slot, a storage error, or undecodable text
    /// all yield the default.
    pub async fn load(&self) -> DayPlannerConfig {
        let mut current = self.current.write().await;
        if self.loaded.load(Ordering::Acquire) {
            return current.clone();
        }

        let loaded = self.read_persisted().await;
        *current = loaded.clone();
        self.loaded.store(true, Ordering::Release);
        loaded
    }

    async fn read_persisted(&self) -> DayPlannerConfig {
        match self.storage.get(CONFIG_STORAGE_KEY).await {
            Ok(Some(raw)) => match DayPlannerConfig::parse(raw.as_bytes()) {
                Ok(config) => {
                    info!("Configuration loaded from storage");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "Stored configuration is corrupt, using defaults");
                    DayPlannerConfig::default()
                }
            },
            Ok(None) => {
                debug!("No stored configuration, using defaults");
                DayPlannerConfig::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored configuration, using defaults");
                DayPlannerConfig::default()
            }
        }
    }

    /// The in-memory config.
    pub async fn current(&self) -> DayPlannerConfig {
        self.current.read().await.clone()
    }

    /// Apply `transform` to the current config, persist, and return the result.
    pub async fn update<F>(&self, transform: F) -> DayPlannerConfig
    where
        F: FnOnce(DayPlannerConfig) -> DayPlannerConfig,
    {
        let mut current = self.current.write().await;
        let updated = transform(current.clone());
        *current = updated.clone();
        self.loaded.store(true, Ordering::Release);
        self.persist(&updated).await;
        updated
    }

    /// Replace the config wholesale.
    pub async fn set(&self, config: DayPlannerConfig) -> DayPlannerConfig {
        self.update(|_| config).await
    }

    /// Reset to the compiled-in default.
    pub async fn reset(&self) -> DayPlannerConfig {
        let config = self.update(|_| DayPlannerConfig::default()).await;
        info!("Configuration reset to defaults");
        config
    }

    /// Serialize the current config as pretty-printed JSON.
    pub async fn export(&self) -> Result<Vec<u8>, ConfigError> {
        let bytes = self.current().await.to_pretty_json()?;
        info!(bytes = bytes.len(), "Configuration exported");
        Ok(bytes)
    }

    /// Parse `bytes` and replace the current config with it.
    ///
    /// Fields absent from the import take defaults, not the previous values.
    /// On a parse error the current config is left untouched.
    pub async fn import(&self, bytes: &[u8]) -> Result<DayPlannerConfig, ConfigError> {
        let imported = DayPlannerConfig::parse(bytes).inspect_err(|e| {
            warn!(error = %e, "Failed to import configuration");
        })?;
        let config = self.set(imported).await;
        info!("Configuration imported");
        Ok(config)
    }

    /// Read a config file from disk and import it.
    pub async fn import_file(&self, path: &Path) -> Result<DayPlannerConfig, ConfigError> {
        let bytes = tokio::fs::read(path).await?;
        self.import(&bytes).await
    }

    async fn persist(&self, config: &DayPlannerConfig) {
        let serialized = match serde_json::to_string(config) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to serialize configuration");
                return;
            }
        };
        match self.storage.set(CONFIG_STORAGE_KEY, &serialized).await {
            Ok(()) => debug!("Configuration saved"),
            Err(e) => warn!(error = %e, "Failed to save configuration"),
        }
    }
}

/// File name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("day-planner-config-{}.json", date.format("%Y-%m-%d"))
}

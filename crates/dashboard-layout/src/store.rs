//! Durable key-value persistence for dashboard state.
//!
//! The layout and the active widget set live under two independent keys so
//! that a corrupted value under one key never hides the other. Reads never
//! fail: anything unreadable degrades to "absent" and is logged. Writes
//! report errors to the caller instead of panicking.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{PersistError, StoreError};
use crate::types::{LayoutAssignment, PersistedDashboardState};

/// Key holding the per-breakpoint layout map.
pub const LAYOUTS_KEY: &str = "dashboard-layouts";

/// Key holding the ordered active widget ids.
pub const ACTIVE_WIDGETS_KEY: &str = "dashboard-active-widgets";

/// A client-local durable string store.
pub trait PersistenceProvider {
    /// Reads the value under `key`; `Ok(None)` when nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes `key`; deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Uses `dir` as the backing directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PersistenceProvider for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Atomic write: temp file, fsync, rename over the target.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        let stamp = Local::now().format("%Y%m%d-%H%M%S%.f");
        let temp_path = path.with_file_name(format!("{key}.json.tmp.{stamp}"));
        let io_err = |source| StoreError::Io {
            path: temp_path.clone(),
            source,
        };

        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(value.as_bytes())?;
            file.sync_all()
        });
        if let Err(source) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(source));
        }
        if let Err(source) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Io { path, source });
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

/// In-process store with optional failure injection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

impl MemoryStore {
    /// Empty, unlimited store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any value longer than `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// When `true`, every write and delete fails as unavailable.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Writes a raw value, bypassing quota and availability. For seeding
    /// corrupted or legacy content.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Raw stored value.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PersistenceProvider for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store is read-only".to_string()));
        }
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    size: value.len(),
                    limit,
                });
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store is read-only".to_string()));
        }
        self.values.remove(key);
        Ok(())
    }
}

/// Persistence facade over a [`PersistenceProvider`].
pub struct LayoutStore {
    provider: Box<dyn PersistenceProvider>,
}

impl LayoutStore {
    /// Wraps a provider.
    pub fn new(provider: impl PersistenceProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    /// Loads the stored layout map, or `None` if missing or unreadable.
    pub fn load_layouts(&self) -> Option<LayoutAssignment> {
        let raw = self.read(LAYOUTS_KEY)?;
        let layouts: LayoutAssignment = match serde_json::from_str(&raw) {
            Ok(layouts) => layouts,
            Err(e) => {
                log::warn!("Ignoring stored {LAYOUTS_KEY}: {e}");
                return None;
            }
        };
        let degenerate = layouts.breakpoints().any(|bp| {
            layouts
                .cells(bp)
                .iter()
                .any(|c| c.w == 0 || c.h == 0 || c.widget_id.is_empty())
        });
        if degenerate {
            log::warn!("Ignoring stored {LAYOUTS_KEY}: zero-sized or unnamed cell");
            return None;
        }
        Some(layouts)
    }

    /// Loads the stored active widget ids, or `None` if missing or unreadable.
    pub fn load_active_widgets(&self) -> Option<Vec<String>> {
        let raw = self.read(ACTIVE_WIDGETS_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(ids) => Some(ids),
            Err(e) => {
                log::warn!("Ignoring stored {ACTIVE_WIDGETS_KEY}: {e}");
                None
            }
        }
    }

    /// Loads both keys. Returns `None` only when neither key yields a value;
    /// a key that is missing or corrupt loads as empty.
    pub fn load(&self) -> Option<PersistedDashboardState> {
        let layouts = self.load_layouts();
        let active_widgets = self.load_active_widgets();
        if layouts.is_none() && active_widgets.is_none() {
            return None;
        }
        Some(PersistedDashboardState {
            layouts: layouts.unwrap_or_default(),
            active_widgets: active_widgets.unwrap_or_default(),
        })
    }

    /// Writes both keys, layouts first.
    ///
    /// Both values are encoded before anything is written, so an encoding
    /// failure leaves the store untouched. The two writes are not atomic
    /// together: if the second one fails the store holds the new layouts
    /// next to the previous active set. Loading tolerates that pairing,
    /// since the controller drops cells of inactive widgets and places
    /// active widgets that have no cell.
    pub fn save(&mut self, state: &PersistedDashboardState) -> Result<(), PersistError> {
        let layouts = serde_json::to_string(&state.layouts)?;
        let active = serde_json::to_string(&state.active_widgets)?;
        self.write(LAYOUTS_KEY, &layouts)?;
        self.write(ACTIVE_WIDGETS_KEY, &active)?;
        Ok(())
    }

    /// Deletes both keys, returning the dashboard to first-run state.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        for key in [LAYOUTS_KEY, ACTIVE_WIDGETS_KEY] {
            self.provider
                .remove(key)
                .map_err(|source| PersistError::Write { key, source })?;
        }
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.provider.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read {key}: {e}");
                None
            }
        }
    }

    fn write(&mut self, key: &'static str, value: &str) -> Result<(), PersistError> {
        self.provider
            .set(key, value)
            .map_err(|source| PersistError::Write { key, source })
    }
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore").finish_non_exhaustive()
    }
}

//! Local key-value persistence for remembered API keys
//!
//! One string per [`KeySlot`]. Writes happen on every keystroke while
//! "remember" is on, so the file store rewrites the whole map each time.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Which feature a stored key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySlot {
    Chat,
    Places,
}

impl KeySlot {
    pub const ALL: [KeySlot; 2] = [KeySlot::Chat, KeySlot::Places];

    pub fn key_name(self) -> &'static str {
        match self {
            KeySlot::Chat => "chat.gemini_api_key",
            KeySlot::Places => "places.gemini_api_key",
        }
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Non-persistent store. Used in tests and when the config directory is
/// unavailable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> Error {
    Error::Storage("store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}

/// Flat JSON object on disk, cached in memory.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// `<config dir>/dashdeck/keys.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dashdeck").join("keys.json"))
    }

    /// Open the store, reading existing entries. A missing file is empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| Error::Storage(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(Error::Storage(format!("{}: {e}", path.display()))),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "key store opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let storage = |e: std::io::Error| Error::Storage(format!("{}: {e}", self.path.display()));
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(storage)?;
        }
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Storage(e.to_string()))?;
        fs::write(&self.path, text).map_err(storage)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("dashdeck-keystore-{}-{name}", std::process::id()))
            .join("keys.json")
    }

    #[test]
    fn test_slot_names_are_separate() {
        assert_ne!(KeySlot::Chat.key_name(), KeySlot::Places.key_name());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a"), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_json_store_persists_across_opens() {
        let path = scratch_path("persist");
        let _ = fs::remove_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        store.set(KeySlot::Chat.key_name(), "AIza-chat").unwrap();
        store.set(KeySlot::Places.key_name(), "AIza-places").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(KeySlot::Chat.key_name()).as_deref(),
            Some("AIza-chat")
        );
        reopened.remove(KeySlot::Chat.key_name()).unwrap();
        drop(reopened);

        let again = JsonFileStore::open(&path).unwrap();
        assert_eq!(again.get(KeySlot::Chat.key_name()), None);
        assert_eq!(
            again.get(KeySlot::Places.key_name()).as_deref(),
            Some("AIza-places")
        );
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let path = scratch_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path).unwrap_err(),
            Error::Storage(_)
        ));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}

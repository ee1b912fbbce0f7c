//! Local key-value state persisted as a single JSON object file.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::types::{Location, StoreError};

/// Key under which the last selected location is kept
pub const LOCATION_KEY: &str = "nimbus.location";

/// JSON object file mapping string keys to arbitrary JSON values.
/// A missing or unreadable file reads as empty.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Map<String, Value> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                tracing::warn!("Failed to read state file {:?}: {}", self.path, e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!("State file {:?} is corrupt, ignoring it", self.path);
                Map::new()
            }
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_all().remove(key)
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut map = self.read_all();
        map.insert(key.to_string(), value);
        self.write_all(&map)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.read_all();
        if map.remove(key).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

/// The last selected location, remembered across sessions.
#[derive(Debug, Clone)]
pub struct LocationStore {
    store: LocalStore,
}

impl LocationStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Stored location if present and well formed. Anything else is removed
    /// and reads as absent.
    pub fn load(&self) -> Option<Location> {
        let value = self.store.get(LOCATION_KEY)?;
        match Self::decode(value) {
            Ok(location) => {
                tracing::debug!("Restored location {:?}", location.display_name);
                Some(location)
            }
            Err(e) => {
                tracing::warn!("Discarding stored location: {}", e);
                if let Err(e) = self.store.remove(LOCATION_KEY) {
                    tracing::warn!("Failed to clear stored location: {}", e);
                }
                None
            }
        }
    }

    fn decode(value: Value) -> Result<Location, StoreError> {
        let location: Location =
            serde_json::from_value(value).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        if !location.is_valid() {
            return Err(StoreError::Corrupt(format!(
                "coordinates out of range: {}, {}",
                location.latitude, location.longitude
            )));
        }
        Ok(location)
    }

    pub fn save(&self, location: &Location) -> Result<(), StoreError> {
        self.store.set(LOCATION_KEY, serde_json::to_value(location)?)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(LOCATION_KEY)
    }
}

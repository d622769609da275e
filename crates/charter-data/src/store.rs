//! Per-symbol persistence of annotations and indicator configuration.
//!
//! Storage is a plain key-value contract: each symbol's annotation set and
//! indicator configuration is one JSON value under its own key. Any backend
//! that can get and set strings gets the [`Persistence`] operations for free.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use charter_core::Annotation;
use charter_indicators::IndicatorSet;
use thiserror::Error;

/// Persistence backend failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("no active symbol")]
    NoSymbol,
}

/// String get/set on named keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Load and save operations keyed by symbol.
pub trait Persistence {
    /// Persisted annotations for `symbol`, empty when none exist.
    ///
    /// Malformed entries are dropped with a warning rather than failing the
    /// whole set.
    fn load_annotations(&self, symbol: &str) -> Result<Vec<Annotation>, StoreError>;

    /// Replace the persisted annotation set of `symbol`.
    fn save_annotations(&mut self, symbol: &str, annotations: &[Annotation]) -> Result<(), StoreError>;

    fn load_indicator_config(&self, symbol: &str) -> Result<Option<IndicatorSet>, StoreError>;

    fn save_indicator_config(&mut self, symbol: &str, config: &IndicatorSet) -> Result<(), StoreError>;
}

fn annotations_key(symbol: &str) -> String {
    format!("annotations:{symbol}")
}

fn indicators_key(symbol: &str) -> String {
    format!("indicators:{symbol}")
}

impl<S: KeyValueStore> Persistence for S {
    fn load_annotations(&self, symbol: &str) -> Result<Vec<Annotation>, StoreError> {
        let Some(raw) = self.get(&annotations_key(symbol))? else {
            return Ok(Vec::new());
        };

        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        let mut annotations = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<Annotation>(entry) {
                Ok(annotation) => annotations.push(annotation),
                Err(e) => log::warn!("Dropping malformed annotation for {}: {}", symbol, e),
            }
        }
        Ok(annotations)
    }

    fn save_annotations(&mut self, symbol: &str, annotations: &[Annotation]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(annotations)?;
        self.set(&annotations_key(symbol), raw)
    }

    fn load_indicator_config(&self, symbol: &str) -> Result<Option<IndicatorSet>, StoreError> {
        match self.get(&indicators_key(symbol))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_indicator_config(&mut self, symbol: &str, config: &IndicatorSet) -> Result<(), StoreError> {
        let raw = serde_json::to_string(config)?;
        self.set(&indicators_key(symbol), raw)
    }
}

/// Volatile in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// File name for a key. `:` becomes `_`; every other byte outside
/// `[A-Za-z0-9.-]` is written as `%XX`, so distinct keys never share a file.
fn file_stem(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b':' => name.push('_'),
            b if b.is_ascii_alphanumeric() || b == b'-' || b == b'.' => name.push(char::from(b)),
            b => name.push_str(&format!("%{b:02X}")),
        }
    }
    name
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

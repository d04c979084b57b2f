//! Key-value store wrapper with automatic serialization.

use crate::CacheError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const FILE_EXTENSION: &str = "json";

enum Backend {
    Memory(Mutex<BTreeMap<String, Vec<u8>>>),
    Directory(PathBuf),
}

/// Type-safe cache with JSON serialization for any `Serialize` +
/// `DeserializeOwned` type.
///
/// Clones share the same underlying store.
#[derive(Clone)]
pub struct Cache {
    backend: Arc<Backend>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.backend.as_ref() {
            Backend::Memory(_) => f.write_str("Cache(memory)"),
            Backend::Directory(dir) => write!(f, "Cache({})", dir.display()),
        }
    }
}

impl Cache {
    /// A store that lives as long as the process.
    pub fn in_memory() -> Self {
        Self {
            backend: Arc::new(Backend::Memory(Mutex::new(BTreeMap::new()))),
        }
    }

    /// A store keeping one file per key under `dir`, created if missing.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir(".bazaar/sessions")?;
    /// ```
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .map_err(|e| CacheError::OpenError(format!("{}: {e}", dir.display())))?;
        tracing::debug!(dir = %dir.display(), "opened directory cache");
        Ok(Self {
            backend: Arc::new(Backend::Directory(dir.to_path_buf())),
        })
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a value that must exist.
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> Result<T, CacheError> {
        self.get(key)?
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.set_raw(key, bytes)
    }

    /// Delete a value. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self.backend.as_ref() {
            Backend::Memory(map) => {
                lock(map)?.remove(key);
                Ok(())
            }
            Backend::Directory(dir) => match fs::remove_file(key_path(dir, key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        match self.backend.as_ref() {
            Backend::Memory(map) => Ok(lock(map)?.contains_key(key)),
            Backend::Directory(dir) => Ok(key_path(dir, key).is_file()),
        }
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        match self.backend.as_ref() {
            Backend::Memory(map) => Ok(lock(map)?.keys().cloned().collect()),
            Backend::Directory(dir) => {
                let mut keys = Vec::new();
                for entry in fs::read_dir(dir)? {
                    let path = entry?.path();
                    if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                        continue;
                    }
                    if let Some(key) = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .and_then(decode_key)
                    {
                        keys.push(key);
                    }
                }
                keys.sort();
                Ok(keys)
            }
        }
    }

    /// Keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        Ok(self
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self.backend.as_ref() {
            Backend::Memory(map) => Ok(lock(map)?.get(key).cloned()),
            Backend::Directory(dir) => match fs::read(key_path(dir, key)) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
        }
    }

    fn set_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        match self.backend.as_ref() {
            Backend::Memory(map) => {
                lock(map)?.insert(key.to_string(), bytes);
                Ok(())
            }
            Backend::Directory(dir) => {
                let path = key_path(dir, key);
                let staging = path.with_extension("tmp");
                fs::write(&staging, bytes)?;
                fs::rename(&staging, &path)?;
                Ok(())
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, CacheError> {
    mutex
        .lock()
        .map_err(|_| CacheError::StoreError("memory store lock poisoned".to_string()))
}

// Keys may contain ':' and '/', so file names carry them base64-encoded.
fn key_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.{FILE_EXTENSION}", URL_SAFE_NO_PAD.encode(key)))
}

fn decode_key(stem: &str) -> Option<String> {
    URL_SAFE_NO_PAD
        .decode(stem)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// let session = "sess_abc";
/// assert_eq!(bazaar_cache::cache_key!("store", session), "store:sess_abc");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

//! Shopper sessions on top of the key-value cache.

use crate::{Cache, CacheError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;

/// Maximum attempts for an optimistic update.
const MAX_UPDATE_RETRIES: u32 = 3;

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random session ID: `sess_` plus 18 random bytes, URL-safe base64.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A stored session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    pub id: SessionId,
    pub data: T,
    /// Incremented on every write.
    pub version: u64,
    /// Unix seconds.
    pub created_at: u64,
    /// Unix seconds.
    pub last_accessed: u64,
}

/// Typed session storage.
///
/// # Example
///
/// ```rust
/// use bazaar_cache::{Cache, SessionId, SessionStore};
///
/// let sessions = SessionStore::<Vec<String>>::new(Cache::in_memory());
/// let id = SessionId::generate();
///
/// sessions.update(&id, |recent| recent.push("p-1".to_string())).unwrap();
/// assert_eq!(sessions.get(&id).unwrap(), Some(vec!["p-1".to_string()]));
/// ```
pub struct SessionStore<T> {
    cache: Cache,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> SessionStore<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            _phantom: PhantomData,
        }
    }

    /// Get session data if it exists.
    pub fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.get_versioned(id)?.map(|s| s.data))
    }

    /// Get the full record, including version and timestamps.
    pub fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get(&session_key(id))
    }

    /// Unconditional write.
    pub fn set(&self, id: &SessionId, data: &T) -> Result<(), CacheError> {
        let current = self.get_versioned(id)?;
        self.write(id, data, current.as_ref())
    }

    /// Read-modify-write, retried if another writer bumps the version in between.
    pub fn update<F>(&self, id: &SessionId, mut f: F) -> Result<T, CacheError>
    where
        F: FnMut(&mut T),
    {
        self.try_update(id, T::default, |data| {
            f(data);
            Ok::<_, CacheError>(())
        })
        .map(|(data, ())| data)
    }

    /// Fallible read-modify-write with the same version check as [`update`].
    ///
    /// A missing session starts from `init()`. When `f` fails nothing is
    /// written. `f` may run more than once, each time on freshly read data.
    ///
    /// [`update`]: SessionStore::update
    pub fn try_update<R, E, F>(
        &self,
        id: &SessionId,
        init: impl Fn() -> T,
        mut f: F,
    ) -> Result<(T, R), E>
    where
        F: FnMut(&mut T) -> Result<R, E>,
        E: From<CacheError>,
    {
        for attempt in 1..=MAX_UPDATE_RETRIES {
            let current = self.get_versioned(id)?;
            let expected = current.as_ref().map_or(0, |s| s.version);
            let mut data = match &current {
                Some(session) => session.data.clone(),
                None => init(),
            };

            let result = f(&mut data)?;

            let latest = self.get_versioned(id)?.map_or(0, |s| s.version);
            if latest != expected {
                tracing::debug!(session = %id, attempt, "session changed during update, retrying");
                continue;
            }

            self.write(id, &data, current.as_ref())?;
            return Ok((data, result));
        }

        Err(CacheError::ConcurrentModification(format!("session {id}: max retries exceeded")).into())
    }

    pub fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        self.cache.delete(&session_key(id))
    }

    pub fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.exists(&session_key(id))
    }

    fn write(
        &self,
        id: &SessionId,
        data: &T,
        previous: Option<&SessionData<T>>,
    ) -> Result<(), CacheError> {
        let now = unix_now();
        let record = SessionData {
            id: id.clone(),
            data: data.clone(),
            version: previous.map_or(1, |p| p.version + 1),
            created_at: previous.map_or(now, |p| p.created_at),
            last_accessed: now,
        };
        self.cache.set(&session_key(id), &record)
    }
}

fn session_key(id: &SessionId) -> String {
    crate::cache_key!("session", id)
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Basket {
        items: Vec<String>,
    }

    fn sessions() -> SessionStore<Basket> {
        SessionStore::new(Cache::in_memory())
    }

    #[test]
    fn test_session_id_generate_format() {
        let id = SessionId::generate();
        assert!(id.as_str().starts_with("sess_"));
        // 18 bytes -> 24 base64 chars
        assert_eq!(id.as_str().len(), 29);
        assert_ne!(id, SessionId::generate());
    }

    #[test]
    fn test_session_id_serializes_as_string() {
        let id = SessionId::new("sess_abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""sess_abc""#);
        assert_eq!(id.to_string(), "sess_abc");
    }

    #[test]
    fn test_try_update_failure_writes_nothing() {
        let store = sessions();
        let id = SessionId::new("s1");

        let result: Result<(Basket, ()), CacheError> = store.try_update(&id, Basket::default, |b| {
            b.items.push("a".into());
            Err(CacheError::StoreError("rejected".to_string()))
        });

        assert!(matches!(result, Err(CacheError::StoreError(_))));
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn test_try_update_retries_on_fresh_data() {
        let cache = Cache::in_memory();
        let store = SessionStore::<Basket>::new(cache.clone());
        let rival = SessionStore::<Basket>::new(cache);
        let id = SessionId::new("s1");
        let mut raced = false;

        let (data, seen) = store
            .try_update(&id, Basket::default, |b| {
                if !raced {
                    raced = true;
                    rival.update(&id, |r| r.items.push("theirs".into()))?;
                }
                b.items.push("mine".into());
                Ok::<_, CacheError>(b.items.len())
            })
            .unwrap();

        assert_eq!(data.items, vec!["theirs", "mine"]);
        assert_eq!(seen, 2);
        assert_eq!(store.get_versioned(&id).unwrap().unwrap().version, 2);
    }

    #[test]
    fn test_set_bumps_version_and_keeps_created_at() {
        let store = sessions();
        let id = SessionId::new("s1");

        store.set(&id, &Basket { items: vec!["a".into()] }).unwrap();
        let first = store.get_versioned(&id).unwrap().unwrap();
        store.set(&id, &Basket { items: vec!["b".into()] }).unwrap();
        let second = store.get_versioned(&id).unwrap().unwrap();

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.data.items, vec!["b"]);
    }

    #[test]
    fn test_update_applies_closure() {
        let store = sessions();
        let id = SessionId::new("s1");

        store.update(&id, |b| b.items.push("a".into())).unwrap();
        let data = store.update(&id, |b| b.items.push("b".into())).unwrap();

        assert_eq!(data.items, vec!["a", "b"]);
        assert_eq!(store.get_versioned(&id).unwrap().unwrap().version, 2);
    }

    #[test]
    fn test_update_gives_up_when_always_raced() {
        let cache = Cache::in_memory();
        let store = SessionStore::<Basket>::new(cache.clone());
        let rival = SessionStore::<Basket>::new(cache);
        let id = SessionId::new("s1");

        let result = store.update(&id, |b| {
            b.items.push("mine".into());
            rival.set(&id, &Basket::default()).unwrap();
        });

        assert!(matches!(result, Err(CacheError::ConcurrentModification(_))));
    }

    #[test]
    fn test_delete() {
        let store = sessions();
        let id = SessionId::new("s1");
        store.set(&id, &Basket::default()).unwrap();
        assert!(store.exists(&id).unwrap());
        store.delete(&id).unwrap();
        assert_eq!(store.get(&id).unwrap(), None);
    }
}

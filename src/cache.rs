use axum::body::Bytes;
use dashmap::DashMap;

/// Synthesized audio keyed by the exact input text.
///
/// Voice and speed are not part of the key: a hit for a text returns whatever
/// audio was stored for it first, regardless of the voice or rate asked for.
pub trait AudioCache: Send + Sync {
    fn get(&self, text: &str) -> Option<Bytes>;

    /// Store `audio` for `text`, replacing any previous entry.
    fn set(&self, text: String, audio: Bytes);

    fn remove(&self, text: &str) -> Option<Bytes>;

    fn clear(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local cache with no expiry and no size bound.
///
/// Entries live for the lifetime of the process. Concurrent writers for the
/// same key race and the last one to finish wins.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Bytes>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioCache for MemoryCache {
    fn get(&self, text: &str) -> Option<Bytes> {
        // Bytes clones share the underlying buffer
        self.entries.get(text).map(|entry| entry.value().clone())
    }

    fn set(&self, text: String, audio: Bytes) {
        self.entries.insert(text, audio);
    }

    fn remove(&self, text: &str) -> Option<Bytes> {
        self.entries.remove(text).map(|(_, audio)| audio)
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing() {
        let cache = MemoryCache::new();
        assert!(cache.get("hello").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("hello".into(), Bytes::from_static(&[1, 2, 3]));
        assert_eq!(cache.get("hello").unwrap(), Bytes::from_static(&[1, 2, 3]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = MemoryCache::new();
        cache.set("hello".into(), Bytes::from_static(&[1]));
        cache.set("hello".into(), Bytes::from_static(&[2]));
        assert_eq!(cache.get("hello").unwrap(), Bytes::from_static(&[2]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_key_is_exact_text() {
        let cache = MemoryCache::new();
        cache.set("Hello".into(), Bytes::from_static(&[1]));
        assert!(cache.get("hello").is_none());
        assert!(cache.get("Hello ").is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = MemoryCache::new();
        cache.set("a".into(), Bytes::from_static(&[1]));
        cache.set("b".into(), Bytes::from_static(&[2]));

        assert_eq!(cache.remove("a").unwrap(), Bytes::from_static(&[1]));
        assert!(cache.get("a").is_none());
        assert!(cache.remove("a").is_none());

        cache.clear();
        assert!(cache.is_empty());
    }
}

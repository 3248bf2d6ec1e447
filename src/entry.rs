use std::fmt;

/// One stored pair. The key never changes while the entry is in a map, and
/// its hash is cached so the index can be rebuilt without rehashing.
///
/// An entry's position is the handle of the list node holding it; the map
/// keeps that handle in its index rather than in the entry itself.
#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self { key, value, hash }
    }

    pub(crate) fn pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

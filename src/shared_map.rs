use parking_lot::RwLock;
use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hash},
    sync::Arc,
};

use crate::{Error, OrderedMap};

/// Wrapper for an OrderedMap which is shareable across thread boundaries.
/// The map itself does no locking; every call here takes the one lock around
/// it, so each operation stays all-or-nothing when threads race.
pub struct SharedOrderedMap<K, V, S = RandomState>(
    Arc<RwLock<OrderedMap<K, V, S>>>,
);

impl<K, V, S> SharedOrderedMap<K, V, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    /// Wraps a map into a shared accessor, making it safe to move across
    /// thread boundaries. Enforces an additional constraint of Clone on
    /// values.
    pub fn with_map(map: OrderedMap<K, V, S>) -> Self {
        Self(Arc::from(RwLock::from(map)))
    }

    /// Sets a value and hands back the map for chaining. New keys go to the
    /// back.
    pub fn set(&self, k: K, v: V) -> &Self {
        self.0.write().set(k, v);
        self
    }

    /// Sets a value, returning the one it replaced.
    pub fn insert(&self, k: K, v: V) -> Option<V> {
        self.0.write().insert(k, v)
    }

    /// Get an item from the map. This clones it to minimize the lock time.
    pub fn get<Q>(&self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.0.read().get(k).cloned()
    }

    pub fn get_or<Q>(&self, k: &Q, fallback: V) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.0.read().get_or(k, fallback)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.0.read().contains_key(k)
    }

    /// A copy of the first pair, if there is one.
    pub fn first(&self) -> Option<(K, V)>
    where
        K: Clone,
    {
        self.0.read().first().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// A copy of the last pair, if there is one.
    pub fn last(&self) -> Option<(K, V)>
    where
        K: Clone,
    {
        self.0.read().last().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Remove an item from the map, returning the removed pair if it existed.
    pub fn remove<Q>(&self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.0.write().remove(k)
    }

    pub fn move_to_front<Q>(&self, k: &Q) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        self.0.write().move_to_front(k)
    }

    pub fn move_to_back<Q>(&self, k: &Q) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        self.0.write().move_to_back(k)
    }

    pub fn move_after<Q>(&self, k: &Q, after: &Q) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        self.0.write().move_after(k, after)
    }

    pub fn move_before<Q>(&self, k: &Q, before: &Q) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        self.0.write().move_before(k, before)
    }

    pub fn insert_after<Q>(
        &self,
        k: K,
        v: V,
        after: &Q,
    ) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        self.0.write().insert_after(k, v, after)
    }

    pub fn insert_before<Q>(
        &self,
        k: K,
        v: V,
        before: &Q,
    ) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        self.0.write().insert_before(k, v, before)
    }

    /// A copy of the keys in their current order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.0.read().keys()
    }

    /// Clones the whole map out from under the lock.
    pub fn snapshot(&self) -> OrderedMap<K, V, S>
    where
        K: Clone,
        S: Clone,
    {
        self.0.read().clone()
    }

    /// Clears the map.
    pub fn clear(&self) {
        self.0.write().clear()
    }

    /// The number of entries in the map at present.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}

impl<K, V, S> Clone for SharedOrderedMap<K, V, S> {
    fn clone(&self) -> Self {
        SharedOrderedMap(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::{Error, OrderedMap, SharedOrderedMap};

    #[test]
    fn test_shared_across_threads() {
        let map: SharedOrderedMap<usize, usize> =
            SharedOrderedMap::with_map(OrderedMap::new());
        map.insert(1, 1);

        let thread_map = map.clone();
        let r = thread::spawn(move || thread_map.get(&1)).join();

        assert_eq!(Some(1), r.unwrap());
    }

    #[test]
    fn test_concurrent_writers_keep_one_entry_per_key() {
        let map: SharedOrderedMap<usize, usize> =
            SharedOrderedMap::with_map(OrderedMap::new());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let map = map.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        map.insert(i, t);
                        let _ = map.move_to_front(&i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(50, map.len());
        let mut keys = map.keys();
        keys.sort_unstable();
        assert_eq!((0..50).collect::<Vec<_>>(), keys);
    }

    #[test]
    fn test_reordering_through_the_lock() {
        let map =
            SharedOrderedMap::with_map(OrderedMap::from([("a", 1), ("b", 2)]));

        assert_eq!(Ok(()), map.insert_before("z", 26, &"a"));
        assert_eq!(Ok(()), map.move_to_back(&"z"));
        assert_eq!(Ok(()), map.move_after(&"a", &"b"));
        assert_eq!(Err(Error::KeyNotFound("q")), map.move_before(&"q", &"a"));
        assert_eq!(vec!["b", "a", "z"], map.keys());

        let snapshot = map.snapshot();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(Some(&26), snapshot.get("z"));
    }

    #[test]
    fn test_lookups_through_the_lock() {
        let map: SharedOrderedMap<&str, u32> =
            SharedOrderedMap::with_map(OrderedMap::new());
        assert_eq!(None, map.first());
        assert_eq!(None, map.last());

        map.set("a", 1).set("b", 2).set("c", 3).set("a", 10);

        assert!(map.contains_key("b"));
        assert!(!map.contains_key("z"));
        assert_eq!(10, map.get_or("a", 0));
        assert_eq!(0, map.get_or("z", 0));
        assert_eq!(Some(("a", 10)), map.first());
        assert_eq!(Some(("c", 3)), map.last());
        assert_eq!(vec!["a", "b", "c"], map.keys());
    }
}

use hashbrown::{hash_table, HashTable};
use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash},
    mem,
};

use crate::entry::Entry;
use crate::error::Error;
use crate::iter::{IntoIter, Iter, Values};
use crate::linked_list::{LinkedList, NodeHandle};

/// A hash map which remembers the order its keys went in, and lets that
/// order be rearranged by key.
///
/// Lookups go through a hash index of node handles; iteration walks a linked
/// list of entries. Every mutation updates both together, and operations
/// that can fail check all of their preconditions before touching either,
/// so a rejected call leaves the map exactly as it was.
///
/// This maintains _ordering_, not sorting. Keys are never compared for
/// anything but equality.
pub struct OrderedMap<K, V, S = RandomState> {
    index: HashTable<NodeHandle>,
    order: LinkedList<Entry<K, V>>,
    hash_builder: S,
}

impl<K, V> OrderedMap<K, V, RandomState> {
    /// Makes a new, empty OrderedMap.
    pub fn new() -> Self {
        OrderedMap::with_capacity(0)
    }

    /// Make a new OrderedMap with room for `capacity` entries before it has
    /// to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        OrderedMap::with_capacity_and_hasher(0, hash_builder)
    }

    /// Makes a new OrderedMap with a specified capacity and hasher.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        OrderedMap {
            index: HashTable::with_capacity(capacity),
            order: LinkedList::with_capacity(capacity),
            hash_builder,
        }
    }

    /// The number of entries in the map.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Throws away every entry, leaving an empty map which keeps its
    /// allocations.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    /// The first pair in the map, if there is one.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.order.front().map(|node| self.order[node].pair())
    }

    /// The last pair in the map, if there is one.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.order.back().map(|node| self.order[node].pair())
    }

    /// Walks the map from front to back. The map can't be modified while the
    /// iterator is alive.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.order)
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// A copy of the keys, in order. Later changes to the map don't show up
    /// in the returned Vec.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<K, V, S> OrderedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Stores `value` at `key`. A new key goes to the back of the map; an
    /// existing key keeps its place and only has its value replaced. Returns
    /// the map so calls can be chained.
    pub fn set(&mut self, key: K, value: V) -> &mut Self {
        self.insert(key, value);
        self
    }

    /// Same as [`set`](Self::set), but hands back the value that was
    /// replaced, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        let Self { index, order, .. } = self;

        let previous = match index.entry(
            hash,
            |node| order[*node].key == key,
            |node| order[*node].hash,
        ) {
            hash_table::Entry::Occupied(occupied) => {
                let node = *occupied.get();
                Some(mem::replace(&mut order[node].value, value))
            }
            hash_table::Entry::Vacant(vacant) => {
                let node = order.push_back(Entry::new(key, value, hash));
                vacant.insert(node);
                None
            }
        };

        #[cfg(test)]
        self.continuity_test();

        previous
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(key).map(|node| &self.order[node].value)
    }

    /// Get a mutable reference to a value. Changing the value doesn't move
    /// the entry.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find(key)?;
        Some(&mut self.order[node].value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(key).map(|node| self.order[node].pair())
    }

    /// Gets a copy of the value at `key`, or `fallback` if there isn't one.
    /// There's no telling apart a missing key from a stored value equal to
    /// `fallback`; use [`get`](Self::get) for that.
    pub fn get_or<Q>(&self, key: &Q, fallback: V) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.get(key).cloned().unwrap_or(fallback)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(key).is_some()
    }

    /// Takes the entry at `key` out of the map, returning the removed pair.
    /// A missing key leaves the map untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.is_empty() {
            return None;
        }

        let hash = self.hash_builder.hash_one(key);
        let Self { index, order, .. } = self;

        let found = index.find_entry(hash, |node| {
            order[*node].key.borrow() == key
        });
        let node = match found {
            Ok(occupied) => occupied.remove().0,
            Err(_) => return None,
        };
        let removed = order.remove(node).into_pair();

        #[cfg(test)]
        self.continuity_test();

        Some(removed)
    }

    /// Moves the entry at `key` to the front of the map. Moving the first
    /// entry is a no-op.
    pub fn move_to_front<Q>(&mut self, key: &Q) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        let node = self.find_or_missing(key)?;
        self.order.move_to_front(node);

        #[cfg(test)]
        self.continuity_test();

        Ok(())
    }

    /// Moves the entry at `key` to the back of the map. Moving the last entry
    /// is a no-op.
    pub fn move_to_back<Q>(&mut self, key: &Q) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        let node = self.find_or_missing(key)?;
        self.order.move_to_back(node);

        #[cfg(test)]
        self.continuity_test();

        Ok(())
    }

    /// Moves the entry at `key` so that it directly follows the entry at
    /// `after`. Both keys have to be present; `key` is looked up first, so it
    /// is the one reported when neither is.
    pub fn move_after<Q>(
        &mut self,
        key: &Q,
        after: &Q,
    ) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        let node = self.find_or_missing(key)?;
        let mark = self.find_or_missing(after)?;
        log::trace!("Move {:?} after {:?}", node, mark);
        self.order.move_after(node, mark);

        #[cfg(test)]
        self.continuity_test();

        Ok(())
    }

    /// Moves the entry at `key` so that it directly precedes the entry at
    /// `before`. Both keys have to be present; `key` is looked up first, so it
    /// is the one reported when neither is.
    pub fn move_before<Q>(
        &mut self,
        key: &Q,
        before: &Q,
    ) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        let node = self.find_or_missing(key)?;
        let mark = self.find_or_missing(before)?;
        log::trace!("Move {:?} before {:?}", node, mark);
        self.order.move_before(node, mark);

        #[cfg(test)]
        self.continuity_test();

        Ok(())
    }

    /// Adds a new entry directly after the entry at `after`.
    ///
    /// This refuses to touch a key that's already present and reports the
    /// value stored there instead. To overwrite and reposition, call
    /// [`set`](Self::set) followed by [`move_after`](Self::move_after).
    pub fn insert_after<Q>(
        &mut self,
        key: K,
        value: V,
        after: &Q,
    ) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
        V: Clone,
    {
        let mark = self.vacant_beside(key, value, after)?;
        let node = self.push_back_unique(mark.key, mark.value);
        log::trace!("Insert {:?} after {:?}", node, mark.node);
        self.order.move_after(node, mark.node);

        #[cfg(test)]
        self.continuity_test();

        Ok(())
    }

    /// Adds a new entry directly before the entry at `before`.
    ///
    /// This refuses to touch a key that's already present and reports the
    /// value stored there instead. To overwrite and reposition, call
    /// [`set`](Self::set) followed by [`move_before`](Self::move_before).
    pub fn insert_before<Q>(
        &mut self,
        key: K,
        value: V,
        before: &Q,
    ) -> Result<(), Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
        V: Clone,
    {
        let mark = self.vacant_beside(key, value, before)?;
        let node = self.push_back_unique(mark.key, mark.value);
        log::trace!("Insert {:?} before {:?}", node, mark.node);
        self.order.move_before(node, mark.node);

        #[cfg(test)]
        self.continuity_test();

        Ok(())
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeHandle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.is_empty() {
            return None;
        }

        let hash = self.hash_builder.hash_one(key);
        let order = &self.order;
        self.index
            .find(hash, |node| order[*node].key.borrow() == key)
            .copied()
    }

    fn find_or_missing<Q>(&self, key: &Q) -> Result<NodeHandle, Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        self.find(key).ok_or_else(|| {
            log::debug!(
                "Rejected operation on missing key with hash {:#x}",
                self.hash_builder.hash_one(key)
            );
            Error::KeyNotFound(key.to_owned())
        })
    }

    /// Checks everything an insert beside `mark` needs before anything is
    /// modified: the mark has to exist and the new key must not.
    fn vacant_beside<Q>(
        &self,
        key: K,
        value: V,
        mark: &Q,
    ) -> Result<Beside<K, V>, Error<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
        V: Clone,
    {
        let mark = self.find_or_missing(mark)?;

        // a key equal to the mark always lands here, since the mark exists
        if let Some(existing) = self.find(key.borrow()) {
            log::debug!("Rejected insert of a key already at {:?}", existing);
            return Err(Error::DuplicateKeyValue {
                key,
                value: self.order[existing].value.clone(),
            });
        }

        Ok(Beside {
            key,
            value,
            node: mark,
        })
    }

    /// Appends an entry for a key known to be absent.
    fn push_back_unique(&mut self, key: K, value: V) -> NodeHandle {
        let hash = self.hash_builder.hash_one(&key);
        let node = self.order.push_back(Entry::new(key, value, hash));
        let order = &self.order;
        self.index.insert_unique(hash, node, |node| order[*node].hash);
        node
    }

    #[cfg(test)]
    fn continuity_test(&self) {
        assert_eq!(self.index.len(), self.order.len());

        // walk the list and make sure every entry is indexed under its own
        // key, which also rules out duplicate keys
        let mut count = 0;
        let mut cursor = self.order.front();
        while let Some(node) = cursor {
            count = count + 1;
            assert!(count <= self.len());

            let entry = &self.order[node];
            assert_eq!(self.hash_builder.hash_one(&entry.key), entry.hash);
            assert_eq!(Some(node), self.find(&entry.key));

            cursor = self.order.next(node);
        }

        assert_eq!(self.len(), count);
        count = 0;

        // and in reverse, to check the back links
        let mut cursor = self.order.back();
        while let Some(node) = cursor {
            count = count + 1;
            assert!(count <= self.len());
            cursor = self.order.prev(node);
        }

        assert_eq!(self.len(), count);
    }
}

/// A validated insert, waiting to be placed next to `node`.
struct Beside<K, V> {
    key: K,
    value: V,
    node: NodeHandle,
}

impl<K: fmt::Debug, V: fmt::Debug, S> OrderedMap<K, V, S> {
    /// Diffs the literal renderings of two maps, `self` being the expected
    /// side. Returns None when they render the same.
    pub fn diff<S2>(&self, other: &OrderedMap<K, V, S2>) -> Option<String> {
        crate::diff::diff(&format!("{:#?}", self), &format!("{:#?}", other))
    }
}

impl<K, V, S> Clone for OrderedMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        OrderedMap {
            index: self.index.clone(),
            order: self.order.clone(),
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<K, V, S: Default> Default for OrderedMap<K, V, S> {
    fn default() -> Self {
        OrderedMap::with_hasher(Default::default())
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for OrderedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for OrderedMap<K, V, RandomState>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, V); N]) -> Self {
        let mut map = OrderedMap::with_capacity(N);
        map.extend(pairs);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for OrderedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.order)
    }
}

/// `{first=1st, second=2nd}`
impl<K: fmt::Display, V: fmt::Display, S> fmt::Display for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        let mut cursor = self.order.front();
        while let Some(node) = cursor {
            write!(f, "{}", self.order[node])?;
            cursor = self.order.next(node);
            if cursor.is_some() {
                f.write_str(", ")?;
            }
        }
        f.write_str("}")
    }
}

/// Renders the calls that would rebuild this map, one `.set` per line under
/// `{:#?}`.
impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OrderedMap::new()")?;
        for (key, value) in self {
            if f.alternate() {
                write!(f, "\n    .set({:?}, {:?})", key, value)?;
            } else {
                write!(f, ".set({:?}, {:?})", key, value)?;
            }
        }
        Ok(())
    }
}

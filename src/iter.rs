use std::iter::FusedIterator;

use crate::entry::Entry;
use crate::linked_list::{LinkedList, NodeHandle};

/// Borrowing iterator over the pairs of an [`OrderedMap`](crate::OrderedMap),
/// front to back. It walks the live list, so it also works from the back
/// and the two ends meet in the middle.
pub struct Iter<'a, K, V> {
    list: &'a LinkedList<Entry<K, V>>,
    front: Option<NodeHandle>,
    back: Option<NodeHandle>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(list: &'a LinkedList<Entry<K, V>>) -> Self {
        Iter {
            list,
            front: list.front(),
            back: list.back(),
            remaining: list.len(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let list = self.list;
        let node = self.front?;
        self.front = list.next(node);
        self.remaining -= 1;

        list.get(node).map(Entry::pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let list = self.list;
        let node = self.back?;
        self.back = list.prev(node);
        self.remaining -= 1;

        list.get(node).map(Entry::pair)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

/// Iterator over the values of an [`OrderedMap`](crate::OrderedMap), in order.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Values(iter)
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Owning iterator which takes the pairs out of a map in order.
pub struct IntoIter<K, V> {
    list: LinkedList<Entry<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(list: LinkedList<Entry<K, V>>) -> Self {
        IntoIter { list }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front().map(Entry::into_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back().map(Entry::into_pair)
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

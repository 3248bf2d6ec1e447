//! A linked list that flattens all its nodes onto a Vec for storage, gaining
//! data locality and O(1) random access by handle. Nodes are chained into a
//! ring, so the back of the list is always one hop behind the head.

use std::ops::{Index, IndexMut};

/// Alias for the index of a node in the linked list's storage vec.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NodeHandle(usize);

/// A node that lives in a linked list.
#[derive(Clone)]
struct Node<T> {
    /// The value being stored. `None` while the slot sits on the freelist.
    value: Option<T>,

    /// The index of the node previous to this one.
    prev: NodeHandle,

    /// The index of the next node in the list.
    next: NodeHandle,
}

/// A single contiguous Vec of nodes, which are addressed by their position in
/// the Vec. It freelists elements that have been removed and reuses those
/// slots on the next push, so handles stay small and stable for as long as
/// their node lives.
///
/// Leaking a NodeHandle outside the linked list is important for OrderedMap,
/// which keeps a handle per key so it can unlink or reposition any entry
/// without walking the chain.
pub(crate) struct LinkedList<T> {
    /// The nodes in the list.
    store: Vec<Node<T>>,

    /// Entries in the list which aren't in use anymore. These will be reused.
    free: Vec<NodeHandle>,

    /// The first node in the list.
    head: Option<NodeHandle>,
}

impl<T> LinkedList<T> {
    /// Creates a new linked list with a specific capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            store: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
        }
    }

    /// The length of this linked list.
    pub(crate) fn len(&self) -> usize {
        self.store.len() - self.free.len()
    }

    pub(crate) fn front(&self) -> Option<NodeHandle> {
        self.head
    }

    pub(crate) fn back(&self) -> Option<NodeHandle> {
        self.head.map(|head| self.store[head.0].prev)
    }

    /// The node following `node`, or None if `node` is the back.
    pub(crate) fn next(&self, node: NodeHandle) -> Option<NodeHandle> {
        let next = self.store[node.0].next;
        if Some(next) == self.head {
            None
        } else {
            Some(next)
        }
    }

    /// The node preceding `node`, or None if `node` is the front.
    pub(crate) fn prev(&self, node: NodeHandle) -> Option<NodeHandle> {
        if Some(node) == self.head {
            None
        } else {
            Some(self.store[node.0].prev)
        }
    }

    /// Gets an element from the list.
    pub(crate) fn get(&self, node: NodeHandle) -> Option<&T> {
        self.store.get(node.0).and_then(|node| node.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, node: NodeHandle) -> Option<&mut T> {
        self.store.get_mut(node.0).and_then(|node| node.value.as_mut())
    }

    /// Pushes t onto the back of the list and returns a handle to the node.
    pub(crate) fn push_back(&mut self, t: T) -> NodeHandle {
        let n = Node {
            value: Some(t),
            prev: NodeHandle(0),
            next: NodeHandle(0),
        };

        // use the first available location in the storage vec, or infer what
        // the next location will be on push.
        let idx = self
            .free
            .pop()
            .unwrap_or_else(|| NodeHandle(self.store.len()));

        if self.store.len() <= idx.0 {
            self.store.push(n);
        } else {
            self.store[idx.0] = n;
        }

        match self.head {
            // the back of a ring is just before the head
            Some(head) => self.link_before(idx, head),
            None => {
                self.store[idx.0].prev = idx;
                self.store[idx.0].next = idx;
                self.head = Some(idx);
            }
        }

        idx
    }

    /// Pops the front node off the list if it exists.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        Some(self.remove(head))
    }

    /// Pops the back node off the list if it exists.
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        let back = self.back()?;
        Some(self.remove(back))
    }

    /// Remove an arbitrary node from the list, handing back its value. The
    /// handle is stale as soon as this returns.
    pub(crate) fn remove(&mut self, node: NodeHandle) -> T {
        self.unlink(node);
        self.free.push(node);

        match self.store[node.0].value.take() {
            Some(value) => value,
            None => panic!("removed a node that was already free: {:?}", node),
        }
    }

    pub(crate) fn move_to_front(&mut self, node: NodeHandle) {
        match self.head {
            Some(head) if head != node => {
                self.unlink(node);
                self.link_before(node, head);
                self.head = Some(node);
            }
            _ => {}
        }
    }

    pub(crate) fn move_to_back(&mut self, node: NodeHandle) {
        if self.back() == Some(node) {
            return;
        }

        self.unlink(node);
        if let Some(head) = self.head {
            self.link_before(node, head);
        }
    }

    /// Moves `node` so it immediately follows `mark`. Moving a node relative
    /// to itself does nothing.
    pub(crate) fn move_after(&mut self, node: NodeHandle, mark: NodeHandle) {
        if node == mark {
            return;
        }

        self.unlink(node);
        let after_mark = self.store[mark.0].next;
        self.link_before(node, after_mark);
    }

    /// Moves `node` so it immediately precedes `mark`. Moving a node relative
    /// to itself does nothing.
    pub(crate) fn move_before(&mut self, node: NodeHandle, mark: NodeHandle) {
        if node == mark {
            return;
        }

        self.unlink(node);
        self.link_before(node, mark);
        if self.head == Some(mark) {
            self.head = Some(node);
        }
    }

    /// Clears this linked list. Does not free the underlying buffers.
    pub(crate) fn clear(&mut self) {
        self.store.clear();
        self.free.clear();
        self.head = None;
    }

    /// Takes `node` out of the chain, leaving its own links dangling. The
    /// head moves along if it pointed at `node`.
    fn unlink(&mut self, node: NodeHandle) {
        let prev = self.store[node.0].prev;
        let next = self.store[node.0].next;

        if next == node {
            // it was the only node in the ring
            self.head = None;
            return;
        }

        if self.head == Some(node) {
            self.head = Some(next);
        }

        self.store[prev.0].next = next;
        self.store[next.0].prev = prev;
    }

    /// Splices a detached `node` into the chain just before `mark`. Never
    /// touches the head.
    fn link_before(&mut self, node: NodeHandle, mark: NodeHandle) {
        let prev = self.store[mark.0].prev;

        self.store[node.0].prev = prev;
        self.store[node.0].next = mark;
        self.store[prev.0].next = node;
        self.store[mark.0].prev = node;
    }
}

impl<T> Index<NodeHandle> for LinkedList<T> {
    type Output = T;

    fn index(&self, node: NodeHandle) -> &T {
        match self.get(node) {
            Some(value) => value,
            None => panic!("stale node handle {:?}", node),
        }
    }
}

impl<T> IndexMut<NodeHandle> for LinkedList<T> {
    fn index_mut(&mut self, node: NodeHandle) -> &mut T {
        match self.get_mut(node) {
            Some(value) => value,
            None => panic!("stale node handle {:?}", node),
        }
    }
}

/// Clones node for node, so handles into the original are valid in the copy.
impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            free: self.free.clone(),
            head: self.head,
        }
    }
}

//! Doubly linked list stored in a slot arena
//!
//! Nodes are addressed by slot index instead of pointers, so relinking never
//! fights the borrow checker and the list stays the sole owner of its nodes.
//! Callers hold [`NodeId`] handles; a handle carries the generation of its
//! slot and stops resolving once the node is removed.

use std::iter::FusedIterator;

/// Stable handle to a node in a [`List`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u64,
}

impl NodeId {
    /// Slot index of the node inside the arena
    pub fn index(self) -> usize {
        self.index
    }
}

/// Node in the doubly linked list
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Arena slot; the generation is bumped every time the slot is freed
struct Slot<T> {
    generation: u64,
    node: Option<Node<T>>,
}

/// Ordered list with O(1) push, remove and move-to-front
pub struct List<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> List<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of nodes in the list
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the front node (most recently pushed to the front)
    pub fn front(&self) -> Option<NodeId> {
        self.head.map(|idx| self.id_at(idx))
    }

    /// Handle of the back node
    pub fn back(&self) -> Option<NodeId> {
        self.tail.map(|idx| self.id_at(idx))
    }

    /// Value stored in the front node
    pub fn front_value(&self) -> Option<&T> {
        self.head.and_then(|idx| self.node(idx)).map(|node| &node.value)
    }

    /// Value stored in the back node
    pub fn back_value(&self) -> Option<&T> {
        self.tail.and_then(|idx| self.node(idx)).map(|node| &node.value)
    }

    /// Push a value to the front of the list
    ///
    /// # Returns
    /// * `NodeId` - Handle for later `remove` / `move_to_front` calls
    pub fn push_front(&mut self, value: T) -> NodeId {
        let idx = self.alloc(value);
        self.link_front(idx);
        self.len += 1;
        self.id_at(idx)
    }

    /// Push a value to the back of the list
    pub fn push_back(&mut self, value: T) -> NodeId {
        let idx = self.alloc(value);
        self.link_back(idx);
        self.len += 1;
        self.id_at(idx)
    }

    /// Remove a node from wherever it sits in the list
    ///
    /// A handle whose node is already gone leaves the list untouched and
    /// returns `None`.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let idx = self.resolve(id)?;
        self.unlink(idx);
        self.len -= 1;
        self.release(idx)
    }

    /// Remove and return the back value
    pub fn pop_back(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.unlink(idx);
        self.len -= 1;
        self.release(idx)
    }

    /// Relink a node as the new front
    ///
    /// # Returns
    /// * `bool` - `false` if the node is already the front or the handle is stale
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        let Some(idx) = self.resolve(id) else {
            return false;
        };
        if self.head == Some(idx) {
            return false;
        }

        self.unlink(idx);
        self.link_front(idx);
        true
    }

    /// Check whether a handle still points at a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.resolve(id).is_some()
    }

    /// Get the value behind a handle
    pub fn get(&self, id: NodeId) -> Option<&T> {
        let idx = self.resolve(id)?;
        self.node(idx).map(|node| &node.value)
    }

    /// Get the value behind a handle mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let idx = self.resolve(id)?;
        self.slots[idx].node.as_mut().map(|node| &mut node.value)
    }

    /// Iterate values from front to back
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len,
        }
    }

    /// Drop every node; all outstanding handles become stale
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (idx, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(idx);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Assert the structural invariants of the list
    ///
    /// Head and tail are empty iff the list is empty. A forward walk must
    /// visit exactly `len` nodes with matching back links.
    #[doc(hidden)]
    pub fn check_invariants(&self) {
        assert_eq!(self.head.is_none(), self.len == 0, "head presence vs len");
        assert_eq!(self.tail.is_none(), self.len == 0, "tail presence vs len");

        let mut visited = 0;
        let mut prev = None;
        let mut current = self.head;
        while let Some(idx) = current {
            let node = self.node(idx).expect("linked slot must be occupied");
            assert_eq!(node.prev, prev, "broken back link at slot {}", idx);
            visited += 1;
            assert!(visited <= self.len, "cycle detected");
            prev = Some(idx);
            current = node.next;
        }
        assert_eq!(prev, self.tail, "walk did not end at tail");
        assert_eq!(visited, self.len, "walk length vs len");

        let occupied = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        assert_eq!(occupied, self.len, "occupied slots vs len");
    }

    fn id_at(&self, idx: usize) -> NodeId {
        NodeId {
            index: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn resolve(&self, id: NodeId) -> Option<usize> {
        let slot = self.slots.get(id.index)?;
        if slot.generation == id.generation && slot.node.is_some() {
            Some(id.index)
        } else {
            None
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<T>> {
        self.slots.get(idx).and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(idx).and_then(|slot| slot.node.as_mut())
    }

    fn alloc(&mut self, value: T) -> usize {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx].node = Some(node);
            idx
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            self.slots.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Option<T> {
        let slot = &mut self.slots[idx];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        Some(node.value)
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head_idx) => {
                if let Some(head) = self.node_mut(head_idx) {
                    head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(idx) {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = self.node_mut(tail_idx) {
                    tail.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.node_mut(idx) {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.node_mut(prev_idx) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.node_mut(next_idx) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for List<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Front-to-back iterator over list values
pub struct Iter<'a, T> {
    list: &'a List<T>,
    current: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.current?)?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

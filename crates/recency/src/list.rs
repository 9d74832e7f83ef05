//! Recency list: a doubly-linked list laid out in a slot arena
//!
//! Nodes link to each other by slot index instead of by reference, so
//! relinking and removal are index bookkeeping. Vacated slots go on a free
//! list and are reused by the next push; each slot carries a generation that
//! is bumped on removal, so a handle to a removed node never resolves to the
//! node that later reuses its slot.
//!
//! Order runs from `head` (least recently used) to `tail` (most recently used).

/// Handle to a node in a [`RecencyList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    index: usize,
    generation: u32,
}

/// Node in the recency list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

struct Slot<K, V> {
    generation: u32,
    node: Option<Node<K, V>>,
}

/// Doubly-linked list of key/value nodes ordered by recency
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list with room for `capacity` nodes
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of linked nodes
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Least recently used node
    pub(crate) fn front(&self) -> Option<NodeId> {
        self.head.map(|idx| self.id_at(idx))
    }

    /// Key stored at `id`
    pub(crate) fn key(&self, id: NodeId) -> Option<&K> {
        self.node(id).map(|node| &node.key)
    }

    /// Value stored at `id`
    pub(crate) fn value(&self, id: NodeId) -> Option<&V> {
        self.node(id).map(|node| &node.value)
    }

    /// Mutable value stored at `id`
    pub(crate) fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .map(|node| &mut node.value)
    }

    /// Key and value stored at `id`
    pub(crate) fn entry(&self, id: NodeId) -> Option<(&K, &V)> {
        self.node(id).map(|node| (&node.key, &node.value))
    }

    /// Append a node as the most recently used
    pub(crate) fn push_back(&mut self, key: K, value: V) -> NodeId {
        let idx = self.alloc_slot();
        self.slots[idx].node = Some(Node {
            key,
            value,
            prev: None,
            next: None,
        });
        self.link_back(idx);
        self.len += 1;
        self.id_at(idx)
    }

    /// Mark `id` as the most recently used
    pub(crate) fn move_to_back(&mut self, id: NodeId) {
        if self.tail == Some(id.index) || self.node(id).is_none() {
            return;
        }

        self.unlink(id.index);
        self.link_back(id.index);
    }

    /// Unlink `id` and hand back its entry
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<(K, V)> {
        self.node(id)?;

        self.unlink(id.index);
        let slot = &mut self.slots[id.index];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.len -= 1;

        Some((node.key, node.value))
    }

    /// Remove the least recently used node
    pub(crate) fn pop_front(&mut self) -> Option<(K, V)> {
        let id = self.front()?;
        self.remove(id)
    }

    /// Drop every node
    ///
    /// Slots are kept so their generations keep outdating old handles.
    pub(crate) fn clear(&mut self) {
        self.free_list.clear();
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(idx);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate entries from least to most recently used
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    /// Walk the chain and panic on any broken link. Runs in O(n).
    pub(crate) fn debug_validate_invariants(&self) {
        assert_eq!(
            self.head.is_none(),
            self.tail.is_none(),
            "head and tail must be empty together"
        );
        assert_eq!(self.head.is_none(), self.len == 0, "empty list must have no head");

        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.slots[idx]
                .node
                .as_ref()
                .expect("linked slot must be occupied");
            assert_eq!(node.prev, prev, "prev link of slot {} is stale", idx);
            count += 1;
            assert!(count <= self.len, "cycle in recency list");
            prev = Some(idx);
            cursor = node.next;
        }
        assert_eq!(prev, self.tail, "forward walk must end at tail");
        assert_eq!(count, self.len, "forward walk length mismatch");

        let occupied = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        assert_eq!(occupied, self.len, "occupied slots must equal len");
        for &idx in &self.free_list {
            assert!(self.slots[idx].node.is_none(), "free slot {} is occupied", idx);
        }
    }

    fn id_at(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.slots[index].generation,
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;

        if let Some(node) = &mut self.slots[idx].node {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = &mut self.slots[tail_idx].node {
                    tail.next = Some(idx);
                }
            }
            None => {
                self.head = Some(idx);
            }
        }

        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.slots[idx].node {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.slots[prev_idx].node {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.slots[next_idx].node {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    fn alloc_slot(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                node: None,
            });
            idx
        }
    }
}

/// Iterator over list entries, least recently used first
pub(crate) struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let node = list.slots.get(self.next?)?.node.as_ref()?;
        self.next = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

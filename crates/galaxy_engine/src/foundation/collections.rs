//! Specialized collection types

pub use slotmap::{new_key_type, Key, SlotMap};

/// Deferred removal list for generational arenas
///
/// Systems mark keys while iterating and the owner applies every removal in
/// one compaction afterwards, so the sequence being walked never shifts under
/// the walker.
#[derive(Debug, Clone)]
pub struct RemovalQueue<K: Key> {
    pending: Vec<K>,
}

impl<K: Key> Default for RemovalQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> RemovalQueue<K> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Mark a key for removal; marking twice is harmless
    pub fn mark(&mut self, key: K) {
        if !self.pending.contains(&key) {
            self.pending.push(key);
        }
    }

    /// Whether a key is already marked
    pub fn contains(&self, key: K) -> bool {
        self.pending.contains(&key)
    }

    /// Number of marked keys
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is marked
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove every marked key from the arena and from each ordering list
    ///
    /// Returns the removed values in marking order.
    pub fn apply<V>(&mut self, arena: &mut SlotMap<K, V>, orders: &mut [&mut Vec<K>]) -> Vec<V> {
        if self.pending.is_empty() {
            return Vec::new();
        }

        for order in orders.iter_mut() {
            order.retain(|key| !self.pending.contains(key));
        }

        self.pending
            .drain(..)
            .filter_map(|key| arena.remove(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    new_key_type! {
        struct TestKey;
    }

    #[test]
    fn test_apply_removes_from_arena_and_orders() {
        let mut arena: SlotMap<TestKey, &str> = SlotMap::with_key();
        let a = arena.insert("a");
        let b = arena.insert("b");
        let c = arena.insert("c");
        let mut order = vec![a, b, c];
        let mut other = vec![c];

        let mut queue = RemovalQueue::new();
        queue.mark(b);
        queue.mark(c);
        queue.mark(b);
        assert_eq!(queue.len(), 2);

        let removed = queue.apply(&mut arena, &mut [&mut order, &mut other]);
        assert_eq!(removed, vec!["b", "c"]);
        assert_eq!(order, vec![a]);
        assert!(other.is_empty());
        assert_eq!(arena.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_stale_key_is_not_reused() {
        let mut arena: SlotMap<TestKey, u32> = SlotMap::with_key();
        let first = arena.insert(1);
        let mut queue = RemovalQueue::new();
        queue.mark(first);
        queue.apply(&mut arena, &mut []);

        let second = arena.insert(2);
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second), Some(&2));
    }
}

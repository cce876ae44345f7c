use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// An associative container that iterates in first-insertion order.
///
/// Entries live in a contiguous vector of slots and a hash index maps each key
/// to its slot. Removing an entry leaves a tombstone behind; once tombstones
/// make up more than half of the slots the vector is compacted and the index
/// rebuilt, so lookups, inserts and removals stay O(1) on average.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<(K, V)>>,
    tombstones: usize,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            tombstones: 0,
        }
    }
}

impl<K: Hash + Eq + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`.
    ///
    /// A new key is appended after every existing entry. An existing key has
    /// its value replaced in place and keeps its position.
    pub fn put(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&slot) => {
                if let Some((_, existing)) = self.slots[slot].as_mut() {
                    *existing = value;
                }
            }
            None => {
                self.index.insert(key.clone(), self.slots.len());
                self.slots.push(Some((key, value)));
            }
        }
    }

    /// Returns the value for `key`, appending `default()` first if the key is absent.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, default: F) -> &mut V {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.slots.len();
                self.index.insert(key.clone(), slot);
                self.slots.push(None);
                slot
            }
        };
        let (_, value) = self.slots[slot].get_or_insert_with(|| (key, default()));
        value
    }

    /// Removes `key` and reports whether it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(slot) = self.index.remove(key) else {
            return false;
        };
        self.slots[slot] = None;
        self.tombstones += 1;
        if self.tombstones * 2 > self.slots.len() {
            self.compact();
        }
        true
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.index.get(key)?;
        self.slots[slot].as_ref().map(|(_, value)| value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.index.get(key)?;
        self.slots[slot].as_mut().map(|(_, value)| value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(key, value)| (key, value)))
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        self.tombstones = 0;
        for (position, slot) in self.slots.iter().enumerate() {
            if let Some((key, _)) = slot
                && let Some(entry) = self.index.get_mut(key)
            {
                *entry = position;
            }
        }
    }
}

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::hint::black_box;

/// Number of buckets a freshly created table starts with. Shrinking never
/// takes the bucket count below this floor.
pub const INITIAL_CAPACITY: usize = 4;

#[inline(always)]
fn grow_at(capacity: usize) -> usize {
    // Smallest entry count at which `n >= capacity * 0.8` holds.
    ((capacity as u128 * 4).div_ceil(5)) as usize
}

#[inline(always)]
fn shrink_at(capacity: usize) -> usize {
    // Largest entry count for which `n <= capacity * 0.2` holds.
    capacity / 5
}

#[inline(always)]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    // Mask to the low 31 bits before reduction so the index is taken from a
    // non-negative 32-bit quantity regardless of the hasher's output width.
    (hash & 0x7fff_ffff) as usize % capacity
}

/// Number of busy-work iterations charged against a table holding `len`
/// entries: `ceil(log2(len))`, or zero for tables of at most one entry.
#[inline(always)]
fn injected_iterations(len: usize) -> u32 {
    if len <= 1 {
        0
    } else {
        (len - 1).ilog2() + 1
    }
}

#[inline(always)]
fn spin(iterations: u32) {
    let mut counter = 0u64;
    for i in 0..iterations {
        if i % 2 == 0 {
            counter += 1;
        }
    }
    black_box(counter);
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Vec<Entry<K, V>>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Vec::new);
    buckets
}

/// Selects whether an operation charges the synthetic surcharge.
///
/// Every table operation takes an explicit `Cost` so the same program can
/// drive tables in both configurations, which is what the comparative
/// benchmark does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cost {
    /// No busy-work. Operations retain their natural amortized Θ(1) cost.
    #[default]
    Constant,
    /// Before doing any real work, the operation spins for `ceil(log2(n))`
    /// counted iterations, where `n` is the number of entries at the moment
    /// of the call. The table's amortized per-operation cost becomes
    /// Θ(log n), which is ω(1).
    LogN,
}

struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Clone for Entry<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Entry {
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}

/// A separate-chaining hash table with load-factor driven resizing and
/// optional per-operation cost injection.
///
/// Entries are owned key-value pairs stored in per-bucket chains. The table
/// starts at [`INITIAL_CAPACITY`] buckets, doubles when an insert finds the
/// load factor at or above 0.8, and halves when a removal leaves it at or
/// below 0.2 (never below the initial capacity). The two thresholds are far
/// enough apart that an insert/remove pair cannot thrash between sizes.
///
/// Chain order carries no meaning and iteration order is unspecified.
///
/// # Cost injection
///
/// Every operation takes a [`Cost`] argument. Under [`Cost::LogN`] the
/// operation first performs `ceil(log2(n))` dummy iterations. A resize
/// re-inserts every surviving entry through the same instrumented path with
/// the same `Cost`, so under `Cost::LogN` a resize deliberately costs
/// `O(n log n)` rather than `O(n)`. That compounding is part of the
/// instrumented configuration's story, not an accident.
///
/// # Example
///
/// ```rust
/// use chain_hash::Cost;
/// use chain_hash::HashTable;
///
/// let mut table = HashTable::new();
/// table.insert("a", "1", Cost::Constant);
/// table.insert("b", "2", Cost::Constant);
///
/// assert_eq!(table.get(&"a", Cost::Constant), Some(&"1"));
/// assert_eq!(table.get(&"c", Cost::Constant), None);
/// ```
#[derive(Clone)]
pub struct HashTable<K, V, S = crate::DefaultHashBuilder> {
    buckets: Vec<Vec<Entry<K, V>>>,
    len: usize,
    hash_builder: S,
    #[cfg(test)]
    cost_charges: core::cell::Cell<u64>,
}

impl<K, V, S> Debug for HashTable<K, V, S>
where
    K: Debug + Hash + Eq,
    V: Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty table with the given hasher builder and the initial
    /// bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashTable;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let table: HashTable<i32, String, _> = HashTable::with_hasher(SimpleHasher);
    /// assert!(table.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            buckets: empty_buckets(INITIAL_CAPACITY),
            len: 0,
            hash_builder,
            #[cfg(test)]
            cost_charges: core::cell::Cell::new(0),
        }
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Removes all entries and resets the table to its initial bucket count.
    pub fn clear(&mut self) {
        self.buckets = empty_buckets(INITIAL_CAPACITY);
        self.len = 0;
    }

    /// Inserts a key-value pair.
    ///
    /// If the key is already present its value is overwritten in place and
    /// the old value is returned; the entry count does not change. Otherwise
    /// the pair is appended to its chain and `None` is returned.
    ///
    /// The surcharge (if requested) is charged before anything else, and the
    /// grow check runs before the new entry is counted: a table whose load
    /// factor already sits at or above 0.8 doubles its bucket count first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::Cost;
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// assert_eq!(table.insert(37, "a", Cost::Constant), None);
    /// assert_eq!(table.insert(37, "b", Cost::Constant), Some("a"));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V, cost: Cost) -> Option<V> {
        self.charge(cost);

        if self.len >= grow_at(self.buckets.len()) {
            self.resize(self.buckets.len() * 2, cost);
        }

        let index = self.bucket_for(&key);
        let chain = &mut self.buckets[index];
        if let Some(entry) = chain.iter_mut().find(|entry| entry.key == key) {
            return Some(core::mem::replace(&mut entry.value, value));
        }

        chain.push(Entry { key, value });
        self.len += 1;
        None
    }

    /// Inserts when a value is given, removes the key when it is not.
    ///
    /// This preserves the call shape of an upsert-or-delete API in which a
    /// missing value redefines the call as a deletion. The deletion branch
    /// delegates to [`remove`](Self::remove) after the surcharge has already
    /// been paid, so under [`Cost::LogN`] it is charged twice — once here and
    /// once inside `remove`. Callers who only ever insert should prefer
    /// [`insert`](Self::insert), which makes the value mandatory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::Cost;
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert_or_remove("k", Some("v"), Cost::Constant);
    /// assert_eq!(table.get(&"k", Cost::Constant), Some(&"v"));
    ///
    /// // A missing value is a deletion, silently ignored for absent keys.
    /// table.insert_or_remove("k", None, Cost::Constant);
    /// table.insert_or_remove("ghost", None, Cost::Constant);
    /// assert!(table.is_empty());
    /// ```
    pub fn insert_or_remove(&mut self, key: K, value: Option<V>, cost: Cost) -> Option<V> {
        match value {
            Some(value) => self.insert(key, value, cost),
            None => {
                self.charge(cost);
                self.remove(&key, cost)
            }
        }
    }

    /// Removes a key, returning its value if it was present.
    ///
    /// A missing key is a silent no-op, not an error. Whether or not
    /// anything was removed, the shrink check runs afterwards: a table above
    /// the initial bucket count whose load factor is at or below 0.2 halves
    /// its bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::Cost;
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(1, "a", Cost::Constant);
    /// assert_eq!(table.remove(&1, Cost::Constant), Some("a"));
    /// assert_eq!(table.remove(&1, Cost::Constant), None);
    /// ```
    pub fn remove(&mut self, key: &K, cost: Cost) -> Option<V> {
        self.charge(cost);

        let index = self.bucket_for(key);
        let chain = &mut self.buckets[index];
        let removed = chain
            .iter()
            .position(|entry| &entry.key == key)
            .map(|at| chain.swap_remove(at).value);
        if removed.is_some() {
            self.len -= 1;
        }

        let capacity = self.buckets.len();
        if capacity > INITIAL_CAPACITY && self.len <= shrink_at(capacity) {
            self.resize(capacity / 2, cost);
        }

        removed
    }

    /// Returns a reference to the value stored for `key`, if any.
    ///
    /// Lookups never mutate the table and never trigger a resize; absence is
    /// `None`, not an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::Cost;
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(1, "a", Cost::Constant);
    /// assert_eq!(table.get(&1, Cost::Constant), Some(&"a"));
    /// assert_eq!(table.get(&2, Cost::Constant), None);
    /// ```
    pub fn get(&self, key: &K, cost: Cost) -> Option<&V> {
        self.charge(cost);

        let index = self.bucket_for(key);
        self.buckets[index]
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| &entry.value)
    }

    /// Returns `true` if the table contains the given key.
    ///
    /// No surcharge is applied.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key, Cost::Constant).is_some()
    }

    /// Returns an iterator over the table's entries in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: [].iter(),
        }
    }

    /// Returns an iterator over every key currently stored, in bucket order,
    /// with no duplicates. No surcharge is applied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::Cost;
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(1, "a", Cost::Constant);
    /// table.insert(2, "b", Cost::Constant);
    ///
    /// let mut keys: Vec<_> = table.keys().copied().collect();
    /// keys.sort();
    /// assert_eq!(keys, vec![1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    #[inline(always)]
    fn bucket_for(&self, key: &K) -> usize {
        bucket_index(self.hash_builder.hash_one(key), self.buckets.len())
    }

    #[inline(always)]
    fn charge(&self, cost: Cost) {
        if cost == Cost::Constant {
            return;
        }

        #[cfg(test)]
        self.cost_charges.set(self.cost_charges.get() + 1);

        spin(injected_iterations(self.len));
    }

    /// Rebuilds the bucket array at `new_capacity` and re-inserts every
    /// surviving entry through the instrumented insert path with the same
    /// `cost` flag as the operation that triggered the resize. Under
    /// [`Cost::LogN`] each re-insert charges against the partially rebuilt
    /// table's entry count.
    fn resize(&mut self, new_capacity: usize, cost: Cost) {
        let old_buckets = core::mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        self.len = 0;
        for chain in old_buckets {
            for Entry { key, value } in chain {
                self.insert(key, value, cost);
            }
        }
    }

    /// Total number of surcharge invocations so far, counting the ones
    /// issued for entries re-inserted during resizes.
    #[cfg(test)]
    fn cost_charges(&self) -> u64 {
        self.cost_charges.get()
    }
}

impl<K, V> HashTable<K, V, crate::DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Creates an empty table using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::hash_table::INITIAL_CAPACITY;
    ///
    /// let table: HashTable<i32, String> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), INITIAL_CAPACITY);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(crate::DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// An iterator over the key-value pairs of a [`HashTable`], in bucket order.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Vec<Entry<K, V>>>,
    chain: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.next() {
                return Some((&entry.key, &entry.value));
            }
            self.chain = self.buckets.next()?.iter();
        }
    }
}

/// An iterator over the keys of a [`HashTable`], in bucket order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

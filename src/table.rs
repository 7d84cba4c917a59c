use std::{iter::FusedIterator, mem, process, slice};

use tracing::{debug, error, trace, warn};

use crate::{TableConfig, TableError, prime::next_prime, probe::ProbeSequence};

/// A live key-value pair. The entry owns both buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// The key bytes, unique among live entries
    key: Box<[u8]>,
    /// The value bytes
    value: Box<[u8]>,
}

/// A position in the slot array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Slot {
    /// Never used since the array was allocated; ends every probe
    #[default]
    Empty,
    /// Holds a live entry
    Occupied(Entry),
    /// Held an entry that was deleted; probing continues past it and inserts may reuse it
    Tombstone,
}

/// Where a probe for a key ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key lives at this index
    Occupied(usize),
    /// The key is absent and would be stored at this index
    Vacant(usize),
    /// The key is absent and every slot holds a live entry
    Full,
}

/// Outcome of walking a probe sequence.
#[derive(Debug, Clone, Copy)]
struct Lookup {
    /// Where the walk stopped
    probe: Probe,
    /// Number of slots examined
    probes: usize,
}

/// Walks the probe sequence of `key` over `slots`.
///
/// Stops at the matching entry or at the first empty slot. When the key is absent, the
/// returned insertion point is the first tombstone on the path if there was one, so a table
/// that is dense with tombstones still has room for new keys.
fn find(slots: &[Slot], key: &[u8]) -> Lookup {
    let mut first_tombstone = None;
    let mut probes: usize = 0;

    for index in ProbeSequence::new(key, slots.len()) {
        let Some(slot) = slots.get(index) else { break };
        probes = probes.saturating_add(1);

        match slot {
            Slot::Empty => {
                let index = first_tombstone.unwrap_or(index);
                return Lookup { probe: Probe::Vacant(index), probes };
            }
            Slot::Tombstone => {
                if first_tombstone.is_none() {
                    first_tombstone = Some(index);
                }
            }
            Slot::Occupied(entry) if *entry.key == *key => {
                return Lookup { probe: Probe::Occupied(index), probes };
            }
            Slot::Occupied(_) => {}
        }
    }

    let probe = first_tombstone.map_or(Probe::Full, Probe::Vacant);
    Lookup { probe, probes }
}

/// Number of slots for a requested base capacity.
fn slot_count(base_capacity: usize) -> Result<usize, TableError> {
    next_prime(base_capacity.max(1)).ok_or(TableError::CapacityOverflow(base_capacity))
}

/// Allocates `size` empty slots, reporting allocation failure instead of aborting.
fn try_allocate(size: usize) -> Result<Box<[Slot]>, TableError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(size)?;
    slots.resize_with(size, Slot::default);
    Ok(slots.into_boxed_slice())
}

/// Allocation failure in the infallible API is not recoverable.
#[cold]
fn fatal(err: &TableError) -> ! {
    error!(%err, "hash table allocation failed");
    process::abort()
}

/// An open-addressing hash table from byte strings to byte strings.
///
/// Collisions are resolved with double hashing over a prime number of slots, so the probe
/// sequence of every key visits the whole table. Deleted entries leave tombstones behind that
/// later inserts reuse; tombstones are dropped whenever the table is resized.
///
/// The table grows to `next_prime(base_capacity * 2)` slots once the load factor exceeds the
/// grow threshold, and shrinks to `next_prime(base_capacity / 2)` slots once it falls below
/// the shrink threshold, never going below the base capacity it was created with.
/// See [`TableConfig`] for the defaults.
///
/// Allocation failure aborts the process. Use [`Table::try_with_config`],
/// [`Table::try_insert`] and [`Table::try_resize`] to handle it instead.
///
/// Note: This implementation is not thread-safe. Mutation needs `&mut Table`; wrap the table
/// in a lock to share it.
///
/// ```rust
/// use dhtable::Table;
///
/// let mut table = Table::with_capacity(8);
/// assert_eq!(table.capacity(), 11);
///
/// table.insert("cat", "1");
/// assert_eq!(table.search("cat"), Some(&b"1"[..]));
///
/// table.delete("cat");
/// assert_eq!(table.search("cat"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    /// The slot array; its length is always prime
    slots: Box<[Slot]>,
    /// Number of occupied slots
    count: usize,
    /// Base capacity the current slot array was derived from
    base_capacity: usize,
    /// Sizing policy; its base capacity is the shrink floor
    config: TableConfig,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for Table
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Table
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl Table {
    /// Creates an empty table with the default configuration (53 slots).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TableConfig::new())
    }

    /// Creates an empty table with `next_prime(capacity)` slots.
    ///
    /// The table never shrinks below this size. A capacity of zero is treated as one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(TableConfig::new().with_base_capacity(capacity))
    }

    /// Creates an empty table with the given configuration.
    #[must_use]
    pub fn with_config(config: TableConfig) -> Self {
        Self::try_with_config(config).unwrap_or_else(|err| fatal(&err))
    }

    /// Creates an empty table with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot array cannot be allocated.
    pub fn try_with_config(config: TableConfig) -> Result<Self, TableError> {
        let base_capacity = config.base_capacity();
        let slots = try_allocate(slot_count(base_capacity)?)?;
        Ok(Self { slots, count: 0, base_capacity, config })
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// The table may grow as a result.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Vec<u8>>
    where
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        self.try_insert(key, value).unwrap_or_else(|err| fatal(&err))
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the table had to grow and the larger slot array could not be
    /// allocated. The table is unchanged in that case.
    pub fn try_insert<K, V>(&mut self, key: K, value: V) -> Result<Option<Vec<u8>>, TableError>
    where
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        let key = key.into().into_boxed_slice();
        let value = value.into().into_boxed_slice();

        loop {
            let index = match find(&self.slots, &key).probe {
                Probe::Occupied(index) => {
                    let old = self
                        .entry_mut(index)
                        .map(|entry| mem::replace(&mut entry.value, value));
                    return Ok(old.map(Vec::from));
                }
                Probe::Vacant(index)
                    if !self.config.should_grow(self.count.saturating_add(1), self.slots.len()) =>
                {
                    index
                }
                // Grow before placing so that a failed allocation leaves the table untouched.
                Probe::Vacant(_) | Probe::Full => {
                    self.try_grow()?;
                    continue;
                }
            };

            if let Some(slot) = self.slots.get_mut(index) {
                if *slot == Slot::Tombstone {
                    trace!(index, "reusing tombstone");
                }
                *slot = Slot::Occupied(Entry { key, value });
                self.count = self.count.saturating_add(1);
            }
            return Ok(None);
        }
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn search<Q>(&self, key: &Q) -> Option<&[u8]>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        match find(&self.slots, key.as_ref()).probe {
            Probe::Occupied(index) => match self.slots.get(index) {
                Some(Slot::Occupied(entry)) => Some(&*entry.value),
                _ => None,
            },
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Returns a mutable view of the value stored for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut [u8]>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        match find(&self.slots, key.as_ref()).probe {
            Probe::Occupied(index) => self.entry_mut(index).map(|entry| &mut *entry.value),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Returns true if the table holds `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        matches!(find(&self.slots, key.as_ref()).probe, Probe::Occupied(_))
    }

    /// Removes `key`, returning its value. Deleting an absent key does nothing.
    ///
    /// The table may shrink as a result.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<Vec<u8>>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let Probe::Occupied(index) = find(&self.slots, key.as_ref()).probe else {
            return None;
        };
        let slot = self.slots.get_mut(index)?;
        let Slot::Occupied(entry) = mem::replace(slot, Slot::Tombstone) else {
            return None;
        };
        self.count = self.count.saturating_sub(1);

        self.shrink_if_sparse();
        Some(entry.value.into_vec())
    }

    /// Rebuilds the table with `next_prime(base_capacity)` slots, dropping all tombstones.
    ///
    /// The base capacity is raised if needed so that every live entry fits.
    pub fn resize(&mut self, base_capacity: usize) {
        let base_capacity = base_capacity.max(self.count);
        self.try_resize(base_capacity).unwrap_or_else(|err| fatal(&err));
    }

    /// Rebuilds the table with `next_prime(base_capacity)` slots, dropping all tombstones.
    ///
    /// # Errors
    ///
    /// Returns an error if the new slot array would be smaller than the number of live
    /// entries or cannot be allocated. The table is unchanged in that case.
    pub fn try_resize(&mut self, base_capacity: usize) -> Result<(), TableError> {
        let base_capacity = base_capacity.max(1);
        let size = slot_count(base_capacity)?;
        if size < self.count {
            return Err(TableError::CapacityTooSmall { requested: size, len: self.count });
        }

        let mut slots = try_allocate(size)?;
        let old = mem::replace(&mut self.slots, Box::default());
        let old_size = old.len();

        for slot in old.into_vec() {
            let Slot::Occupied(entry) = slot else { continue };
            if let Probe::Vacant(index) = find(&slots, &entry.key).probe {
                if let Some(target) = slots.get_mut(index) {
                    *target = Slot::Occupied(entry);
                }
            }
        }

        self.slots = slots;
        self.base_capacity = base_capacity;
        debug!(from = old_size, to = size, len = self.count, "resized table");
        Ok(())
    }

    /// Grows to the next doubling of the base capacity that yields more slots.
    fn try_grow(&mut self) -> Result<(), TableError> {
        let size = self.slots.len();
        let mut base_capacity = self.base_capacity;
        loop {
            base_capacity = base_capacity
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow(base_capacity))?;
            if slot_count(base_capacity)? > size {
                return self.try_resize(base_capacity);
            }
        }
    }

    /// Halves the base capacity when the load factor drops below the shrink threshold.
    fn shrink_if_sparse(&mut self) {
        let floor = self.config.base_capacity();
        if self.base_capacity <= floor || !self.config.should_shrink(self.count, self.slots.len())
        {
            return;
        }

        let base_capacity = (self.base_capacity / 2).max(floor);
        if let Err(err) = self.try_resize(base_capacity) {
            warn!(%err, "keeping sparse table, shrink failed");
        }
    }

    /// The entry at `index`, if that slot is occupied.
    fn entry_mut(&mut self, index: usize) -> Option<&mut Entry> {
        match self.slots.get_mut(index) {
            Some(Slot::Occupied(entry)) => Some(entry),
            _ => None,
        }
    }

    /// Number of slots a lookup of `key` examines before it finds the key or gives up.
    #[must_use]
    pub fn probe_len<Q>(&self, key: &Q) -> usize
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        find(&self.slots, key.as_ref()).probes
    }

    /// Returns the number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots, which is always prime
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the base capacity the slot count was derived from
    #[must_use]
    pub fn base_capacity(&self) -> usize {
        self.base_capacity
    }

    /// Returns the configuration the table was created with
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the current load factor of the table
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.slots.len() as f64
    }

    /// Removes every entry, keeping the current slot count.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.count = 0;
    }

    /// Returns an iterator over the entries, in no particular order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { slots: self.slots.iter(), remaining: self.count }
    }

    /// Releases every entry and the slot array.
    pub fn destroy(self) {
        trace!(len = self.count, size = self.slots.len(), "destroying table");
        drop(self);
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`Table`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// Slots not yet visited
    slots: slice::Iter<'a, Slot>,
    /// Entries not yet yielded
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().find_map(|slot| match slot {
            Slot::Occupied(entry) => Some(entry),
            Slot::Empty | Slot::Tombstone => None,
        })?;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&*entry.key, &*entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

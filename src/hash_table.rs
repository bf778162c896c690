//! The open-addressing table shared by [`HashMap`](crate::HashMap) and
//! [`HashSet`](crate::HashSet).
//!
//! [`HashTable<V>`] stores bare values and is driven by a caller supplied
//! digest and equality predicate, so it can back any keyed container.

use alloc::alloc::handle_alloc_error;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::config::Config;
use crate::error::TryReserveError;
use crate::probe::ProbeSeq;
use crate::resize;
use crate::resize::ResizeState;

/// One storage cell.
///
/// The digest is cached next to the value: probing compares digests before
/// running the equality predicate, and rehashing never calls back into user
/// hashing code.
#[derive(Clone)]
enum Slot<V> {
    Empty,
    Occupied { hash: u64, value: V },
    Tombstone,
}

/// Result of [`HashTable::find_insertion_point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertionPoint {
    /// A matching value already lives at this index.
    Occupied(usize),
    /// No match; a new value belongs at this index (a reused tombstone or
    /// the first empty slot).
    Vacant(usize),
}

/// Whether memory allocation errors should return an error or abort.
#[derive(Copy, Clone)]
enum Fallibility {
    Fallible,
    Infallible,
}

impl Fallibility {
    fn capacity_overflow(self) -> TryReserveError {
        match self {
            Fallibility::Fallible => TryReserveError::CapacityOverflow,
            Fallibility::Infallible => panic!("hash table capacity overflow"),
        }
    }

    fn alloc_err(self, layout: Layout) -> TryReserveError {
        match self {
            Fallibility::Fallible => TryReserveError::AllocError { layout },
            Fallibility::Infallible => handle_alloc_error(layout),
        }
    }
}

fn allocate_slots<V>(
    slots: usize,
    fallibility: Fallibility,
) -> Result<Vec<Slot<V>>, TryReserveError> {
    let layout =
        Layout::array::<Slot<V>>(slots).map_err(|_| fallibility.capacity_overflow())?;

    let mut storage = Vec::new();
    storage
        .try_reserve_exact(slots)
        .map_err(|_| fallibility.alloc_err(layout))?;
    storage.resize_with(slots, || Slot::Empty);

    Ok(storage)
}

fn infallible<T>(result: Result<T, TryReserveError>) -> T {
    match result {
        Ok(value) => value,
        Err(_) => unreachable!("infallible allocation returned an error"),
    }
}

/// Debug statistics for hash table analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of values currently in the table
    pub populated: usize,
    /// Number of tombstoned slots
    pub tombstones: usize,
    /// Total number of slots allocated
    pub slots: usize,
    /// Maximum population before the table grows
    pub capacity: usize,
    /// Load factor (populated / slots)
    pub load_factor: f64,
    /// Tombstone ratio (tombstones / slots)
    pub tombstone_ratio: f64,
    /// Longest probe distance of any stored value
    pub max_probe_length: usize,
    /// Mean probe distance over stored values
    pub mean_probe_length: f64,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
    /// Bytes held by empty and tombstoned slots
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load factor, grows above {})",
            self.populated,
            self.slots,
            self.load_factor * 100.0,
            self.capacity
        );
        println!(
            "Tombstones: {} ({:.2}% of slots)",
            self.tombstones,
            self.tombstone_ratio * 100.0
        );
        println!(
            "Probe length: max {}, mean {:.3}",
            self.max_probe_length, self.mean_probe_length
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// Probe-length histogram: `counts()[d]` is the number of values found `d`
/// steps after their home slot.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Per-distance counts. Empty for an empty table.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Longest recorded probe distance, `None` for an empty table.
    pub fn max_probe_length(&self) -> Option<usize> {
        self.counts.len().checked_sub(1)
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!(
            "probe histogram ({} entries):",
            self.counts.iter().sum::<usize>()
        );

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            match units % 8 {
                1 => bar.push('▏'),
                2 => bar.push('▎'),
                3 => bar.push('▍'),
                4 => bar.push('▌'),
                5 => bar.push('▋'),
                6 => bar.push('▊'),
                7 => bar.push('▉'),
                _ => {}
            }
            bar
        };

        for (distance, &count) in self.counts.iter().enumerate() {
            println!("{:>3} | {} ({})", distance, make_bar(count), count);
        }
    }
}

/// An open-addressing hash table with tombstone deletion.
///
/// `HashTable<V>` stores values of type `V` in a power-of-two array of
/// slots. Each slot is empty, occupied by a value and its digest, or a
/// tombstone left behind by a removal. Like the tables it backs, it does not
/// know how to hash or compare values: every operation takes the digest and
/// an equality predicate from the caller.
///
/// ## Growth and compaction
///
/// - An insert that pushes the population above the grow threshold (75% of
///   slots by default) rebuilds the table at double the size.
/// - A removal that pushes the tombstone count above the compact threshold
///   (25% of slots by default) rebuilds the table at the same size.
/// - Both rebuilds drop every tombstone and finish before the triggering call
///   returns. The table never shrinks.
///
/// See [`Config`] for the knobs.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use slot_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     slot_hash::hash_table::Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     slot_hash::hash_table::Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).unwrap().name, "Alice");
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Slot<V>>,
    populated: usize,
    tombstones: usize,
    config: Config,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .slots
                    .chunks(16)
                    .map(|row| {
                        row.iter()
                            .map(|slot| match slot {
                                Slot::Empty => "..".to_string(),
                                Slot::Tombstone => "xx".to_string(),
                                Slot::Occupied { hash, .. } => format!("{:02x}", hash >> 56),
                            })
                            .collect::<Vec<String>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the default [`Config`] and the minimum
    /// number of slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u32> = HashTable::new();
    /// assert_eq!(table.num_slots(), 8);
    /// assert_eq!(table.capacity(), 6);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a table that can hold at least `capacity` values without
    /// growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// assert!(table.num_slots().is_power_of_two());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_config(capacity, Config::new())
    }

    /// Creates a table that can hold at least `capacity` values without
    /// growing, tuned by `config`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::Config;
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let config = Config::new().with_min_capacity(64);
    /// let table: HashTable<u8> = HashTable::with_capacity_and_config(0, config);
    /// assert_eq!(table.num_slots(), 64);
    /// ```
    pub fn with_capacity_and_config(capacity: usize, config: Config) -> Self {
        let slots = resize::slots_for(&config, capacity)
            .ok_or_else(|| Fallibility::Infallible.capacity_overflow());
        let slots = infallible(slots);

        Self {
            slots: infallible(allocate_slots(slots, Fallibility::Infallible)),
            populated: 0,
            tombstones: 0,
            config,
        }
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline(always)]
    fn probe_seq(&self, hash: u64) -> ProbeSeq {
        ProbeSeq::new(hash, self.mask(), self.config.probe_strategy())
    }

    /// Returns the configuration this table was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of values in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert_eq!(table.len(), 0);
    ///
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns how many values the table holds before the next insert grows
    /// it.
    ///
    /// This is the grow threshold applied to [`num_slots`](Self::num_slots),
    /// not the slot count itself.
    pub fn capacity(&self) -> usize {
        resize::max_occupied(&self.config, self.slots.len())
    }

    /// Returns the number of allocated slots. Always a power of two, never
    /// below the configured minimum.
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Walks the probe sequence for `hash` and returns the index of the
    /// matching value and its distance from the home slot.
    #[inline]
    fn probe_find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<(usize, usize)> {
        for (distance, index) in self.probe_seq(hash).enumerate() {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied { hash: stored, value } if *stored == hash && eq(value) => {
                    return Some((index, distance));
                }
                _ => {}
            }
        }
        None
    }

    /// Index of the slot holding the value matching `eq`, if any.
    ///
    /// Stops at the first empty slot; tombstones are stepped over.
    #[inline]
    pub(crate) fn find_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        self.probe_find(hash, eq).map(|(index, _)| index)
    }

    /// Locates either the slot holding the value matching `eq`, or the slot
    /// a new value with digest `hash` should be written to.
    ///
    /// The whole chain up to the first empty slot is checked for a match
    /// before a tombstone is offered for reuse, so an upsert can never create
    /// a duplicate further along the chain.
    pub(crate) fn find_insertion_point(
        &self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
    ) -> InsertionPoint {
        let mut first_tombstone = None;

        for index in self.probe_seq(hash) {
            match &self.slots[index] {
                Slot::Empty => {
                    return InsertionPoint::Vacant(first_tombstone.unwrap_or(index));
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied { hash: stored, value } => {
                    if *stored == hash && eq(value) {
                        return InsertionPoint::Occupied(index);
                    }
                }
            }
        }

        match first_tombstone {
            Some(index) => InsertionPoint::Vacant(index),
            None => unreachable!(
                "no free slot among {} slots ({} populated)",
                self.slots.len(),
                self.populated
            ),
        }
    }

    /// Returns a reference to the value matching `eq`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.find(42, |&n| n == 42), Some(&42));
    /// assert_eq!(table.find(7, |&n| n == 7), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.find_index(hash, eq)?;
        match &self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => unreachable!("find_index returned an unoccupied slot"),
        }
    }

    /// Returns a mutable reference to the value matching `eq`.
    ///
    /// The value must not be changed in a way that alters its digest or
    /// equality.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_index(hash, eq)?;
        Some(self.value_mut(index))
    }

    #[inline]
    fn value_mut(&mut self, index: usize) -> &mut V {
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("slot {index} is not occupied"),
        }
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use slot_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// let hash = hash_str("hello");
    ///
    /// match table.entry(hash, |s: &String| s == "hello") {
    ///     slot_hash::hash_table::Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     slot_hash::hash_table::Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    ///
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.find_insertion_point(hash, eq) {
            InsertionPoint::Occupied(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            InsertionPoint::Vacant(index) => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
            }),
        }
    }

    /// Removes and returns the value matching `eq`.
    ///
    /// The slot becomes a tombstone. If that takes the tombstone count over
    /// the compact threshold, the table is rebuilt before this returns.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let index = self.find_index(hash, eq)?;
        Some(self.remove_at(index))
    }

    fn remove_at(&mut self, index: usize) -> V {
        let slot = core::mem::replace(&mut self.slots[index], Slot::Tombstone);
        let Slot::Occupied { value, .. } = slot else {
            unreachable!("slot {index} is not occupied");
        };

        self.populated -= 1;
        self.tombstones += 1;
        self.after_remove();

        value
    }

    /// Applies the resize decision for a just-completed insert at `index`
    /// and returns where that value lives afterwards.
    fn after_insert(&mut self, index: usize) -> usize {
        let slots = self.slots.len();
        match resize::after_insert(&self.config, self.populated, self.tombstones, slots) {
            ResizeState::Stable => index,
            ResizeState::GrowPending => {
                let target = resize::grow_target(&self.config, self.populated, slots)
                    .ok_or_else(|| Fallibility::Infallible.capacity_overflow());
                let target = infallible(target);

                let relocated = self.rehash(target, Some(index), Fallibility::Infallible);
                match infallible(relocated) {
                    Some(index) => index,
                    None => unreachable!("inserted value lost during grow"),
                }
            }
            ResizeState::CompactPending => {
                let relocated = self.rehash(slots, Some(index), Fallibility::Infallible);
                match infallible(relocated) {
                    Some(index) => index,
                    None => unreachable!("inserted value lost during compaction"),
                }
            }
        }
    }

    fn after_remove(&mut self) {
        debug_assert!(self.populated + self.tombstones <= self.slots.len());

        if resize::after_remove(&self.config, self.tombstones, self.slots.len())
            == ResizeState::CompactPending
        {
            if self.populated == 0 {
                self.reset_slots();
            } else {
                let slots = self.slots.len();
                infallible(self.rehash(slots, None, Fallibility::Infallible));
            }
        }
    }

    /// Rebuilds the table with `slots` slots, moving every value across and
    /// discarding tombstones.
    ///
    /// If `tracked` names an occupied slot of the old table, returns that
    /// value's index in the new one.
    #[cold]
    fn rehash(
        &mut self,
        slots: usize,
        tracked: Option<usize>,
        fallibility: Fallibility,
    ) -> Result<Option<usize>, TryReserveError> {
        debug_assert!(slots.is_power_of_two());
        debug_assert!(slots >= self.populated);

        let new_slots = allocate_slots(slots, fallibility)?;
        let old_slots = core::mem::replace(&mut self.slots, new_slots);
        self.tombstones = 0;

        let mut relocated = None;
        for (old_index, slot) in old_slots.into_iter().enumerate() {
            if let Slot::Occupied { hash, value } = slot {
                let index = self.first_empty(hash);
                self.slots[index] = Slot::Occupied { hash, value };
                if tracked == Some(old_index) {
                    relocated = Some(index);
                }
            }
        }

        Ok(relocated)
    }

    /// First empty slot on the probe sequence of `hash`. Only valid on a
    /// table without tombstones, which is the state during a rehash.
    fn first_empty(&self, hash: u64) -> usize {
        for index in self.probe_seq(hash) {
            if let Slot::Empty = self.slots[index] {
                return index;
            }
        }
        unreachable!("rehash target has no empty slot")
    }

    fn reset_slots(&mut self) {
        self.slots.fill_with(|| Slot::Empty);
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Removes all values from the table.
    ///
    /// The slot count is kept, and tombstones are cleared along with the
    /// values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(100);
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    /// let slots = table.num_slots();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.num_slots(), slots);
    /// ```
    pub fn clear(&mut self) {
        self.reset_slots();
    }

    /// Reserves capacity for at least `additional` more values.
    ///
    /// Does nothing if the table can already hold `len() + additional`
    /// values without growing.
    ///
    /// # Panics
    ///
    /// Panics if the new slot count overflows `usize`. Aborts through
    /// [`handle_alloc_error`] if the allocation fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<i32> = HashTable::new();
    /// table.reserve(50);
    /// assert!(table.capacity() >= 50);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        infallible(self.reserve_inner(additional, Fallibility::Infallible));
    }

    /// Tries to reserve capacity for at least `additional` more values,
    /// returning an error instead of panicking or aborting.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::TryReserveError;
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<i32> = HashTable::new();
    /// assert!(table.try_reserve(10).is_ok());
    /// assert_eq!(
    ///     table.try_reserve(usize::MAX),
    ///     Err(TryReserveError::CapacityOverflow)
    /// );
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.reserve_inner(additional, Fallibility::Fallible)
    }

    fn reserve_inner(
        &mut self,
        additional: usize,
        fallibility: Fallibility,
    ) -> Result<(), TryReserveError> {
        let required = self
            .populated
            .checked_add(additional)
            .ok_or_else(|| fallibility.capacity_overflow())?;
        if required <= self.capacity() {
            return Ok(());
        }

        let slots = resize::slots_for(&self.config, required)
            .ok_or_else(|| fallibility.capacity_overflow())?;
        self.rehash(slots, None, fallibility)?;
        Ok(())
    }

    /// Keeps only the values for which `f` returns `true`.
    ///
    /// Removed slots become tombstones; the compact check runs once at the
    /// end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for n in 0..6u64 {
    ///     table.entry(n, |&v: &u64| v == n).or_insert(n);
    /// }
    ///
    /// table.retain(|n| *n % 2 == 0);
    /// assert_eq!(table.len(), 3);
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&mut V) -> bool) {
        let mut removed = 0;
        for slot in self.slots.iter_mut() {
            if let Slot::Occupied { value, .. } = slot {
                if !f(value) {
                    *slot = Slot::Tombstone;
                    self.populated -= 1;
                    self.tombstones += 1;
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            self.after_remove();
        }
    }

    /// Returns an iterator over all values in the table, in slot order.
    ///
    /// The order is not insertion order, and changes whenever the table is
    /// rebuilt.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(3, |&n: &u64| n == 3).or_insert(3);
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    ///
    /// // Digests 1 and 3 land in slots 1 and 3.
    /// let values: Vec<u64> = table.iter().copied().collect();
    /// assert_eq!(values, [1, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator yielding mutable references to all values.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// The table is empty as soon as this returns, with its slot count
    /// unchanged, even if the iterator is leaked. Values not consumed are
    /// dropped along with the iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    /// table.entry(2, |&n: &u64| n == 2).or_insert(2);
    ///
    /// let values: Vec<u64> = table.drain().collect();
    /// assert!(table.is_empty());
    /// assert_eq!(values.len(), 2);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        let fresh = infallible(allocate_slots(self.slots.len(), Fallibility::Infallible));
        let slots = core::mem::replace(&mut self.slots, fresh);
        let remaining = core::mem::take(&mut self.populated);
        self.tombstones = 0;

        Drain {
            inner: IntoIter {
                slots: slots.into_iter(),
                remaining,
            },
            _marker: PhantomData,
        }
    }

    /// Distance from its home slot at which the value matching `eq` was
    /// found: 0 when it sits in its home slot.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_length(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        self.probe_find(hash, eq).map(|(_, distance)| distance)
    }

    /// Distance of the value stored at `index` from its home slot.
    #[cfg(any(test, feature = "stats"))]
    fn distance_of(&self, index: usize, hash: u64) -> usize {
        self.probe_seq(hash)
            .position(|candidate| candidate == index)
            .unwrap_or(self.slots.len())
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = Vec::new();

        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { hash, .. } = slot {
                let distance = self.distance_of(index, *hash);
                if counts.len() <= distance {
                    counts.resize(distance + 1, 0);
                }
                counts[distance] += 1;
            }
        }

        ProbeHistogram { counts }
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let slots = self.slots.len();
        let histogram = self.probe_histogram();
        let total_distance: usize = histogram
            .counts()
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();

        DebugStats {
            populated: self.populated,
            tombstones: self.tombstones,
            slots,
            capacity: self.capacity(),
            load_factor: self.populated as f64 / slots as f64,
            tombstone_ratio: self.tombstones as f64 / slots as f64,
            max_probe_length: histogram.max_probe_length().unwrap_or(0),
            mean_probe_length: if self.populated == 0 {
                0.0
            } else {
                total_distance as f64 / self.populated as f64
            },
            total_bytes: slots * core::mem::size_of::<Slot<V>>(),
            wasted_bytes: (slots - self.populated) * core::mem::size_of::<Slot<V>>(),
        }
    }

    /// Checks every structural invariant by scanning the whole table.
    #[cfg(test)]
    pub(crate) fn validate(&self) {
        let slots = self.slots.len();
        assert!(slots.is_power_of_two());
        assert!(slots >= self.config.min_capacity());

        let occupied = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied { .. }))
            .count();
        let tombstones = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Tombstone))
            .count();
        assert_eq!(occupied, self.populated, "populated count drifted");
        assert_eq!(tombstones, self.tombstones, "tombstone count drifted");
        assert!(self.populated <= self.capacity(), "over the grow threshold");
        assert!(
            self.tombstones <= resize::max_tombstones(&self.config, slots),
            "over the compact threshold"
        );
        assert!(
            self.populated + self.tombstones < slots,
            "no empty slot left"
        );

        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { hash, .. } = slot {
                for candidate in self.probe_seq(*hash) {
                    if candidate == index {
                        break;
                    }
                    assert!(
                        !matches!(self.slots[candidate], Slot::Empty),
                        "slot {index} unreachable: empty slot {candidate} on its probe path"
                    );
                }
            }
        }
    }

    /// Number of tombstoned slots.
    #[cfg(test)]
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// No value matched; inserting writes to the located slot.
    Vacant(VacantEntry<'a, V>),
    /// A value matched.
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// *table.entry(9, |&(k, _): &(u64, u32)| k == 9).or_insert((9, 0)) = (9, 5);
    /// assert_eq!(table.find(9, |&(k, _)| k == 9), Some(&(9, 5)));
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Runs `f` on the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the hash table.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Writes `value` into the located slot and returns a mutable reference
    /// to it.
    ///
    /// If the insert takes the table over its grow threshold, the table is
    /// doubled first and the returned reference points into the new slots.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;

        let reused = matches!(table.slots[self.index], Slot::Tombstone);
        table.slots[self.index] = Slot::Occupied {
            hash: self.hash,
            value,
        };
        table.populated += 1;
        if reused {
            table.tombstones -= 1;
        }
        debug_assert!(table.populated + table.tombstones <= table.slots.len());

        let index = table.after_insert(self.index);
        table.value_mut(index)
    }
}

/// A view into an occupied entry in the hash table.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        match &self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at an unoccupied slot"),
        }
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.value_mut(self.index)
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        self.table.value_mut(self.index)
    }

    /// Removes the value, leaving a tombstone, and returns it.
    pub fn remove(self) -> V {
        self.table.remove_at(self.index)
    }
}

/// An iterator over the values of a [`HashTable`], in slot order.
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// A mutable iterator over the values of a [`HashTable`].
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            slots: self.slots.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A draining iterator over the values in a [`HashTable`].
///
/// Owns the slots taken out of the table by [`HashTable::drain`]; the table
/// itself is already empty while this iterator is alive.
pub struct Drain<'a, V> {
    inner: IntoIter<V>,
    _marker: PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> FusedIterator for Drain<'_, V> {}

use crate::probe::ProbeStrategy;

/// Slot count every table starts from, and never shrinks below.
pub const DEFAULT_MIN_CAPACITY: usize = 8;

/// Percentage of slots that may be occupied before the table doubles.
pub const DEFAULT_GROW_THRESHOLD: u8 = 75;

/// Percentage of slots that may hold tombstones before the table is rebuilt
/// in place.
pub const DEFAULT_COMPACT_THRESHOLD: u8 = 25;

/// Tuning knobs shared by [`HashTable`], [`HashMap`] and [`HashSet`].
///
/// A `Config` is a plain `Copy` value. Start from [`Config::new`] (or
/// `Default`) and override individual settings with the `with_*` methods:
///
/// ```rust
/// use slot_hash::Config;
/// use slot_hash::probe::ProbeStrategy;
///
/// let config = Config::new()
///     .with_min_capacity(32)
///     .with_grow_threshold(80)
///     .with_probe_strategy(ProbeStrategy::DoubleHash);
///
/// assert_eq!(config.min_capacity(), 32);
/// assert_eq!(config.grow_threshold(), 80);
/// assert_eq!(config.compact_threshold(), 25);
/// ```
///
/// Thresholds are whole percentages in `1..=99`. A grow threshold of 100
/// would allow a table with no free slot, which the probing scheme relies on
/// never happening, so it is rejected.
///
/// [`HashTable`]: crate::HashTable
/// [`HashMap`]: crate::HashMap
/// [`HashSet`]: crate::HashSet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    min_capacity: usize,
    grow_threshold: u8,
    compact_threshold: u8,
    probe_strategy: ProbeStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Returns the default configuration: 8 slots minimum, grow above 75%
    /// load, compact above 25% tombstones, linear probing.
    pub const fn new() -> Self {
        Self {
            min_capacity: DEFAULT_MIN_CAPACITY,
            grow_threshold: DEFAULT_GROW_THRESHOLD,
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
            probe_strategy: ProbeStrategy::Linear,
        }
    }

    /// Sets the minimum number of slots. The value is rounded up to the next
    /// power of two.
    ///
    /// # Panics
    ///
    /// Panics if `slots` is zero or its next power of two overflows `usize`.
    pub fn with_min_capacity(mut self, slots: usize) -> Self {
        assert!(slots > 0, "minimum capacity must be non-zero");
        self.min_capacity = slots
            .checked_next_power_of_two()
            .expect("minimum capacity overflow");
        self
    }

    /// Sets the load percentage above which an insert doubles the table.
    ///
    /// # Panics
    ///
    /// Panics if `percent` is not in `1..=99`.
    pub fn with_grow_threshold(mut self, percent: u8) -> Self {
        assert!(
            (1..=99).contains(&percent),
            "grow threshold must be within 1..=99, got {percent}"
        );
        self.grow_threshold = percent;
        self
    }

    /// Sets the tombstone percentage above which a remove rebuilds the table
    /// at its current size.
    ///
    /// Independently of this threshold, an insert that would leave no empty
    /// slot also rebuilds at the current size, so lookups for absent keys
    /// always terminate before walking every slot.
    ///
    /// # Panics
    ///
    /// Panics if `percent` is not in `1..=99`.
    pub fn with_compact_threshold(mut self, percent: u8) -> Self {
        assert!(
            (1..=99).contains(&percent),
            "compact threshold must be within 1..=99, got {percent}"
        );
        self.compact_threshold = percent;
        self
    }

    /// Sets the probe strategy used for lookups, inserts and removals.
    pub fn with_probe_strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.probe_strategy = strategy;
        self
    }

    /// Minimum slot count (always a power of two).
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Grow threshold, in percent of slots.
    pub fn grow_threshold(&self) -> u8 {
        self.grow_threshold
    }

    /// Compact threshold, in percent of slots.
    pub fn compact_threshold(&self) -> u8 {
        self.compact_threshold
    }

    /// Probe strategy.
    pub fn probe_strategy(&self) -> ProbeStrategy {
        self.probe_strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config, Config::new());
        assert_eq!(config.min_capacity(), 8);
        assert_eq!(config.grow_threshold(), 75);
        assert_eq!(config.compact_threshold(), 25);
        assert_eq!(config.probe_strategy(), ProbeStrategy::Linear);
    }

    #[test]
    fn min_capacity_rounds_up() {
        assert_eq!(Config::new().with_min_capacity(1).min_capacity(), 1);
        assert_eq!(Config::new().with_min_capacity(9).min_capacity(), 16);
        assert_eq!(Config::new().with_min_capacity(64).min_capacity(), 64);
    }

    #[test]
    #[should_panic(expected = "minimum capacity must be non-zero")]
    fn zero_min_capacity_rejected() {
        let _ = Config::new().with_min_capacity(0);
    }

    #[test]
    #[should_panic(expected = "grow threshold")]
    fn full_grow_threshold_rejected() {
        let _ = Config::new().with_grow_threshold(100);
    }

    #[test]
    #[should_panic(expected = "compact threshold")]
    fn zero_compact_threshold_rejected() {
        let _ = Config::new().with_compact_threshold(0);
    }
}

//! Decides when a table must be rebuilt, and at what size.
//!
//! The table reports its counts after every insert and remove; the answer is
//! one of [`ResizeState`]. Anything other than `Stable` is acted on before the
//! triggering call returns, so callers never observe a pending state.

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResizeState {
    Stable,
    /// Load exceeds the grow threshold: rehash into more slots.
    GrowPending,
    /// Tombstones exceed the compact threshold, or no empty slot is left:
    /// rehash at the same size.
    CompactPending,
}

#[inline(always)]
fn percent_of(slots: usize, percent: u8) -> usize {
    ((slots as u128 * percent as u128) / 100) as usize
}

/// Largest occupied count allowed in `slots` slots.
#[inline(always)]
pub(crate) fn max_occupied(config: &Config, slots: usize) -> usize {
    percent_of(slots, config.grow_threshold())
}

/// Largest tombstone count allowed in `slots` slots.
#[inline(always)]
pub(crate) fn max_tombstones(config: &Config, slots: usize) -> usize {
    percent_of(slots, config.compact_threshold())
}

/// Lookups for absent keys stop at the first empty slot, so an insert that
/// leaves none (every slot occupied or tombstoned) compacts even while the
/// tombstone count is under its own threshold.
#[inline]
pub(crate) fn after_insert(
    config: &Config,
    occupied: usize,
    tombstones: usize,
    slots: usize,
) -> ResizeState {
    if occupied > max_occupied(config, slots) {
        ResizeState::GrowPending
    } else if occupied + tombstones >= slots {
        ResizeState::CompactPending
    } else {
        ResizeState::Stable
    }
}

#[inline]
pub(crate) fn after_remove(config: &Config, tombstones: usize, slots: usize) -> ResizeState {
    if tombstones > max_tombstones(config, slots) {
        ResizeState::CompactPending
    } else {
        ResizeState::Stable
    }
}

/// Smallest slot count that holds `elements` without exceeding the grow
/// threshold. `None` if that count does not fit in a `usize`.
pub(crate) fn slots_for(config: &Config, elements: usize) -> Option<usize> {
    let mut slots = config.min_capacity();
    while max_occupied(config, slots) < elements {
        slots = slots.checked_mul(2)?;
    }
    Some(slots)
}

/// Slot count to grow into from `slots` while holding `occupied` entries.
///
/// At least double the current size; more if a low grow threshold means a
/// single doubling would still be over the limit.
pub(crate) fn grow_target(config: &Config, occupied: usize, slots: usize) -> Option<usize> {
    let mut target = slots.checked_mul(2)?;
    while max_occupied(config, target) < occupied {
        target = target.checked_mul(2)?;
    }
    Some(target)
}

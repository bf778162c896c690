//! Probe sequences over a power-of-two slot array.
//!
//! A [`ProbeSeq`] is the ordered list of slots a lookup visits for a given
//! digest. Lookup, insertion and removal all walk the same sequence, so they
//! always agree on where a key may live.

use core::iter::FusedIterator;

/// How successive probe positions are derived from a digest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeStrategy {
    /// Step by one slot at a time. Cache friendly, prone to clustering.
    #[default]
    Linear,
    /// Step by an odd stride taken from the upper half of the digest.
    ///
    /// Keys that share a home slot usually get different strides, which
    /// breaks up clusters at the cost of scattered memory access.
    DoubleHash,
}

/// Iterator over the candidate slot indices for one digest.
///
/// Yields exactly `mask + 1` indices, each in `0..=mask` and each exactly
/// once, starting at `hash & mask`. `mask + 1` must be a power of two, which
/// makes any odd stride coprime with the slot count.
///
/// ```rust
/// use slot_hash::probe::{ProbeSeq, ProbeStrategy};
///
/// let order: Vec<usize> = ProbeSeq::new(6, 7, ProbeStrategy::Linear).collect();
/// assert_eq!(order, [6, 7, 0, 1, 2, 3, 4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    pos: usize,
    stride: usize,
    mask: usize,
    remaining: usize,
}

#[inline(always)]
fn secondary_stride(hash: u64) -> usize {
    ((hash >> 32) as usize) | 1
}

impl ProbeSeq {
    /// Starts a probe sequence for `hash` over `mask + 1` slots.
    #[inline]
    pub fn new(hash: u64, mask: usize, strategy: ProbeStrategy) -> Self {
        debug_assert!(
            mask.wrapping_add(1).is_power_of_two(),
            "slot count must be a power of two"
        );

        let stride = match strategy {
            ProbeStrategy::Linear => 1,
            ProbeStrategy::DoubleHash => secondary_stride(hash),
        };

        Self {
            pos: hash as usize & mask,
            stride,
            mask,
            remaining: mask.wrapping_add(1),
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let index = self.pos;
        self.pos = self.pos.wrapping_add(self.stride) & self.mask;
        Some(index)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}

impl FusedIterator for ProbeSeq {}

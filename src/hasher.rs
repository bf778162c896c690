use core::hash::BuildHasher;
use core::hash::Hash;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        ///
        /// With the `foldhash` feature (on by default) this is foldhash's
        /// randomly seeded builder: fast, and seeded per instance so iteration
        /// order differs between maps.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;

        /// A deterministic, seedable hasher builder.
        ///
        /// Two maps built with the same seed and the same operations lay out
        /// their slots identically, so their iteration order and rendered
        /// output match across runs.
        pub use foldhash::fast::FixedState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        ///
        /// Without `foldhash` this falls back to the standard library's
        /// SipHash based `RandomState`.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder used when neither `foldhash` nor `std` is enabled.
        ///
        /// It cannot be constructed, so `new()` and `default()` are
        /// unavailable and a hasher builder must be supplied explicitly.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}

/// Computes the 64-bit digest of `key`.
///
/// Equal keys always produce equal digests. A borrowed form `Q` of a key `K`
/// must hash identically to `K`, which the `Borrow` contract guarantees.
#[inline]
pub(crate) fn make_hash<Q, S>(hash_builder: &S, key: &Q) -> u64
where
    Q: Hash + ?Sized,
    S: BuildHasher,
{
    hash_builder.hash_one(key)
}

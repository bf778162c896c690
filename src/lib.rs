#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(all(test, not(feature = "std")))]
extern crate std;

mod config;
pub use config::Config;

pub mod error;

/// A HashMap built on the open-addressing [`HashTable`].
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

/// A hash set built on [`HashMap`].
///
/// This module provides a `HashSet` with the usual set interface and lazy
/// set-algebra iterators.
pub mod hash_set;

pub mod hash_table;
mod hasher;
pub mod probe;
mod resize;

#[cfg(feature = "serde")]
mod serde_impls;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod test_util;

pub use error::TryReserveError;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
#[cfg(any(test, feature = "stats"))]
pub use hash_table::DebugStats;
pub use hash_table::HashTable;
#[cfg(any(test, feature = "stats"))]
pub use hash_table::ProbeHistogram;
pub use hasher::DefaultHashBuilder;
#[cfg(feature = "foldhash")]
pub use hasher::FixedState;

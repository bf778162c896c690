//! Errors surfaced by fallible reservation.

use core::alloc::Layout;
use core::fmt;

/// The error type for `try_reserve` methods.
///
/// Infallible paths (`insert`, `reserve`, automatic growth) never return
/// this: on allocation failure they call
/// [`handle_alloc_error`](alloc::alloc::handle_alloc_error), and on arithmetic
/// overflow they panic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TryReserveError {
    /// The requested number of slots does not fit in `usize`, or their total
    /// size exceeds `isize::MAX` bytes.
    CapacityOverflow,

    /// The memory allocator returned an error.
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryReserveError::CapacityOverflow => {
                f.write_str("requested capacity exceeds the table's maximum")
            }
            TryReserveError::AllocError { layout } => write!(
                f,
                "memory allocation of {} bytes failed",
                layout.size()
            ),
        }
    }
}

impl core::error::Error for TryReserveError {}

use std::collections::TryReserveError;

use thiserror::Error;

/// Failures surfaced by a sort call.
///
/// Range bounds and threshold decisions hold by construction, so only
/// resource, scheduling and cancellation failures reach the caller.
#[derive(Debug, Error)]
pub enum SortError {
    /// The scratch buffer could not be allocated. `data` is untouched.
    #[error("failed to allocate scratch buffer of {len} elements")]
    ScratchAllocation {
        len: usize,
        #[source]
        source: TryReserveError,
    },

    /// A forked task over `[left, right)` panicked. `data` is left partially merged.
    #[error("sort task over [{left}, {right}) failed: {message}")]
    TaskFailed {
        left: usize,
        right: usize,
        message: String,
    },

    #[error("sort was cancelled")]
    Cancelled,

    #[error("failed to build sort thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

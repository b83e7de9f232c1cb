pub(crate) mod bubble_sort;
pub mod common;
pub(crate) mod imerge_sort;
pub(crate) mod parallel_imerge_sort;
pub(crate) mod parallel_quick_sort;
pub(crate) mod shuffle_sort;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::SortContext;
use crate::error::SortError;

/// Runs `op` on the context's dedicated pool when `config.threads` is set,
/// otherwise on rayon's global pool.
pub(crate) fn install<OP>(ctx: &SortContext, op: OP) -> Result<(), SortError>
where
    OP: FnOnce() -> Result<(), SortError> + Send,
{
    match ctx.config.threads {
        Some(threads) => ctx.thread_pool(threads)?.install(op),
        None => op(),
    }
}

/// Runs one task over `[left, right)`, turning a panic into
/// [`SortError::TaskFailed`].
pub(crate) fn guarded<F>(left: usize, right: usize, task: F) -> Result<(), SortError>
where
    F: FnOnce() -> Result<(), SortError>,
{
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(left, right, %message, "sort task panicked");
            Err(SortError::TaskFailed {
                left,
                right,
                message,
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

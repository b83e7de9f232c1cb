//! Fork-join variant of the hybrid merge sort.
//!
//! Each task owns a disjoint `data`/`scratch` pair obtained with
//! `split_at_mut`, so siblings never alias. Merging stays sequential inside
//! the parent task, after `rayon::join` has returned for both children.

use tracing::trace;

use crate::error::SortError;
use crate::instrument::{Cursor, Probe};
use crate::{SortContext, SortKey};

use super::{common, guarded};

pub(crate) fn sort<T: SortKey>(
    data: &mut [T],
    probe: &Probe,
    ctx: &SortContext,
) -> Result<(), SortError> {
    let len = data.len();
    if len < 2 {
        return Ok(());
    }

    let mut scratch = common::allocate_scratch(data, probe)?;
    let threshold = ctx.config.insertion_threshold;
    super::install(ctx, || {
        guarded(0, len, || divide(data, &mut scratch, 0, probe, threshold))
    })
}

fn divide<T: SortKey>(
    data: &mut [T],
    scratch: &mut [T],
    offset: usize,
    probe: &Probe,
    threshold: usize,
) -> Result<(), SortError> {
    let len = data.len();
    if len < 2 {
        return Ok(());
    }
    probe.check_cancelled()?;
    probe.notify(Cursor::Pair(offset, offset + len - 1));

    if len <= threshold {
        return common::insertion_sort_range(data, scratch, offset, probe);
    }

    let mid = common::split_point(len);
    trace!(left = offset, mid = offset + mid, right = offset + len, "fork");
    {
        let (left_data, right_data) = data.split_at_mut(mid);
        let (left_scratch, right_scratch) = scratch.split_at_mut(mid);
        let (left, right) = rayon::join(
            || {
                guarded(offset, offset + mid, || {
                    divide(left_data, left_scratch, offset, probe, threshold)
                })
            },
            || {
                guarded(offset + mid, offset + len, || {
                    divide(right_data, right_scratch, offset + mid, probe, threshold)
                })
            },
        );
        left.and(right)?;
    }

    common::merge_halves(data, scratch, mid, offset, probe);
    Ok(())
}

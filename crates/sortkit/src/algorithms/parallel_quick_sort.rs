use crate::error::SortError;
use crate::instrument::{Cursor, Probe};
use crate::{SortContext, SortKey};

use super::{common, guarded};

/// Hoare-partition quicksort that forks both sides with `rayon::join` while
/// the partition is larger than `insertion_threshold`.
///
/// Recursion is capped at [`common::quicksort_depth_limit`] levels; a
/// partition that exhausts the budget is heap sorted in place.
pub(crate) fn sort<T: SortKey>(
    data: &mut [T],
    probe: &Probe,
    ctx: &SortContext,
) -> Result<(), SortError> {
    let len = data.len();
    if len < 2 {
        return Ok(());
    }

    let threshold = ctx.config.insertion_threshold;
    let depth_limit = common::quicksort_depth_limit(len);
    super::install(ctx, || {
        guarded(0, len, || {
            quick_sort(data, 0, probe, threshold, depth_limit)
        })
    })
}

fn quick_sort<T: SortKey>(
    data: &mut [T],
    offset: usize,
    probe: &Probe,
    threshold: usize,
    depth_limit: usize,
) -> Result<(), SortError> {
    let len = data.len();
    if len < 2 {
        return Ok(());
    }
    probe.check_cancelled()?;

    if depth_limit == 0 {
        heap_sort(data, offset, probe);
        return Ok(());
    }
    let depth_limit = depth_limit - 1;

    let (low_len, high_start) = partition(data, offset, probe);
    let (low, rest) = data.split_at_mut(low_len);
    let high = &mut rest[(high_start - low_len)..];
    let high_offset = offset + high_start;

    if len > threshold {
        let (left, right) = rayon::join(
            || {
                guarded(offset, offset + low_len, || {
                    quick_sort(low, offset, probe, threshold, depth_limit)
                })
            },
            || {
                guarded(high_offset, offset + len, || {
                    quick_sort(high, high_offset, probe, threshold, depth_limit)
                })
            },
        );
        left.and(right)
    } else {
        quick_sort(low, offset, probe, threshold, depth_limit)?;
        quick_sort(high, high_offset, probe, threshold, depth_limit)
    }
}

/// Returns `(low_len, high_start)`: `data[..low_len]` holds keys `<= pivot`,
/// `data[high_start..]` keys `>= pivot`, and anything between equals the pivot.
fn partition<T: SortKey>(data: &mut [T], offset: usize, probe: &Probe) -> (usize, usize) {
    let pivot = data[(data.len() - 1) / 2];
    let mut i = 0usize;
    let mut j = data.len() - 1;

    loop {
        while data[i] < pivot {
            probe.record_comparison();
            i += 1;
        }
        while data[j] > pivot {
            probe.record_comparison();
            j -= 1;
        }
        if i > j {
            return (j + 1, i);
        }

        data.swap(i, j);
        probe.record_swap();
        probe.notify(Cursor::Pair(offset + i, offset + j));
        i += 1;
        if j == 0 {
            return (0, i);
        }
        j -= 1;
        if i > j {
            return (j + 1, i);
        }
    }
}

fn heap_sort<T: SortKey>(data: &mut [T], offset: usize, probe: &Probe) {
    let len = data.len();
    if len < 2 {
        return;
    }

    for start in (0..len / 2).rev() {
        sift_down(data, start, len, offset, probe);
    }

    for end in (1..len).rev() {
        data.swap(0, end);
        probe.record_swap();
        probe.notify(Cursor::Pair(offset, offset + end));
        sift_down(data, 0, end, offset, probe);
    }
}

#[inline]
fn sift_down<T: SortKey>(
    data: &mut [T],
    mut root: usize,
    end: usize,
    offset: usize,
    probe: &Probe,
) {
    loop {
        let child = root * 2 + 1;
        if child >= end {
            break;
        }

        let mut swap_idx = child;
        if child + 1 < end {
            probe.record_comparison();
            if data[child] < data[child + 1] {
                swap_idx = child + 1;
            }
        }

        probe.record_comparison();
        if data[root] >= data[swap_idx] {
            break;
        }

        data.swap(root, swap_idx);
        probe.record_swap();
        probe.notify(Cursor::Pair(offset + root, offset + swap_idx));
        root = swap_idx;
    }
}

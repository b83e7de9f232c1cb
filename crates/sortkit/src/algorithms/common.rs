use crate::SortKey;
use crate::error::SortError;
use crate::instrument::{Cursor, Probe};

/// Copies `data` into a freshly allocated scratch buffer of the same length.
///
/// Allocation happens before anything touches `data`, so a failure leaves the
/// input exactly as the caller passed it.
pub(crate) fn allocate_scratch<T: SortKey>(
    data: &[T],
    probe: &Probe,
) -> Result<Vec<T>, SortError> {
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(data.len())
        .map_err(|source| SortError::ScratchAllocation {
            len: data.len(),
            source,
        })?;
    scratch.extend_from_slice(data);
    probe.add_units(data.len());
    Ok(scratch)
}

/// Length of the left half when splitting a range of `len` elements.
#[inline]
pub(crate) fn split_point(len: usize) -> usize {
    len.div_ceil(2)
}

#[inline]
pub(crate) fn floor_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        usize::BITS as usize - 1 - n.leading_zeros() as usize
    }
}

/// Partition levels a quicksort may recurse through before it must fall back
/// to heap sort.
#[inline]
pub(crate) fn quicksort_depth_limit(n: usize) -> usize {
    2 * floor_log2(n) + 1
}

/// Mirrors `data` into the same-indexed `scratch` range.
#[inline]
pub(crate) fn flush<T: SortKey>(data: &[T], scratch: &mut [T], probe: &Probe) {
    debug_assert_eq!(data.len(), scratch.len());
    scratch.copy_from_slice(data);
    probe.add_units(data.len());
}

/// Insertion sort over one partition, then flushes it into `scratch`.
///
/// `offset` is the absolute index of `data[0]`, used only for cursors.
pub(crate) fn insertion_sort_range<T: SortKey>(
    data: &mut [T],
    scratch: &mut [T],
    offset: usize,
    probe: &Probe,
) -> Result<(), SortError> {
    for i in 1..data.len() {
        probe.check_cancelled()?;
        let key = data[i];
        let mut j = i;
        while j > 0 && key < data[j - 1] {
            probe.record_comparison();
            probe.record_swap();
            data.swap(j, j - 1);
            probe.notify(Cursor::Pair(offset + i, offset + j));
            j -= 1;
        }
        probe.notify(Cursor::Single(offset + i));
    }
    flush(data, scratch, probe);
    Ok(())
}

/// Merges the sorted halves `scratch[..mid]` and `scratch[mid..]` into `data`,
/// then flushes the merged range back into `scratch`.
///
/// The right head is taken only when strictly less than the left head, so
/// equal keys keep their input order.
pub(crate) fn merge_halves<T: SortKey>(
    data: &mut [T],
    scratch: &mut [T],
    mid: usize,
    offset: usize,
    probe: &Probe,
) {
    debug_assert_eq!(data.len(), scratch.len());
    debug_assert!(mid <= data.len());

    let len = data.len();
    if len == 0 {
        return;
    }
    probe.record_merge();
    probe.notify(Cursor::Pair(offset, offset + len - 1));

    let mut i = 0usize;
    let mut j = mid;
    let mut k = 0usize;

    while i < mid && j < len {
        probe.record_comparison();
        if scratch[j] < scratch[i] {
            data[k] = scratch[j];
            probe.notify(Cursor::Pair(offset + k, offset + j));
            j += 1;
        } else {
            data[k] = scratch[i];
            probe.notify(Cursor::Pair(offset + k, offset + i));
            i += 1;
        }
        k += 1;
    }

    while i < mid {
        probe.record_comparison();
        data[k] = scratch[i];
        probe.notify(Cursor::Pair(offset + k, offset + i));
        i += 1;
        k += 1;
    }

    while j < len {
        probe.record_comparison();
        data[k] = scratch[j];
        probe.notify(Cursor::Pair(offset + k, offset + j));
        j += 1;
        k += 1;
    }

    flush(data, scratch, probe);
}

#[inline]
pub fn is_sorted_non_decreasing<T: Ord>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

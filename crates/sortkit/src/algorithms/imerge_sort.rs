use crate::error::SortError;
use crate::instrument::{Cursor, Probe};
use crate::{EngineConfig, SortKey};

use super::common;

/// Merge sort that hands partitions of at most `insertion_threshold`
/// elements to insertion sort.
pub(crate) fn sort<T: SortKey>(
    data: &mut [T],
    probe: &Probe,
    config: &EngineConfig,
) -> Result<(), SortError> {
    if data.len() < 2 {
        return Ok(());
    }

    let mut scratch = common::allocate_scratch(data, probe)?;
    choose_algorithm(data, &mut scratch, 0, probe, config.insertion_threshold)
}

fn choose_algorithm<T: SortKey>(
    data: &mut [T],
    scratch: &mut [T],
    offset: usize,
    probe: &Probe,
    threshold: usize,
) -> Result<(), SortError> {
    if data.len() <= threshold {
        common::insertion_sort_range(data, scratch, offset, probe)
    } else {
        divide(data, scratch, offset, probe, threshold)
    }
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

    let mid = common::split_point(len);
    {
        let (left_data, right_data) = data.split_at_mut(mid);
        let (left_scratch, right_scratch) = scratch.split_at_mut(mid);
        choose_algorithm(left_data, left_scratch, offset, probe, threshold)?;
        choose_algorithm(right_data, right_scratch, offset + mid, probe, threshold)?;
    }

    common::merge_halves(data, scratch, mid, offset, probe);
    Ok(())
}

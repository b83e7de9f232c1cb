use crate::SortKey;
use crate::error::SortError;
use crate::instrument::{Cursor, Probe};

/// Sinks the smallest remaining element to the front of the unsorted suffix
/// by adjacent swaps.
pub(crate) fn sort<T: SortKey>(data: &mut [T], probe: &Probe) -> Result<(), SortError> {
    let len = data.len();
    if len < 2 {
        return Ok(());
    }

    for i in 0..len {
        probe.check_cancelled()?;
        for j in ((i + 1)..len).rev() {
            probe.record_comparison();
            if data[j] < data[j - 1] {
                data.swap(j, j - 1);
                probe.record_swap();
                probe.notify(Cursor::Pair(i, j));
            }
        }
        probe.notify(Cursor::Single(i));
    }
    Ok(())
}

use crate::SortKey;
use crate::error::SortError;
use crate::instrument::{Cursor, Probe};

pub(crate) fn sort<T: SortKey>(data: &mut [T], probe: &Probe) -> Result<(), SortError> {
    let len = data.len();
    if len < 2 {
        return Ok(());
    }

    for i in (0..len).rev() {
        probe.check_cancelled()?;
        for j in 0..i {
            probe.record_comparison();
            if data[j] > data[j + 1] {
                data.swap(j, j + 1);
                probe.record_swap();
                probe.notify(Cursor::Pair(i, j));
            }
        }
        probe.notify(Cursor::Single(i));
    }
    Ok(())
}

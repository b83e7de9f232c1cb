//! Counters, cursor notifications and timing shared by every algorithm.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, Sender, bounded};

use crate::error::SortError;

/// Active position(s) of an algorithm at a reporting instant.
///
/// Indices are absolute positions in the array being sorted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Cursor {
    Single(usize),
    Pair(usize, usize),
}

/// Best-effort sink for [`Cursor`] events.
///
/// Emission never blocks: when the channel is full or the receiver is gone
/// the event is dropped and counted in [`SortMetrics::dropped_cursors`].
#[derive(Clone, Debug, Default)]
pub struct Notifier {
    tx: Option<Sender<Cursor>>,
}

impl Notifier {
    pub fn silent() -> Self {
        Self { tx: None }
    }

    /// Bounded channel; `capacity` is clamped to at least one slot.
    pub fn channel(capacity: usize) -> (Self, Receiver<Cursor>) {
        let (tx, rx) = bounded(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }

    pub fn from_sender(tx: Sender<Cursor>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn is_active(&self) -> bool {
        self.tx.is_some()
    }
}

/// Cooperative cancellation flag shared between a caller and running sorts.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Wall-clock timer whose first `finish` fixes the duration.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    started: Instant,
    elapsed: Option<Duration>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            elapsed: None,
        }
    }

    pub fn finish(&mut self) -> Duration {
        let started = self.started;
        *self.elapsed.get_or_insert_with(|| started.elapsed())
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed.is_some()
    }
}

/// Snapshot of a completed sort.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SortMetrics {
    /// Comparison units: element comparisons plus buffer copies.
    pub comparisons: u64,
    pub swaps: u64,
    /// Number of merge steps executed.
    pub merges: u64,
    pub dropped_cursors: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
struct Counters {
    comparisons: AtomicU64,
    swaps: AtomicU64,
    merges: AtomicU64,
    dropped_cursors: AtomicU64,
}

/// Per-job instrumentation handle passed by reference into every task.
#[derive(Debug)]
pub(crate) struct Probe<'a> {
    counters: Counters,
    notifier: &'a Notifier,
    cancel: Option<&'a CancelToken>,
}

impl<'a> Probe<'a> {
    pub(crate) fn new(notifier: &'a Notifier, cancel: Option<&'a CancelToken>) -> Self {
        Self {
            counters: Counters::default(),
            notifier,
            cancel,
        }
    }

    #[inline]
    pub(crate) fn record_comparison(&self) {
        self.counters.comparisons.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_units(&self, units: usize) {
        if units > 0 {
            self.counters
                .comparisons
                .fetch_add(units as u64, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_swap(&self) {
        self.counters.swaps.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_merge(&self) {
        self.counters.merges.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn notify(&self, cursor: Cursor) {
        let Some(tx) = self.notifier.tx.as_ref() else {
            return;
        };
        // Full and disconnected channels both drop the event.
        if tx.try_send(cursor).is_err() {
            self.counters.dropped_cursors.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn check_cancelled(&self) -> Result<(), SortError> {
        match self.cancel {
            Some(token) if token.is_cancelled() => Err(SortError::Cancelled),
            _ => Ok(()),
        }
    }

    pub(crate) fn snapshot(&self, elapsed: Duration) -> SortMetrics {
        SortMetrics {
            comparisons: self.counters.comparisons.load(Ordering::Relaxed),
            swaps: self.counters.swaps.load(Ordering::Relaxed),
            merges: self.counters.merges.load(Ordering::Relaxed),
            dropped_cursors: self.counters.dropped_cursors.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

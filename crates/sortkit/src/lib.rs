mod algorithms;
mod error;
mod instrument;
mod job;

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

pub use algorithms::common::is_sorted_non_decreasing;
pub use error::SortError;
pub use instrument::{CancelToken, Cursor, Notifier, SortMetrics, Stopwatch};
pub use job::{JobState, SortJob};

/// Element types the engine can sort.
pub trait SortKey: Copy + Ord + Send + Sync {}

impl<T: Copy + Ord + Send + Sync> SortKey for T {}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SortAlgorithm {
    IMergeSort,
    ParallelIMergeSort,
    ParallelQuickSort,
    BubbleSort,
    ShuffleSort,
}

pub const ALL_ALGORITHMS: [SortAlgorithm; 5] = [
    SortAlgorithm::IMergeSort,
    SortAlgorithm::ParallelIMergeSort,
    SortAlgorithm::ParallelQuickSort,
    SortAlgorithm::BubbleSort,
    SortAlgorithm::ShuffleSort,
];

pub fn all_algorithms() -> &'static [SortAlgorithm] {
    &ALL_ALGORITHMS
}

pub fn algorithm_name(algo: SortAlgorithm) -> &'static str {
    match algo {
        SortAlgorithm::IMergeSort => "IMergeSort",
        SortAlgorithm::ParallelIMergeSort => "Parallel IMergeSort",
        SortAlgorithm::ParallelQuickSort => "Parallel QuickSort",
        SortAlgorithm::BubbleSort => "BubbleSort",
        SortAlgorithm::ShuffleSort => "ShuffleSort",
    }
}

pub fn is_parallel(algo: SortAlgorithm) -> bool {
    matches!(
        algo,
        SortAlgorithm::ParallelIMergeSort | SortAlgorithm::ParallelQuickSort
    )
}

/// Whether equal keys keep their input order.
pub fn is_stable(algo: SortAlgorithm) -> bool {
    !matches!(algo, SortAlgorithm::ParallelQuickSort)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    /// Partitions of at most this many elements are insertion sorted instead
    /// of divided further. Also the sequential cutoff for forking.
    pub insertion_threshold: usize,
    /// Size of a dedicated worker pool; `None` uses rayon's global pool.
    pub threads: Option<usize>,
}

pub const DEFAULT_CONFIG: EngineConfig = EngineConfig {
    insertion_threshold: 45,
    threads: None,
};

impl Default for EngineConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

impl EngineConfig {
    pub fn with_threshold(mut self, insertion_threshold: usize) -> Self {
        self.insertion_threshold = insertion_threshold;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// Everything a sort call needs besides the data itself.
///
/// A dedicated pool requested through `config.threads` is built on first use
/// and shared by every later sort through this context and clones taken after that.
#[derive(Clone, Debug, Default)]
pub struct SortContext {
    pub config: EngineConfig,
    pub notifier: Notifier,
    pub cancel: Option<CancelToken>,
    pool: OnceLock<(usize, Arc<rayon::ThreadPool>)>,
}

impl SortContext {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn thread_pool(&self, threads: usize) -> Result<Arc<rayon::ThreadPool>, SortError> {
        if let Some((size, pool)) = self.pool.get() {
            if *size == threads {
                return Ok(Arc::clone(pool));
            }
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sortkit-worker-{i}"))
            .build()?;
        let pool = Arc::new(pool);
        // A pool for a different size (config edited after first use) is not cached.
        let _ = self.pool.set((threads, Arc::clone(&pool)));
        debug!(threads, "worker pool built");
        Ok(pool)
    }
}

pub fn sort_i32(algo: SortAlgorithm, data: &mut [i32]) -> Result<SortMetrics, SortError> {
    sort_with_ctx(algo, data, &SortContext::default())
}

pub fn sort_i32_with_ctx(
    algo: SortAlgorithm,
    data: &mut [i32],
    ctx: &SortContext,
) -> Result<SortMetrics, SortError> {
    sort_with_ctx(algo, data, ctx)
}

/// Sorts `data` in place and returns the metrics of this run.
///
/// On error no metrics are produced; after [`SortError::TaskFailed`] the
/// slice may be partially merged.
pub fn sort_with_ctx<T: SortKey>(
    algo: SortAlgorithm,
    data: &mut [T],
    ctx: &SortContext,
) -> Result<SortMetrics, SortError> {
    let probe = instrument::Probe::new(&ctx.notifier, ctx.cancel.as_ref());
    let name = algorithm_name(algo);
    debug!(
        algorithm = name,
        len = data.len(),
        parallel = is_parallel(algo),
        "sort started"
    );

    let mut stopwatch = Stopwatch::start();
    let outcome = match algo {
        SortAlgorithm::IMergeSort => algorithms::imerge_sort::sort(data, &probe, &ctx.config),
        SortAlgorithm::ParallelIMergeSort => {
            algorithms::parallel_imerge_sort::sort(data, &probe, ctx)
        }
        SortAlgorithm::ParallelQuickSort => {
            algorithms::parallel_quick_sort::sort(data, &probe, ctx)
        }
        SortAlgorithm::BubbleSort => algorithms::bubble_sort::sort(data, &probe),
        SortAlgorithm::ShuffleSort => algorithms::shuffle_sort::sort(data, &probe),
    };
    let elapsed = stopwatch.finish();

    if let Err(err) = outcome {
        debug!(algorithm = name, error = %err, "sort failed");
        return Err(err);
    }

    let metrics = probe.snapshot(elapsed);
    if metrics.dropped_cursors > 0 {
        warn!(
            algorithm = name,
            dropped = metrics.dropped_cursors,
            "cursor notifications dropped"
        );
    }
    debug!(
        algorithm = name,
        comparisons = metrics.comparisons,
        swaps = metrics.swaps,
        merges = metrics.merges,
        elapsed_us = metrics.elapsed.as_micros() as u64,
        "sort finished"
    );
    Ok(metrics)
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::test_support::{Poisoned, Tagged};
    use super::*;

    fn assert_sorts_like_std(data: &[i32]) {
        for &algo in all_algorithms() {
            let mut actual = data.to_vec();
            sort_i32(algo, &mut actual).unwrap();

            let mut expected = data.to_vec();
            expected.sort_unstable();

            assert_eq!(
                actual,
                expected,
                "algorithm={} input_len={}",
                algorithm_name(algo),
                data.len(),
            );
        }
    }

    #[test]
    fn algorithm_names_are_unique() {
        let mut seen = HashSet::new();
        for &algo in all_algorithms() {
            assert!(seen.insert(algorithm_name(algo)));
        }
    }

    #[test]
    fn edge_cases() {
        let cases = [
            vec![],
            vec![42],
            vec![2, 1, 5, 0, 5, 4],
            vec![1, 2, 3, 4, 5, 6],
            vec![6, 5, 4, 3, 2, 1],
            vec![7; 128],
            vec![i32::MIN, 1, i32::MAX, 0, i32::MAX - 1, -2],
            vec![5, 5, 3, 3, 1, 1, 4, 4, 2, 2, 0, 0],
        ];

        for case in &cases {
            assert_sorts_like_std(case);
        }
    }

    #[test]
    fn fixed_seed_random_cases() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        for &size in &[2_usize, 3, 8, 44, 45, 46, 47, 90, 91, 92, 511, 2048] {
            let data: Vec<i32> = (0..size).map(|_| rng.random()).collect();
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn fixed_seed_many_duplicates() {
        let mut rng = StdRng::seed_from_u64(0xD0D1_2026);
        for &size in &[64_usize, 1024] {
            let data: Vec<i32> = (0..size).map(|_| rng.random_range(0..16) * 17).collect();
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn stable_algorithms_keep_tag_order() {
        let mut rng = StdRng::seed_from_u64(0x57AB_2026);
        let base: Vec<Tagged> = (0..700)
            .map(|i| Tagged::new(rng.random_range(0..10), i))
            .collect();
        let mut expected = base.clone();
        expected.sort_by_key(|t| t.key);
        let expected: Vec<u32> = expected.iter().map(|t| t.tag).collect();

        for &algo in all_algorithms().iter().filter(|&&a| is_stable(a)) {
            let mut data = base.clone();
            sort_with_ctx(algo, &mut data, &SortContext::default()).unwrap();
            let tags: Vec<u32> = data.iter().map(|t| t.tag).collect();
            assert_eq!(tags, expected, "algorithm={}", algorithm_name(algo));
        }
    }

    #[test]
    fn counters_on_small_inputs() {
        for &algo in all_algorithms() {
            let mut empty: Vec<i32> = vec![];
            let metrics = sort_i32(algo, &mut empty).unwrap();
            assert_eq!(metrics.comparisons, 0);
            assert_eq!(metrics.swaps, 0);

            let mut single = vec![7];
            let metrics = sort_i32(algo, &mut single).unwrap();
            assert_eq!((metrics.comparisons, metrics.swaps), (0, 0));
        }
    }

    #[test]
    fn sorted_input_needs_no_swaps() {
        let sorted: Vec<i32> = (0..300).collect();
        for &algo in all_algorithms() {
            if algo == SortAlgorithm::ParallelQuickSort {
                continue;
            }
            let mut data = sorted.clone();
            let metrics = sort_i32(algo, &mut data).unwrap();
            assert_eq!(metrics.swaps, 0, "algorithm={}", algorithm_name(algo));
        }
    }

    #[test]
    fn hybrid_engines_agree_on_repeated_runs() {
        let mut rng = StdRng::seed_from_u64(0xA11_2026);
        let base: Vec<i32> = (0..10_000).map(|_| rng.random_range(-1000..1000)).collect();

        let mut sequential = base.clone();
        sort_i32(SortAlgorithm::IMergeSort, &mut sequential).unwrap();
        for _ in 0..4 {
            let mut parallel = base.clone();
            sort_i32(SortAlgorithm::ParallelIMergeSort, &mut parallel).unwrap();
            assert_eq!(parallel, sequential);
        }
    }

    #[test]
    fn observer_receives_cursors() {
        let (notifier, rx) = Notifier::channel(1 << 15);
        let ctx = SortContext::default().with_notifier(notifier);
        let mut data: Vec<i32> = (0..200).rev().collect();

        let metrics =
            sort_i32_with_ctx(SortAlgorithm::ParallelIMergeSort, &mut data, &ctx).unwrap();

        let received = rx.try_iter().count() as u64;
        assert!(received > 0);
        assert_eq!(metrics.dropped_cursors, 0);
        assert!(is_sorted_non_decreasing(&data));
    }

    #[test]
    fn slow_observer_never_blocks_the_sort() {
        let (notifier, rx) = Notifier::channel(1);
        let ctx = SortContext::default().with_notifier(notifier);
        let mut data: Vec<i32> = (0..500).rev().collect();

        let metrics = sort_i32_with_ctx(SortAlgorithm::IMergeSort, &mut data, &ctx).unwrap();

        assert_eq!(rx.try_iter().count(), 1);
        assert!(metrics.dropped_cursors > 0);
        assert_eq!(data, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn cancelled_context_reports_cancellation() {
        let token = CancelToken::new();
        token.cancel();
        let ctx = SortContext::default().with_cancel(token);
        for &algo in all_algorithms() {
            let mut data: Vec<i32> = (0..100).rev().collect();
            let result = sort_i32_with_ctx(algo, &mut data, &ctx);
            assert!(
                matches!(result, Err(SortError::Cancelled)),
                "algorithm={}",
                algorithm_name(algo)
            );
        }
    }

    #[test]
    fn only_fork_join_variants_are_parallel() {
        let parallel: Vec<SortAlgorithm> = all_algorithms()
            .iter()
            .copied()
            .filter(|&a| is_parallel(a))
            .collect();
        assert_eq!(
            parallel,
            vec![
                SortAlgorithm::ParallelIMergeSort,
                SortAlgorithm::ParallelQuickSort
            ]
        );
    }

    #[test]
    fn faulty_comparison_surfaces_as_task_failure() {
        for algo in [
            SortAlgorithm::ParallelIMergeSort,
            SortAlgorithm::ParallelQuickSort,
        ] {
            for size in [20_i32, 200] {
                let mut data: Vec<Poisoned> = (0..size).rev().map(Poisoned).collect();
                let result = sort_with_ctx(algo, &mut data, &SortContext::default());
                assert!(
                    matches!(result, Err(SortError::TaskFailed { .. })),
                    "algorithm={} size={size}: {result:?}",
                    algorithm_name(algo)
                );
            }
        }
    }

    #[test]
    fn dedicated_pool_is_built_once() {
        let ctx = SortContext::new(EngineConfig::default().with_threads(2));
        let first = ctx.thread_pool(2).unwrap();
        let second = ctx.thread_pool(2).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.current_num_threads(), 2);

        let cloned = ctx.clone();
        assert!(Arc::ptr_eq(&first, &cloned.thread_pool(2).unwrap()));

        let other = ctx.thread_pool(3).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
        assert!(Arc::ptr_eq(&first, &ctx.thread_pool(2).unwrap()));
    }

    #[test]
    fn repeated_sorts_share_the_dedicated_pool() {
        let ctx = SortContext::new(EngineConfig::default().with_threads(2));
        for algo in [
            SortAlgorithm::ParallelIMergeSort,
            SortAlgorithm::ParallelQuickSort,
        ] {
            for _ in 0..3 {
                let mut data: Vec<i32> = (0..3000).rev().collect();
                sort_i32_with_ctx(algo, &mut data, &ctx).unwrap();
                assert_eq!(data, (0..3000).collect::<Vec<_>>());
            }
        }
        let pool = ctx.thread_pool(2).unwrap();
        assert!(Arc::ptr_eq(&pool, &ctx.thread_pool(2).unwrap()));
    }

    #[test]
    fn config_builders() {
        let config = EngineConfig::default().with_threshold(8).with_threads(3);
        assert_eq!(config.insertion_threshold, 8);
        assert_eq!(config.threads, Some(3));
        assert_eq!(EngineConfig::default(), DEFAULT_CONFIG);
    }
}

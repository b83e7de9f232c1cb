use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const LARGE_RUNTIME_SAMPLE_SIZE: usize = 10;
const LARGE_RUNTIME_WARM_UP_MS: u64 = 300;
const LARGE_RUNTIME_MEASURE_MS: u64 = 800;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_large_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(LARGE_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(LARGE_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(LARGE_RUNTIME_MEASURE_MS));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Distribution {
    RandomUniform,
    Descending,
    NearlySorted1pctSwaps,
    FewUnique,
}

pub const DISTRIBUTIONS: [Distribution; 4] = [
    Distribution::RandomUniform,
    Distribution::Descending,
    Distribution::NearlySorted1pctSwaps,
    Distribution::FewUnique,
];

impl Distribution {
    pub fn label(self) -> &'static str {
        match self {
            Self::RandomUniform => "random_uniform",
            Self::Descending => "descending",
            Self::NearlySorted1pctSwaps => "nearly_sorted_1pct_swaps",
            Self::FewUnique => "few_unique",
        }
    }
}

pub fn generate_i32<R: Rng + ?Sized>(rng: &mut R, dist: Distribution, size: usize) -> Vec<i32> {
    match dist {
        Distribution::RandomUniform => (0..size).map(|_| rng.random::<i32>()).collect(),
        Distribution::Descending => (0..size).rev().map(|i| i as i32).collect(),
        Distribution::NearlySorted1pctSwaps => {
            let mut data: Vec<i32> = (0..size).map(|i| i as i32).collect();
            if size > 0 {
                for _ in 0..(size / 100).max(1) {
                    let a = rng.random_range(0..size);
                    let b = rng.random_range(0..size);
                    data.swap(a, b);
                }
            }
            data
        }
        Distribution::FewUnique => (0..size).map(|_| rng.random_range(0..16)).collect(),
    }
}

use crate::error::SortError;
use crate::instrument::SortMetrics;
use crate::{SortAlgorithm, SortContext, algorithm_name, sort_with_ctx};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobState {
    Created,
    Running,
    Completed,
    Failed,
}

/// An input array bound to one algorithm, plus the outcome of its last sort.
///
/// Each [`SortJob::sort`] call starts from zeroed counters; metrics are only
/// reported once the job has completed.
#[derive(Debug)]
pub struct SortJob {
    algorithm: SortAlgorithm,
    ctx: SortContext,
    data: Vec<i32>,
    state: JobState,
    metrics: Option<SortMetrics>,
}

impl SortJob {
    pub fn new(algorithm: SortAlgorithm, data: Vec<i32>) -> Self {
        Self::with_context(algorithm, data, SortContext::default())
    }

    pub fn with_context(algorithm: SortAlgorithm, data: Vec<i32>, ctx: SortContext) -> Self {
        Self {
            algorithm,
            ctx,
            data,
            state: JobState::Created,
            metrics: None,
        }
    }

    /// Rebinds the job to `data` and clears the previous outcome.
    pub fn reset(&mut self, data: Vec<i32>) {
        self.data = data;
        self.state = JobState::Created;
        self.metrics = None;
    }

    pub fn sort(&mut self) -> Result<SortMetrics, SortError> {
        self.state = JobState::Running;
        self.metrics = None;
        match sort_with_ctx(self.algorithm, &mut self.data, &self.ctx) {
            Ok(metrics) => {
                self.state = JobState::Completed;
                self.metrics = Some(metrics);
                Ok(metrics)
            }
            Err(err) => {
                self.state = JobState::Failed;
                Err(err)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        algorithm_name(self.algorithm)
    }

    pub fn algorithm(&self) -> SortAlgorithm {
        self.algorithm
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn metrics(&self) -> Option<SortMetrics> {
        self.metrics
    }

    /// Zero until the job has completed.
    pub fn comparisons(&self) -> u64 {
        self.metrics.map_or(0, |m| m.comparisons)
    }

    /// Zero until the job has completed.
    pub fn swaps(&self) -> u64 {
        self.metrics.map_or(0, |m| m.swaps)
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<i32> {
        self.data
    }
}

//! Map / group-by-key / reduce stages and a local parallel executor.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::types::{CanopyError, CanopyResult};

/// One phase of the pipeline.
///
/// `map` turns each input into keyed values. The executor groups every value
/// emitted under the same key and hands the group to `reduce`. Keys are
/// independent of each other; a single group is reduced on one worker.
pub trait Stage: Sync {
    /// Record consumed by `map`.
    type Input: Send;
    /// Grouping key. Groups are reduced and returned in ascending key order.
    type Key: Ord + Send;
    /// Value emitted by `map` under a key.
    type Value: Send;
    /// Record produced by `reduce`.
    type Output: Send;

    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Emit keyed values for one input record.
    fn map(&self, input: Self::Input) -> CanopyResult<Vec<(Self::Key, Self::Value)>>;

    /// Aggregate every value emitted under `key`.
    fn reduce(&self, key: Self::Key, values: Vec<Self::Value>)
        -> CanopyResult<Vec<Self::Output>>;
}

/// Runs stages on a rayon thread pool. Each call to [`LocalExecutor::run`]
/// returns only after every reduce has finished, which is the barrier
/// between phases.
pub struct LocalExecutor {
    pool: rayon::ThreadPool,
}

impl LocalExecutor {
    /// Create an executor with `workers` threads; 0 means one per CPU.
    pub fn new(workers: usize) -> CanopyResult<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if workers > 0 {
            builder = builder.num_threads(workers);
        }
        let pool = builder
            .build()
            .map_err(|e| CanopyError::Executor(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Map every input, group by key, reduce every group.
    ///
    /// Output order is deterministic: groups in ascending key order, each
    /// group's outputs in the order `reduce` returned them.
    pub fn run<S: Stage>(&self, stage: &S, inputs: Vec<S::Input>) -> CanopyResult<Vec<S::Output>> {
        let input_count = inputs.len();
        let emitted: Vec<Vec<(S::Key, S::Value)>> = self.pool.install(|| {
            inputs
                .into_par_iter()
                .map(|input| stage.map(input))
                .collect::<CanopyResult<_>>()
        })?;

        let groups = group_by_key(emitted);
        let group_count = groups.len();

        let reduced: Vec<Vec<S::Output>> = self.pool.install(|| {
            groups
                .into_par_iter()
                .map(|(key, values)| stage.reduce(key, values))
                .collect::<CanopyResult<_>>()
        })?;

        let outputs: Vec<S::Output> = reduced.into_iter().flatten().collect();
        log::debug!(
            "Stage {}: {} inputs, {} groups, {} outputs",
            stage.name(),
            input_count,
            group_count,
            outputs.len()
        );
        Ok(outputs)
    }
}

/// Merge per-input emissions into key-ordered groups. Within a group, values
/// keep the order of the inputs that emitted them.
pub fn group_by_key<K: Ord, V>(emitted: impl IntoIterator<Item = Vec<(K, V)>>) -> Vec<(K, Vec<V>)> {
    let mut groups: BTreeMap<K, Vec<V>> = BTreeMap::new();
    for batch in emitted {
        for (key, value) in batch {
            groups.entry(key).or_default().push(value);
        }
    }
    groups.into_iter().collect()
}

use std::ops::RangeInclusive;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument};

use crate::algorithms::merge::BestK;
use crate::algorithms::selection::{
    batch_buffer, fold_batch, score_candidates, trace_best, Selection,
};
use crate::core::config::SelectionConfig;
use crate::core::numeric::Numeric;
use crate::core::shapelet::Shapelet;
use crate::core::timeseries::Dataset;
use crate::error::{Result, ShapeletError};

/// Append-only candidate buffer shared by the workers of one round.
///
/// The vector's length is the shared write position: a push stores the
/// candidate and advances the position inside one critical section. Workers
/// never read each other's entries.
struct CandidateBuffer<N: Numeric> {
    slots: Mutex<Vec<Shapelet<N>>>,
}

impl<N: Numeric> CandidateBuffer<N> {
    /// Wrap a pre-sized, empty batch so pushes never reallocate.
    fn new(batch: Vec<Shapelet<N>>) -> Self {
        Self {
            slots: Mutex::new(batch),
        }
    }

    fn push(&self, candidate: Shapelet<N>) {
        lock(&self.slots).push(candidate);
    }

    fn into_inner(self) -> Vec<Shapelet<N>> {
        self.slots
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lock a mutex, recovering the data if another worker panicked while
/// holding it. Every critical section here is a single push or store.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Split `[min, max]` into contiguous sub-ranges, one per worker.
///
/// Uses `min(max_workers, max - min + 1)` workers. Every worker gets
/// `span / workers` lengths and the last one also absorbs the remainder.
///
/// # Panics
/// Panics if `min > max` or `max_workers == 0`.
pub fn partition_lengths(
    min: usize,
    max: usize,
    max_workers: usize,
) -> Vec<RangeInclusive<usize>> {
    assert!(min <= max, "min length greater than max length");
    assert!(max_workers > 0, "Need at least one worker");

    let span = max - min + 1;
    let workers = max_workers.min(span);
    let per_worker = span / workers;

    (0..workers)
        .map(|w| {
            let lo = min + w * per_worker;
            let hi = if w == workers - 1 {
                max
            } else {
                lo + per_worker - 1
            };
            lo..=hi
        })
        .collect()
}

/// Select the `k` best shapelets of `dataset`, scoring each series'
/// candidates on up to `max_workers` threads.
///
/// Rounds stay sequential: for each source series the length range is split
/// with [`partition_lengths`], every worker scores its own lengths and appends
/// into the shared round buffer, and once all workers have finished the batch
/// is sorted, filtered and merged exactly as in [`select`]. Since the sort
/// order is total, the result does not depend on the worker count.
///
/// The worker pool is built once per call and reused for every round.
///
/// # Errors
/// [`ShapeletError::ZeroWorkers`] if `max_workers` is zero, anything
/// [`select`] can return, and [`ShapeletError::ThreadPool`] if the pool cannot
/// be built. A worker failure ends the run after the round's workers have
/// all returned.
///
/// [`select`]: crate::algorithms::selection::select
#[instrument(skip_all, fields(series = dataset.len(), min = config.min_length, max = config.max_length, k = config.k, max_workers = max_workers))]
pub fn select_parallel<N: Numeric>(
    dataset: &Dataset<N>,
    config: &SelectionConfig,
    max_workers: usize,
) -> Result<Selection<N>> {
    if max_workers == 0 {
        return Err(ShapeletError::ZeroWorkers);
    }
    config.validate(dataset)?;

    let ranges = partition_lengths(config.min_length, config.max_length, max_workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ranges.len())
        .thread_name(|i| format!("shapelet-worker-{i}"))
        .build()
        .map_err(|e| ShapeletError::ThreadPool(e.to_string()))?;
    info!(workers = ranges.len(), "starting parallel shapelet selection");

    let labels = dataset.labels();
    let mut best = BestK::new(config.k);
    let mut evaluated = 0;

    for source in 0..dataset.len() {
        let buffer = CandidateBuffer::new(batch_buffer(dataset[source].len(), config)?);
        let failure: Mutex<Option<ShapeletError>> = Mutex::new(None);

        // `scope` returns only after every spawned worker has finished
        pool.scope(|scope| {
            for lengths in &ranges {
                let lengths = lengths.clone();
                let (buffer, failure, labels) = (&buffer, &failure, &labels);
                scope.spawn(move |_| {
                    let result =
                        score_candidates(dataset, labels, source, lengths, |c| buffer.push(c));
                    if let Err(err) = result {
                        let mut slot = lock(failure);
                        if slot.is_none() {
                            *slot = Some(err);
                        }
                    }
                });
            }
        });

        if let Some(err) = failure.into_inner().unwrap_or_else(PoisonError::into_inner) {
            return Err(err);
        }

        let batch = buffer.into_inner();
        let generated = batch.len();
        evaluated += generated;

        let survivors = fold_batch(&mut best, batch, config.distinct_best_k);
        debug!(
            series = source,
            candidates = generated,
            survivors,
            best_quality = best.best().map(|s| s.quality.to_f64()),
            "round complete"
        );
        trace_best(&best);
    }

    let selection = Selection {
        shapelets: best.into_vec(),
        candidates_evaluated: evaluated,
    };
    info!(
        evaluated = selection.candidates_evaluated,
        selected = selection.shapelets.len(),
        "parallel shapelet selection complete"
    );
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::selection::select;
    use approx::assert_relative_eq;

    fn mixed_dataset() -> Dataset<f64> {
        let rows: Vec<(u8, Vec<f64>)> = (0..6)
            .map(|s| {
                let label = (s % 2) as u8;
                let values = (0..16)
                    .map(|i| {
                        let t = i as f64;
                        let base = 2.0 + (t * 0.7 + s as f64).sin() * 0.3;
                        if label == 1 && (5..9).contains(&i) {
                            base + (t - 4.0) * 0.8
                        } else {
                            base
                        }
                    })
                    .collect();
                (label, values)
            })
            .collect();
        Dataset::from_f64(&rows).unwrap()
    }

    #[test]
    fn test_partition_even() {
        assert_eq!(partition_lengths(3, 10, 4), vec![3..=4, 5..=6, 7..=8, 9..=10]);
    }

    #[test]
    fn test_partition_remainder_goes_to_last() {
        assert_eq!(partition_lengths(3, 9, 3), vec![3..=4, 5..=6, 7..=9]);
        assert_eq!(partition_lengths(1, 5, 2), vec![1..=2, 3..=5]);
    }

    #[test]
    fn test_partition_caps_worker_count() {
        assert_eq!(partition_lengths(4, 6, 16), vec![4..=4, 5..=5, 6..=6]);
        assert_eq!(partition_lengths(7, 7, 3), vec![7..=7]);
    }

    #[test]
    fn test_partition_covers_range_once() {
        for workers in 1..=12 {
            let ranges = partition_lengths(2, 13, workers);
            let lengths: Vec<usize> = ranges.into_iter().flatten().collect();
            assert_eq!(lengths, (2..=13).collect::<Vec<_>>(), "workers={workers}");
        }
    }

    #[test]
    fn test_zero_workers_rejected() {
        let ds = mixed_dataset();
        assert!(matches!(
            select_parallel(&ds, &SelectionConfig::new(3, 5, 2), 0),
            Err(ShapeletError::ZeroWorkers)
        ));
    }

    #[test]
    fn test_matches_sequential_for_every_worker_count() {
        let ds = mixed_dataset();
        let config = SelectionConfig::new(3, 8, 4);
        let sequential = select(&ds, &config).unwrap();

        for workers in 1..=config.length_span() {
            let parallel = select_parallel(&ds, &config, workers).unwrap();
            assert_eq!(parallel.candidates_evaluated, sequential.candidates_evaluated);
            assert_eq!(parallel.shapelets.len(), sequential.shapelets.len());
            for (p, s) in parallel.shapelets.iter().zip(&sequential.shapelets) {
                assert_eq!(
                    (p.series, p.start, p.length),
                    (s.series, s.start, s.length),
                    "workers={workers}"
                );
                assert_relative_eq!(p.quality, s.quality, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_worker_error_is_returned() {
        let ds = Dataset::<f64>::from_f64(&[
            (0u8, vec![1.0, 1.0, 1.0, 1.0]),
            (0, vec![2.0, 2.0, 2.0, 2.0]),
            (1, vec![4.0, 4.0, 4.0, 4.0]),
        ])
        .unwrap();
        assert!(matches!(
            select_parallel(&ds, &SelectionConfig::new(2, 3, 1), 2),
            Err(ShapeletError::DegenerateQuality)
        ));
    }
}

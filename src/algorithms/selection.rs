use std::ops::RangeInclusive;

use tracing::{debug, info, instrument, trace};

use crate::algorithms::distance::{distance_vector, DistanceScratch};
use crate::algorithms::merge::BestK;
use crate::algorithms::quality::bin_f_statistic;
use crate::algorithms::similarity::remove_self_similars;
use crate::core::config::{candidate_count, SelectionConfig};
use crate::core::numeric::Numeric;
use crate::core::shapelet::{rank_by_quality, Shapelet};
use crate::core::timeseries::Dataset;
use crate::error::Result;

/// Outcome of a selection run.
#[derive(Debug, Clone)]
pub struct Selection<N: Numeric> {
    /// Best shapelets, ranked by descending quality. Holds `k` entries unless
    /// fewer candidates survived filtering over the whole run.
    pub shapelets: Vec<Shapelet<N>>,
    /// Number of candidates scored.
    pub candidates_evaluated: usize,
}

/// Progress of a [`SequentialSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The next round draws its candidates from this series.
    Series(usize),
    /// Every series has been processed.
    Done,
}

/// Score every candidate of series `source` whose length lies in `lengths`.
///
/// Candidates are produced length by length, start by start; each one is
/// handed to `emit` with its quality filled in. Scratch buffers are private
/// to the call.
pub(crate) fn score_candidates<N, F>(
    dataset: &Dataset<N>,
    labels: &[u8],
    source: usize,
    lengths: RangeInclusive<usize>,
    mut emit: F,
) -> Result<()>
where
    N: Numeric,
    F: FnMut(Shapelet<N>),
{
    let ts = &dataset[source];
    let mut scratch = DistanceScratch::with_capacity(*lengths.end());
    let mut distances = Vec::with_capacity(dataset.len());

    for length in lengths {
        for (start, window) in ts.values().windows(length).enumerate() {
            distance_vector(&mut scratch, window, dataset, &mut distances);
            let mut candidate = Shapelet::new(source, start, length);
            candidate.quality = bin_f_statistic(&distances, labels)?;
            emit(candidate);
        }
    }
    Ok(())
}

/// Allocate an empty batch able to hold every candidate of one series.
pub(crate) fn batch_buffer<N: Numeric>(
    series_len: usize,
    config: &SelectionConfig,
) -> Result<Vec<Shapelet<N>>> {
    let mut batch = Vec::new();
    batch.try_reserve_exact(candidate_count(
        series_len,
        config.min_length,
        config.max_length,
    ))?;
    Ok(batch)
}

/// Sort a scored batch, drop self-similar candidates and merge the survivors
/// into `best`. Returns the number of survivors.
pub(crate) fn fold_batch<N: Numeric>(
    best: &mut BestK<N>,
    mut batch: Vec<Shapelet<N>>,
    distinct: bool,
) -> usize {
    batch.sort_by(rank_by_quality);
    let survivors = remove_self_similars(batch);
    let n = survivors.len();
    if distinct {
        best.merge_distinct(survivors);
    } else {
        best.merge(survivors);
    }
    n
}

/// Log the current best-k set, one line per entry.
pub(crate) fn trace_best<N: Numeric>(best: &BestK<N>) {
    for (rank, s) in best.as_slice().iter().enumerate() {
        trace!(
            rank,
            series = s.series,
            length = s.length,
            start = s.start,
            quality = s.quality.to_f64(),
            "best-k entry"
        );
    }
}

/// Single-threaded shapelet selection, one series per step.
///
/// Each [`step`](Self::step) runs a full round for the current series:
/// generate every candidate of every length in `[min, max]`, score it against
/// the whole dataset, sort the batch, filter self-similar candidates and merge
/// the survivors into the best-k set. Rounds only ever raise the quality of
/// the best-k set.
///
/// ```
/// use shapelet_rs::{Dataset, SelectionConfig, SequentialSelector, Phase};
///
/// let ds = Dataset::<f64>::from_f64(&[
///     (0u8, vec![0.3, 0.9, 0.4, 0.8, 0.5]),
///     (0, vec![0.8, 0.3, 0.7, 0.4, 0.9]),
///     (1, vec![0.1, 0.1, 0.9, 0.1, 0.1]),
///     (1, vec![0.2, 0.2, 0.2, 1.0, 0.2]),
/// ])
/// .unwrap();
/// let mut selector = SequentialSelector::new(&ds, SelectionConfig::new(3, 3, 2)).unwrap();
/// assert_eq!(selector.phase(), Phase::Series(0));
/// selector.step().unwrap();
/// assert_eq!(selector.phase(), Phase::Series(1));
/// let selection = selector.run().unwrap();
/// assert_eq!(selection.shapelets.len(), 2);
/// ```
pub struct SequentialSelector<'a, N: Numeric> {
    dataset: &'a Dataset<N>,
    config: SelectionConfig,
    labels: Vec<u8>,
    best: BestK<N>,
    phase: Phase,
    evaluated: usize,
}

impl<'a, N: Numeric> SequentialSelector<'a, N> {
    /// Validate the configuration and prepare an empty best-k set.
    pub fn new(dataset: &'a Dataset<N>, config: SelectionConfig) -> Result<Self> {
        config.validate(dataset)?;
        Ok(Self {
            dataset,
            labels: dataset.labels(),
            best: BestK::new(config.k),
            config,
            phase: Phase::Series(0),
            evaluated: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Best-k set after the rounds run so far.
    pub fn best(&self) -> &BestK<N> {
        &self.best
    }

    /// Run the round for the current series and advance.
    ///
    /// Returns the phase after the round; calling `step` once `Done` is a no-op.
    pub fn step(&mut self) -> Result<Phase> {
        let i = match self.phase {
            Phase::Series(i) => i,
            Phase::Done => return Ok(Phase::Done),
        };

        let mut batch = batch_buffer(self.dataset[i].len(), &self.config)?;
        score_candidates(
            self.dataset,
            &self.labels,
            i,
            self.config.min_length..=self.config.max_length,
            |candidate| batch.push(candidate),
        )?;
        let generated = batch.len();
        self.evaluated += generated;

        let survivors = fold_batch(&mut self.best, batch, self.config.distinct_best_k);
        debug!(
            series = i,
            candidates = generated,
            survivors,
            best_quality = self.best.best().map(|s| s.quality.to_f64()),
            "round complete"
        );
        trace_best(&self.best);

        self.phase = if i + 1 < self.dataset.len() {
            Phase::Series(i + 1)
        } else {
            Phase::Done
        };
        Ok(self.phase)
    }

    /// Run the remaining rounds and return the final selection.
    pub fn run(mut self) -> Result<Selection<N>> {
        while self.step()? != Phase::Done {}
        Ok(self.finish())
    }

    /// Stop and return the best-k set as it stands.
    pub fn finish(self) -> Selection<N> {
        Selection {
            shapelets: self.best.into_vec(),
            candidates_evaluated: self.evaluated,
        }
    }
}

/// Select the `k` best shapelets of `dataset`, one series at a time.
///
/// # Errors
/// Configuration errors from [`SelectionConfig::validate`], allocation
/// failure of a candidate batch, or [`DegenerateQuality`] if some candidate's
/// distance vector has no within-class spread.
///
/// [`DegenerateQuality`]: crate::ShapeletError::DegenerateQuality
#[instrument(skip_all, fields(series = dataset.len(), min = config.min_length, max = config.max_length, k = config.k))]
pub fn select<N: Numeric>(dataset: &Dataset<N>, config: &SelectionConfig) -> Result<Selection<N>> {
    info!("starting sequential shapelet selection");
    let selection = SequentialSelector::new(dataset, config.clone())?.run()?;
    info!(
        evaluated = selection.candidates_evaluated,
        selected = selection.shapelets.len(),
        "sequential shapelet selection complete"
    );
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeletError;

    /// Two irregular series (class 0) and two series carrying the motif
    /// `[1, 6, 2]` at different offsets (class 1).
    pub(crate) fn motif_dataset() -> Dataset<f64> {
        Dataset::from_f64(&[
            (0u8, vec![2.4, 4.5, 4.3, 2.8, 3.5, 3.3, 4.0, 4.4, 2.3, 2.1]),
            (0, vec![4.5, 3.3, 4.3, 2.0, 3.3, 4.2, 2.7, 4.8, 4.7, 2.1]),
            (1, vec![2.1, 3.6, 1.0, 6.0, 2.0, 3.3, 2.1, 2.7, 3.3, 3.5]),
            (1, vec![2.7, 2.7, 2.7, 3.4, 2.9, 2.1, 1.0, 6.0, 2.0, 2.6]),
        ])
        .unwrap()
    }

    #[test]
    fn test_selects_embedded_motif() {
        let ds = motif_dataset();
        let selection = select(&ds, &SelectionConfig::new(3, 3, 1)).unwrap();
        assert_eq!(selection.shapelets.len(), 1);
        let best = selection.shapelets[0];
        assert!(
            [(2, 2), (3, 6)].contains(&(best.series, best.start)),
            "expected the motif window, got {best:?}"
        );
        assert_eq!(best.length, 3);
        assert_eq!(selection.candidates_evaluated, 4 * 8);
    }

    #[test]
    fn test_motif_beats_every_noise_candidate() {
        let ds = motif_dataset();
        let labels = ds.labels();
        let selection = select(&ds, &SelectionConfig::new(3, 3, 1)).unwrap();
        let best_quality = selection.shapelets[0].quality;
        for source in [0, 1] {
            score_candidates(&ds, &labels, source, 3..=3, |c| {
                assert!(best_quality > c.quality, "{c:?} >= {best_quality}");
            })
            .unwrap();
        }
    }

    #[test]
    fn test_step_walks_every_series() {
        let ds = motif_dataset();
        let mut selector = SequentialSelector::new(&ds, SelectionConfig::new(3, 4, 3)).unwrap();
        let mut phases = vec![selector.phase()];
        while selector.phase() != Phase::Done {
            phases.push(selector.step().unwrap());
        }
        assert_eq!(
            phases,
            vec![
                Phase::Series(0),
                Phase::Series(1),
                Phase::Series(2),
                Phase::Series(3),
                Phase::Done
            ]
        );
        assert_eq!(selector.step().unwrap(), Phase::Done);
        assert_eq!(selector.best().len(), 3);
    }

    #[test]
    fn test_best_k_sorted_and_distinct_per_series() {
        let ds = motif_dataset();
        let selection = select(&ds, &SelectionConfig::new(2, 4, 6)).unwrap();
        assert_eq!(selection.shapelets.len(), 6);
        for w in selection.shapelets.windows(2) {
            assert!(w[0].quality >= w[1].quality);
        }
        for (i, a) in selection.shapelets.iter().enumerate() {
            assert!(a.end() <= ds[a.series].len());
            for b in &selection.shapelets[i + 1..] {
                assert!(!a.is_self_similar(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_quality_never_degrades_across_rounds() {
        let ds = motif_dataset();
        let mut selector = SequentialSelector::new(&ds, SelectionConfig::new(3, 5, 3)).unwrap();
        let mut previous: Vec<f64> = Vec::new();
        while selector.phase() != Phase::Done {
            selector.step().unwrap();
            let current: Vec<f64> = selector.best().as_slice().iter().map(|s| s.quality).collect();
            for (old, new) in previous.iter().zip(&current) {
                assert!(new >= old, "rank quality dropped from {old} to {new}");
            }
            previous = current;
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let ds = motif_dataset();
        assert!(matches!(
            select(&ds, &SelectionConfig::new(4, 3, 1)),
            Err(ShapeletError::InvalidLengthRange { min: 4, max: 3 })
        ));
        assert!(matches!(
            select(&ds, &SelectionConfig::new(3, 11, 1)),
            Err(ShapeletError::LengthExceedsSeries { .. })
        ));
    }

    #[test]
    fn test_degenerate_candidate_is_reported() {
        // Every window of every series normalizes to the same vector (scales
        // are powers of two, so exactly), making all distances zero
        let ds = Dataset::<f64>::from_f64(&[
            (0u8, vec![1.0, 1.0, 1.0]),
            (0, vec![2.0, 2.0, 2.0]),
            (1, vec![4.0, 4.0, 4.0]),
        ])
        .unwrap();
        assert!(matches!(
            select(&ds, &SelectionConfig::new(2, 2, 1)),
            Err(ShapeletError::DegenerateQuality)
        ));
    }
}

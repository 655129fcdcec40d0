use std::cmp::Ordering;

use crate::core::numeric::Numeric;
use crate::core::timeseries::Dataset;

/// A shapelet candidate: a window of one series in a [`Dataset`] plus its quality.
///
/// The handle does not copy samples; `values` borrows them from the dataset
/// the shapelet was drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shapelet<N: Numeric> {
    /// Index of the source series in the dataset.
    pub series: usize,
    /// Offset of the first sample within the source series.
    pub start: usize,
    /// Number of samples.
    pub length: usize,
    /// Binary separation score, zero until scored.
    pub quality: N,
}

impl<N: Numeric> Shapelet<N> {
    pub fn new(series: usize, start: usize, length: usize) -> Self {
        Self {
            series,
            start,
            length,
            quality: N::zero(),
        }
    }

    /// One past the last sample index.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Samples of this shapelet, borrowed from its source series.
    ///
    /// Returns `None` if the handle does not fit the given dataset.
    pub fn values<'a>(&self, dataset: &'a Dataset<N>) -> Option<&'a [N]> {
        dataset
            .get(self.series)
            .and_then(|ts| ts.values().get(self.start..self.end()))
    }

    /// Two shapelets are self-similar iff they come from the same series and
    /// their `[start, end)` ranges intersect.
    #[inline]
    pub fn is_self_similar(&self, other: &Self) -> bool {
        self.series == other.series && self.start < other.end() && other.start < self.end()
    }
}

/// Ranking order: descending quality, then `(series, start, length)` ascending.
///
/// The positional tie-break makes the order total, so a batch sorts the same
/// way no matter in which order its candidates were produced.
pub fn rank_by_quality<N: Numeric>(a: &Shapelet<N>, b: &Shapelet<N>) -> Ordering {
    b.quality
        .partial_cmp(&a.quality)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.series.cmp(&b.series))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.length.cmp(&b.length))
}

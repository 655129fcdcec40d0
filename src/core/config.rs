use crate::core::numeric::Numeric;
use crate::core::timeseries::Dataset;
use crate::error::{Result, ShapeletError};

/// Configuration for shapelet selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Shortest candidate length (inclusive).
    pub min_length: usize,
    /// Longest candidate length (inclusive).
    pub max_length: usize,
    /// Number of shapelets to keep.
    pub k: usize,
    /// Re-apply self-similarity filtering to the merged best-k set.
    ///
    /// Off by default: only each incoming batch is filtered.
    pub distinct_best_k: bool,
}

impl SelectionConfig {
    pub fn new(min_length: usize, max_length: usize, k: usize) -> Self {
        Self {
            min_length,
            max_length,
            k,
            distinct_best_k: false,
        }
    }

    pub fn with_distinct_best_k(mut self, distinct: bool) -> Self {
        self.distinct_best_k = distinct;
        self
    }

    /// Number of distinct candidate lengths.
    pub fn length_span(&self) -> usize {
        self.max_length + 1 - self.min_length
    }

    /// Check the configuration against a dataset.
    ///
    /// Requires `1 <= min <= max <= shortest series`, `k >= 1`, at least three
    /// series and both classes represented.
    pub fn validate<N: Numeric>(&self, dataset: &Dataset<N>) -> Result<()> {
        if self.min_length == 0 {
            return Err(ShapeletError::ZeroLength);
        }
        if self.min_length > self.max_length {
            return Err(ShapeletError::InvalidLengthRange {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if self.k == 0 {
            return Err(ShapeletError::InvalidK);
        }
        if dataset.len() < 3 {
            return Err(ShapeletError::TooFewSeries {
                count: dataset.len(),
            });
        }
        for (i, ts) in dataset.iter().enumerate() {
            if ts.label() > 1 {
                return Err(ShapeletError::NonBinaryLabel {
                    series: i,
                    label: ts.label(),
                });
            }
            if ts.len() < self.max_length {
                return Err(ShapeletError::LengthExceedsSeries {
                    max: self.max_length,
                    series: i,
                    series_len: ts.len(),
                });
            }
        }
        let (zeros, ones) = dataset.class_counts();
        if zeros == 0 {
            return Err(ShapeletError::MissingClass { label: 0 });
        }
        if ones == 0 {
            return Err(ShapeletError::MissingClass { label: 1 });
        }
        Ok(())
    }
}

/// Number of candidates of every length in `[min, max]` drawn from a series
/// of length `series_len`.
///
/// Lengths longer than the series contribute nothing.
pub fn candidate_count(series_len: usize, min: usize, max: usize) -> usize {
    (min..=max)
        .filter(|&l| l <= series_len)
        .map(|l| series_len - l + 1)
        .sum()
}

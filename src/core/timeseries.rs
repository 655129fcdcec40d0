use crate::core::numeric::Numeric;
use crate::error::{Result, ShapeletError};

/// A labeled time series.
///
/// Immutable once constructed: candidates refer into it by index, so the
/// sample vector is never handed out mutably.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeseries<N: Numeric> {
    label: u8,
    values: Vec<N>,
}

impl<N: Numeric> Timeseries<N> {
    /// Create a series from samples and a binary class label (0 or 1).
    pub fn new(label: u8, values: Vec<N>) -> Result<Self> {
        if label > 1 {
            return Err(ShapeletError::InvalidLabel { label });
        }
        if values.is_empty() {
            return Err(ShapeletError::EmptySeries);
        }
        Ok(Self { label, values })
    }

    /// Create a series from `f64` samples, converting them into the backend.
    pub fn from_f64(label: u8, values: &[f64]) -> Result<Self> {
        Self::new(label, values.iter().map(|&v| N::from_f64(v)).collect())
    }

    pub fn label(&self) -> u8 {
        self.label
    }

    pub fn values(&self) -> &[N] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Owning collection of the series taking part in a selection run.
///
/// Shapelets hold indices into this collection rather than references, so the
/// dataset may be moved freely while handles stay valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<N: Numeric> {
    series: Vec<Timeseries<N>>,
}

impl<N: Numeric> Dataset<N> {
    pub fn new(series: Vec<Timeseries<N>>) -> Self {
        Self { series }
    }

    /// Build a dataset from `(label, samples)` pairs.
    ///
    /// Errors report the offending series index.
    pub fn from_f64<S: AsRef<[f64]>>(rows: &[(u8, S)]) -> Result<Self> {
        let series = rows
            .iter()
            .enumerate()
            .map(|(i, (label, values))| {
                Timeseries::from_f64(*label, values.as_ref()).map_err(|e| match e {
                    ShapeletError::InvalidLabel { label } => {
                        ShapeletError::NonBinaryLabel { series: i, label }
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { series })
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Timeseries<N>> {
        self.series.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Timeseries<N>> {
        self.series.iter()
    }

    pub fn as_slice(&self) -> &[Timeseries<N>] {
        &self.series
    }

    /// Class label of every series, in dataset order.
    pub fn labels(&self) -> Vec<u8> {
        self.series.iter().map(Timeseries::label).collect()
    }

    /// Length of the shortest series, `None` for an empty dataset.
    pub fn min_series_len(&self) -> Option<usize> {
        self.series.iter().map(Timeseries::len).min()
    }

    /// Number of series in class 0 and class 1.
    pub fn class_counts(&self) -> (usize, usize) {
        let ones = self.series.iter().filter(|ts| ts.label() == 1).count();
        (self.series.len() - ones, ones)
    }
}

impl<N: Numeric> std::ops::Index<usize> for Dataset<N> {
    type Output = Timeseries<N>;

    fn index(&self, idx: usize) -> &Timeseries<N> {
        &self.series[idx]
    }
}

impl<'a, N: Numeric> IntoIterator for &'a Dataset<N> {
    type Item = &'a Timeseries<N>;
    type IntoIter = std::slice::Iter<'a, Timeseries<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

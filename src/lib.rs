pub mod algorithms;
pub mod core;
pub mod error;
pub mod io;

pub use crate::algorithms::distance::{
    early_abandon_distance, length_wise_distances, normalize, shapelet_ts_distance,
    DistanceScratch,
};
pub use crate::algorithms::merge::BestK;
#[cfg(feature = "parallel")]
pub use crate::algorithms::parallel::{partition_lengths, select_parallel};
pub use crate::algorithms::quality::bin_f_statistic;
pub use crate::algorithms::selection::{select, Phase, Selection, SequentialSelector};
pub use crate::algorithms::similarity::remove_self_similars;
pub use crate::algorithms::transform::{transform, transform_values};
pub use crate::core::config::{candidate_count, SelectionConfig};
pub use crate::core::numeric::{Fixed, Numeric};
pub use crate::core::shapelet::{rank_by_quality, Shapelet};
pub use crate::core::timeseries::{Dataset, Timeseries};
pub use crate::error::{Result, ShapeletError};
pub use crate::io::{read_archive, read_dataset, save_archive, write_archive, ArchivedShapelet};

/// High-level facade for shapelet selection, generic over the numeric backend.
///
/// # Examples
///
/// ```
/// use shapelet_rs::{Dataset, FloatTransform, SelectionConfig};
///
/// let ds = Dataset::<f64>::from_f64(&[
///     (0u8, vec![2.4, 4.5, 4.3, 2.8, 3.5, 3.3, 4.0, 4.4, 2.3, 2.1]),
///     (0, vec![4.5, 3.3, 4.3, 2.0, 3.3, 4.2, 2.7, 4.8, 4.7, 2.1]),
///     (1, vec![2.1, 3.6, 1.0, 6.0, 2.0, 3.3, 2.1, 2.7, 3.3, 3.5]),
///     (1, vec![2.7, 2.7, 2.7, 3.4, 2.9, 2.1, 1.0, 6.0, 2.0, 2.6]),
/// ])
/// .unwrap();
/// let engine = FloatTransform::new(SelectionConfig::new(3, 3, 1));
/// let selection = engine.select(&ds).unwrap();
/// assert_eq!(selection.shapelets.len(), 1);
/// // the `[1, 6, 2]` motif planted in both class 1 series
/// let best = selection.shapelets[0];
/// assert!([(2, 2), (3, 6)].contains(&(best.series, best.start)));
///
/// let features = engine.transform(&ds, &selection, &ds).unwrap();
/// assert_eq!(features.len(), 4);
/// ```
pub struct ShapeletTransform<N: Numeric> {
    config: SelectionConfig,
    _numeric: std::marker::PhantomData<N>,
}

impl<N: Numeric> ShapeletTransform<N> {
    /// Create a new engine with the given configuration.
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            config,
            _numeric: std::marker::PhantomData,
        }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Select the best shapelets one series at a time on the calling thread.
    pub fn select(&self, dataset: &Dataset<N>) -> Result<Selection<N>> {
        select(dataset, &self.config)
    }

    /// Select the best shapelets, splitting each series' candidate lengths
    /// across up to `max_workers` threads. Same result as [`select`](Self::select).
    #[cfg(feature = "parallel")]
    pub fn select_parallel(&self, dataset: &Dataset<N>, max_workers: usize) -> Result<Selection<N>> {
        select_parallel(dataset, &self.config, max_workers)
    }

    /// Shapelet-transform `dataset` with shapelets selected from `source`.
    ///
    /// Returns one row per series and one column per selected shapelet, or
    /// [`ShapeletError::LengthExceedsSeries`] if a series of `dataset` is
    /// shorter than a selected shapelet.
    pub fn transform(
        &self,
        dataset: &Dataset<N>,
        selection: &Selection<N>,
        source: &Dataset<N>,
    ) -> Result<Vec<Vec<N>>> {
        transform(dataset, &selection.shapelets, source)
    }
}

/// Convenience type alias for floating-point selection.
pub type FloatTransform = ShapeletTransform<f64>;

/// Convenience type alias for fixed-point selection.
pub type FixedTransform = ShapeletTransform<Fixed>;

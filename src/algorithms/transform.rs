use crate::algorithms::distance::DistanceScratch;
use crate::core::numeric::Numeric;
use crate::core::shapelet::Shapelet;
use crate::core::timeseries::Dataset;
use crate::error::{Result, ShapeletError};

/// Shapelet transform: map every series of `dataset` to its distances from a
/// set of shapelet samples.
///
/// Row `i` holds one feature per shapelet: the minimum distance from that
/// shapelet to any window of series `i`.
///
/// # Errors
/// [`ShapeletError::ZeroLength`] for an empty shapelet and
/// [`ShapeletError::LengthExceedsSeries`] if a shapelet is longer than one of
/// the series.
pub fn transform_values<N, S>(dataset: &Dataset<N>, shapelets: &[S]) -> Result<Vec<Vec<N>>>
where
    N: Numeric,
    S: AsRef<[N]>,
{
    for shapelet in shapelets {
        let len = shapelet.as_ref().len();
        if len == 0 {
            return Err(ShapeletError::ZeroLength);
        }
        if let Some((series, ts)) = dataset.iter().enumerate().find(|(_, ts)| ts.len() < len) {
            return Err(ShapeletError::LengthExceedsSeries {
                max: len,
                series,
                series_len: ts.len(),
            });
        }
    }

    let max_len = shapelets.iter().map(|s| s.as_ref().len()).max().unwrap_or(0);
    let mut scratch = DistanceScratch::with_capacity(max_len);
    let mut features = vec![Vec::with_capacity(shapelets.len()); dataset.len()];

    // Shapelet-major so each pivot is normalized once
    for shapelet in shapelets {
        scratch.set_pivot(shapelet.as_ref());
        for (row, ts) in features.iter_mut().zip(dataset) {
            row.push(scratch.min_distance(ts.values()));
        }
    }
    Ok(features)
}

/// Shapelet transform using shapelets selected from `source`.
///
/// `dataset` may be `source` itself or new data of compatible length.
/// Shapelets that do not fit `source` produce no feature column.
///
/// # Errors
/// Same as [`transform_values`].
pub fn transform<N: Numeric>(
    dataset: &Dataset<N>,
    shapelets: &[Shapelet<N>],
    source: &Dataset<N>,
) -> Result<Vec<Vec<N>>> {
    let values: Vec<&[N]> = shapelets.iter().filter_map(|s| s.values(source)).collect();
    transform_values(dataset, &values)
}

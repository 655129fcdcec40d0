use crate::core::numeric::Numeric;
use crate::error::{Result, ShapeletError};

/// Binary separation score of a distance vector (F-statistic analogue).
///
/// `distances[i]` is the distance from a candidate to series `i`, whose class
/// is `labels[i]`. With per-class means `mean_0`, `mean_1` and overall mean
/// `mean`:
///
/// ```text
/// quality = ((mean_0 - mean)^2 + (mean_1 - mean)^2) / (SSW / (N - 2))
/// ```
///
/// where `SSW` is the sum of squared deviations of every distance from its own
/// class mean. Higher is better.
///
/// # Errors
/// - [`ShapeletError::DistanceCountMismatch`] if the slices differ in length
/// - [`ShapeletError::TooFewSeries`] for fewer than three entries
/// - [`ShapeletError::NonBinaryLabel`] for a label outside {0, 1}
/// - [`ShapeletError::MissingClass`] if a class has no entries
/// - [`ShapeletError::DegenerateQuality`] if `SSW` is exactly zero, or so
///   small that the backend cannot represent `SSW / (N - 2)` or the quotient
pub fn bin_f_statistic<N: Numeric>(distances: &[N], labels: &[u8]) -> Result<N> {
    if distances.len() != labels.len() {
        return Err(ShapeletError::DistanceCountMismatch {
            expected: labels.len(),
            got: distances.len(),
        });
    }
    let n = distances.len();
    if n < 3 {
        return Err(ShapeletError::TooFewSeries { count: n });
    }

    let mut sums = [N::zero(); 2];
    let mut counts = [0usize; 2];
    for (series, (&d, &label)) in distances.iter().zip(labels).enumerate() {
        match label {
            0 | 1 => {
                sums[label as usize] += d;
                counts[label as usize] += 1;
            }
            _ => return Err(ShapeletError::NonBinaryLabel { series, label }),
        }
    }
    for (label, &count) in counts.iter().enumerate() {
        if count == 0 {
            return Err(ShapeletError::MissingClass { label: label as u8 });
        }
    }

    let means = [
        sums[0] / N::from_usize(counts[0]),
        sums[1] / N::from_usize(counts[1]),
    ];
    let overall = (sums[0] + sums[1]) / N::from_usize(n);
    let between = (means[0] - overall).square() + (means[1] - overall).square();

    let mut within = N::zero();
    for (&d, &label) in distances.iter().zip(labels) {
        within += (d - means[label as usize]).square();
    }
    if within == N::zero() {
        return Err(ShapeletError::DegenerateQuality);
    }

    // A coarse backend can round a tiny SSW down to zero here, and a zero
    // or near-zero divisor would saturate to the abandon sentinel
    let variance = within / N::from_usize(n - 2);
    if variance == N::zero() {
        return Err(ShapeletError::DegenerateQuality);
    }
    let quality = between / variance;
    if quality.is_infinite() {
        return Err(ShapeletError::DegenerateQuality);
    }
    Ok(quality)
}

use crate::core::numeric::Numeric;
use crate::core::timeseries::{Dataset, Timeseries};

/// Rescale `values` in place to unit Euclidean norm.
///
/// The norm is taken over the raw magnitudes (no mean subtraction). A vector
/// with zero norm cannot be normalized and is left unchanged.
pub fn normalize<N: Numeric>(values: &mut [N]) {
    let mut squares = N::zero();
    for &v in values.iter() {
        squares += v.square();
    }
    let norm = squares.sqrt();
    if norm == N::zero() {
        return;
    }
    for v in values.iter_mut() {
        *v = *v / norm;
    }
}

/// Squared Euclidean distance between two equal-length vectors, abandoned as
/// soon as the partial sum reaches `best`.
///
/// Returns `N::infinity()` when the distance is `>= best`, otherwise the exact
/// squared distance. Since every term is non-negative the partial sums never
/// decrease, so an abandoned computation could not have produced a value
/// below `best`.
#[inline]
pub fn early_abandon_distance<N: Numeric>(pivot: &[N], target: &[N], best: N) -> N {
    debug_assert_eq!(pivot.len(), target.len());
    let mut total = N::zero();
    for (&p, &t) in pivot.iter().zip(target) {
        total += (p - t).square();
        if total >= best {
            return N::infinity();
        }
    }
    total
}

/// Reusable scratch buffers for candidate-to-series distances.
///
/// Holds a normalized copy of the current pivot and one window buffer, so
/// scoring never writes to series data and never allocates per window. Each
/// worker owns its own scratch.
#[derive(Debug, Clone)]
pub struct DistanceScratch<N: Numeric> {
    pivot: Vec<N>,
    window: Vec<N>,
}

impl<N: Numeric> Default for DistanceScratch<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Numeric> DistanceScratch<N> {
    pub fn new() -> Self {
        Self {
            pivot: Vec::new(),
            window: Vec::new(),
        }
    }

    /// Pre-size both buffers for pivots up to `max_len` samples.
    pub fn with_capacity(max_len: usize) -> Self {
        Self {
            pivot: Vec::with_capacity(max_len),
            window: Vec::with_capacity(max_len),
        }
    }

    /// Load a pivot: copy the samples and normalize the copy.
    pub fn set_pivot(&mut self, values: &[N]) {
        self.pivot.clear();
        self.pivot.extend_from_slice(values);
        normalize(&mut self.pivot);
    }

    /// The normalized pivot currently loaded.
    pub fn pivot(&self) -> &[N] {
        &self.pivot
    }

    /// Minimum distance from the loaded pivot to every equal-length window of
    /// `target` (all `target.len() - pivot.len() + 1` positions).
    ///
    /// # Panics
    /// Panics if no pivot is loaded or the pivot is longer than `target`.
    pub fn min_distance(&mut self, target: &[N]) -> N {
        let m = self.pivot.len();
        assert!(m > 0, "No pivot loaded");
        assert!(
            target.len() >= m,
            "Target series shorter than pivot ({} < {m})",
            target.len()
        );

        let mut best = N::infinity();
        for window in target.windows(m) {
            self.window.clear();
            self.window.extend_from_slice(window);
            normalize(&mut self.window);
            let d = early_abandon_distance(&self.pivot, &self.window, best);
            if d < best {
                best = d;
            }
        }
        best
    }
}

/// Minimum distance from a candidate's samples to any equal-length window of
/// a target series.
///
/// Neither input is modified. The pivot may come from the target itself, in
/// which case the result is zero.
///
/// # Panics
/// Panics if `pivot` is empty or longer than `target`.
pub fn shapelet_ts_distance<N: Numeric>(pivot: &[N], target: &[N]) -> N {
    let mut scratch = DistanceScratch::with_capacity(pivot.len());
    scratch.set_pivot(pivot);
    scratch.min_distance(target)
}

/// Fill `out` with the distance from the candidate samples `pivot` to every
/// series of `dataset`, in dataset order.
pub fn distance_vector<N: Numeric>(
    scratch: &mut DistanceScratch<N>,
    pivot: &[N],
    dataset: &Dataset<N>,
    out: &mut Vec<N>,
) {
    scratch.set_pivot(pivot);
    out.clear();
    out.extend(dataset.iter().map(|ts| scratch.min_distance(ts.values())));
}

/// Distances from every `len`-sample candidate of `pivot_ts` to `target_ts`.
///
/// Element `i` is the distance of the candidate starting at offset `i`.
///
/// # Panics
/// Panics if `len` is zero or longer than either series.
pub fn length_wise_distances<N: Numeric>(
    pivot_ts: &Timeseries<N>,
    target_ts: &Timeseries<N>,
    len: usize,
) -> Vec<N> {
    assert!(len > 0, "Candidate length must be > 0");
    assert!(
        len <= pivot_ts.len() && len <= target_ts.len(),
        "Candidate length {len} longer than series ({}, {})",
        pivot_ts.len(),
        target_ts.len()
    );

    let mut scratch = DistanceScratch::with_capacity(len);
    pivot_ts
        .values()
        .windows(len)
        .map(|candidate| {
            scratch.set_pivot(candidate);
            scratch.min_distance(target_ts.values())
        })
        .collect()
}

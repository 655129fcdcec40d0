use crate::algorithms::similarity::remove_self_similars;
use crate::core::numeric::Numeric;
use crate::core::shapelet::{rank_by_quality, Shapelet};

/// The running set of the `k` best shapelets.
///
/// Starts empty; unfilled slots act as placeholders that any real candidate
/// displaces. Entries are always sorted by [`rank_by_quality`].
#[derive(Debug, Clone)]
pub struct BestK<N: Numeric> {
    k: usize,
    entries: Vec<Shapelet<N>>,
}

impl<N: Numeric> BestK<N> {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            entries: Vec::with_capacity(k),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of filled slots, at most `k`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether all `k` slots hold a real candidate.
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.k
    }

    pub fn as_slice(&self) -> &[Shapelet<N>] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<Shapelet<N>> {
        self.entries
    }

    /// Highest-quality entry.
    pub fn best(&self) -> Option<&Shapelet<N>> {
        self.entries.first()
    }

    /// Quality of the weakest filled slot.
    pub fn min_quality(&self) -> Option<N> {
        self.entries.last().map(|s| s.quality)
    }

    /// Fold a batch in: concatenate, sort by quality, keep the first `k`.
    ///
    /// Existing entries are not checked for self-similarity against the
    /// batch; use [`merge_distinct`](Self::merge_distinct) for that.
    pub fn merge(&mut self, batch: Vec<Shapelet<N>>) {
        self.entries.extend(batch);
        self.entries.sort_by(rank_by_quality);
        self.entries.truncate(self.k);
    }

    /// Like [`merge`](Self::merge), but also removes self-similar shapelets
    /// across the combined set before truncating, so the result never holds
    /// two overlapping windows of one series.
    pub fn merge_distinct(&mut self, batch: Vec<Shapelet<N>>) {
        self.entries.extend(batch);
        self.entries.sort_by(rank_by_quality);
        let mut distinct = remove_self_similars(std::mem::take(&mut self.entries));
        distinct.truncate(self.k);
        self.entries = distinct;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(series: usize, start: usize, quality: f64) -> Shapelet<f64> {
        Shapelet {
            quality,
            ..Shapelet::new(series, start, 3)
        }
    }

    #[test]
    fn test_first_merge_fills_placeholders() {
        let mut best = BestK::new(3);
        assert!(best.is_empty());
        best.merge(vec![scored(0, 0, 1.0), scored(0, 5, 3.0)]);
        assert_eq!(best.len(), 2);
        assert!(!best.is_full());
        assert_eq!(best.best().map(|s| s.quality), Some(3.0));
    }

    #[test]
    fn test_keeps_top_k_sorted() {
        let mut best = BestK::new(2);
        best.merge(vec![scored(0, 0, 1.0), scored(0, 4, 2.0)]);
        best.merge(vec![scored(1, 0, 1.5), scored(1, 4, 0.5)]);
        let q: Vec<f64> = best.as_slice().iter().map(|s| s.quality).collect();
        assert_eq!(q, vec![2.0, 1.5]);
        assert_eq!(best.min_quality(), Some(1.5));
    }

    #[test]
    fn test_min_quality_never_drops() {
        let mut best = BestK::new(2);
        best.merge(vec![scored(0, 0, 5.0), scored(0, 4, 4.0)]);
        best.merge(vec![scored(1, 0, 0.1)]);
        assert_eq!(best.min_quality(), Some(4.0));
        best.merge(Vec::new());
        assert_eq!(best.len(), 2);
    }

    #[test]
    fn test_plain_merge_admits_cross_batch_overlap() {
        let mut best = BestK::new(2);
        best.merge(vec![scored(0, 0, 2.0)]);
        best.merge(vec![scored(0, 1, 1.0)]);
        assert_eq!(best.len(), 2);
        assert!(best.as_slice()[0].is_self_similar(&best.as_slice()[1]));
    }

    #[test]
    fn test_distinct_merge_rejects_cross_batch_overlap() {
        let mut best = BestK::new(2);
        best.merge_distinct(vec![scored(0, 0, 2.0)]);
        best.merge_distinct(vec![scored(0, 1, 1.0), scored(0, 6, 0.5)]);
        let starts: Vec<usize> = best.as_slice().iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 6]);
    }
}

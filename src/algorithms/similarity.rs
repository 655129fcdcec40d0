use crate::core::numeric::Numeric;
use crate::core::shapelet::Shapelet;

/// Remove self-similar candidates from a batch sorted by descending quality.
///
/// A candidate is dropped if it is self-similar to *any* earlier candidate in
/// the batch, whether that earlier one was kept or dropped itself. Survivors
/// keep their relative order, and no two survivors are self-similar, so a
/// second pass is a no-op.
///
/// Quadratic in the batch size; a batch holds the candidates of one series.
pub fn remove_self_similars<N: Numeric>(batch: Vec<Shapelet<N>>) -> Vec<Shapelet<N>> {
    let keep: Vec<bool> = (0..batch.len())
        .map(|i| {
            !batch[..i]
                .iter()
                .any(|earlier| batch[i].is_self_similar(earlier))
        })
        .collect();

    batch
        .into_iter()
        .zip(keep)
        .filter_map(|(s, k)| k.then_some(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(series: usize, start: usize, length: usize) -> Shapelet<f64> {
        Shapelet::new(series, start, length)
    }

    #[test]
    fn test_keeps_first_of_overlapping_pair() {
        let batch = vec![cand(0, 2, 3), cand(0, 3, 3), cand(0, 6, 2)];
        let out = remove_self_similars(batch);
        assert_eq!(out, vec![cand(0, 2, 3), cand(0, 6, 2)]);
    }

    #[test]
    fn test_chain_drops_against_removed_candidates() {
        // b overlaps a, c overlaps b but not a: both b and c go
        let a = cand(0, 0, 3); // [0, 3)
        let b = cand(0, 2, 3); // [2, 5)
        let c = cand(0, 4, 3); // [4, 7)
        assert!(!a.is_self_similar(&c));
        let out = remove_self_similars(vec![a, b, c]);
        assert_eq!(out, vec![a]);
    }

    #[test]
    fn test_other_series_untouched() {
        let batch = vec![cand(0, 0, 4), cand(1, 0, 4), cand(2, 1, 2)];
        let out = remove_self_similars(batch.clone());
        assert_eq!(out, batch);
    }

    #[test]
    fn test_idempotent() {
        let batch: Vec<_> = (0..12).map(|i| cand(0, (i * 5) % 11, 2 + i % 3)).collect();
        let once = remove_self_similars(batch);
        let twice = remove_self_similars(once.clone());
        assert_eq!(once, twice);
        for (i, a) in once.iter().enumerate() {
            for b in &once[i + 1..] {
                assert!(!a.is_self_similar(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(remove_self_similars(Vec::<Shapelet<f64>>::new()).is_empty());
    }
}

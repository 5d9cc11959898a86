//! Combinatorial primitives for pairwise-scored association problems.
//!
//! Consistency scoring over a candidate set works on the C(n,2) unordered
//! pairs of candidates. This module provides the closed-form bijection
//! between a linear pair index and its `(i, j)` row/column pair, iteration
//! over all pairs without materializing them, and bounded top-k selection
//! over a score vector.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::Rng;

/// Number of unordered pairs `(i, j)` with `i < j < n`.
#[inline]
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Map a linear pair index to its `(i, j)` pair, `i < j < n`.
///
/// The enumeration is the reverse-lexicographic closed form: constant time,
/// no search, and a bijection from `[0, pair_count(n))` onto all pairs. For
/// every `n` the first index maps to `(0, 1)` and the last to
/// `(n - 2, n - 1)`.
///
/// # Panics
///
/// Panics if `k >= pair_count(n)`.
pub fn pair_from_linear(k: usize, n: usize) -> (usize, usize) {
    let total = pair_count(n);
    assert!(
        k < total,
        "pair index {k} out of range for {n} items ({total} pairs)"
    );

    let l = total - (k + 1);
    let o = ((((1 + 8 * l) as f64).sqrt() - 1.0) / 2.0).floor() as usize;
    let p = l - o * (o + 1) / 2;
    let i = n - (o + 2);
    let j = n - (p + 1);
    (i, j)
}

/// Iterate all `(i, j)` pairs with `i < j < n` in linear-index order.
pub fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..pair_count(n)).map(move |k| pair_from_linear(k, n))
}

/// Score/index pair ordered by score, then index, so heap behavior is
/// deterministic for tied scores.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScoredIndex {
    score: f64,
    index: usize,
}

impl Eq for ScoredIndex {}

impl PartialOrd for ScoredIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Indices of the `k` largest scores, ascending by score.
///
/// Returns an empty vector for `k = 0`; for `k >= scores.len()` every index
/// is returned, still ascending by score. Runs in O(n log k) by keeping a
/// min-heap of the current best `k` entries. Ties are broken by index, so the
/// result is deterministic for any input.
pub fn top_k_indices(scores: &[f64], k: usize) -> Vec<usize> {
    if k == 0 {
        return Vec::new();
    }

    // Min-heap over the retained entries: the root is the weakest survivor.
    let mut heap: BinaryHeap<std::cmp::Reverse<ScoredIndex>> = BinaryHeap::with_capacity(k);

    for (index, &score) in scores.iter().enumerate() {
        let entry = ScoredIndex { score, index };
        if heap.len() < k {
            heap.push(std::cmp::Reverse(entry));
        } else if heap.peek().is_some_and(|weakest| weakest.0 < entry) {
            heap.pop();
            heap.push(std::cmp::Reverse(entry));
        }
    }

    // Popping the min-heap yields the survivors weakest-first, which is
    // exactly the required ascending order.
    let mut result = Vec::with_capacity(heap.len());
    while let Some(std::cmp::Reverse(entry)) = heap.pop() {
        result.push(entry.index);
    }
    result
}

/// A vector of `n` scores drawn uniformly from `[0, 1)`.
///
/// The generator is supplied by the caller so that sampling stays
/// reproducible under a fixed seed.
pub fn random_scores<R: Rng>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| rng.random()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_pair_count() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(5), 10);
    }

    #[test]
    fn test_first_and_last_pair() {
        for n in 2..20 {
            assert_eq!(pair_from_linear(0, n), (0, 1));
            assert_eq!(pair_from_linear(pair_count(n) - 1, n), (n - 2, n - 1));
        }
    }

    #[test]
    fn test_bijectivity() {
        for n in 2..=40 {
            let seen: HashSet<(usize, usize)> = pairs(n).collect();
            assert_eq!(seen.len(), pair_count(n), "duplicates for n = {n}");
            for &(i, j) in &seen {
                assert!(i < j, "expected i < j, got ({i}, {j}) for n = {n}");
                assert!(j < n, "pair ({i}, {j}) out of range for n = {n}");
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        pair_from_linear(10, 5);
    }

    #[test]
    fn test_top_k_documented_case() {
        let scores = [3.0, 1.0, 4.0, 1.5, 9.0];
        assert_eq!(top_k_indices(&scores, 2), vec![2, 4]);
    }

    #[test]
    fn test_top_k_zero_is_empty() {
        assert!(top_k_indices(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_top_k_exceeding_length_returns_all_sorted() {
        let scores = [3.0, 1.0, 4.0];
        assert_eq!(top_k_indices(&scores, 10), vec![1, 0, 2]);
    }

    #[test]
    fn test_top_k_ties_are_deterministic() {
        let scores = [2.0, 2.0, 2.0, 2.0];
        // Equal scores fall back to index order; the largest indices win.
        assert_eq!(top_k_indices(&scores, 2), vec![2, 3]);
        assert_eq!(top_k_indices(&scores, 2), top_k_indices(&scores, 2));
    }

    #[test]
    fn test_top_k_matches_full_sort() {
        let mut rng = StdRng::seed_from_u64(17);
        let scores = random_scores(200, &mut rng);

        let k = 25;
        let fast = top_k_indices(&scores, k);

        let mut slow: Vec<usize> = (0..scores.len()).collect();
        slow.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
        let slow_top: Vec<usize> = slow[scores.len() - k..].to_vec();

        assert_eq!(fast, slow_top);
    }

    #[test]
    fn test_random_scores_are_reproducible() {
        let a = random_scores(16, &mut StdRng::seed_from_u64(7));
        let b = random_scores(16, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|&s| (0.0..1.0).contains(&s)));
    }
}

//! Top-k selection over applicant scores.
//!
//! Ranking is a total order: higher score first, and among equal scores the
//! lower applicant index first. The result is therefore deterministic and
//! independent of the sort algorithm.
use std::cmp::Ordering;

/// Indices of the `k` highest composite scores, best first.
#[must_use]
pub fn top_k(scores: &[f64], k: usize) -> Vec<usize> {
    top_k_with(scores.len(), k, |&a, &b| {
        scores[b].total_cmp(&scores[a]).then(a.cmp(&b))
    })
}

/// Indices of the `k` highest raw attribute scores, best first.
#[must_use]
pub fn top_k_raw(scores: &[u8], k: usize) -> Vec<usize> {
    top_k_with(scores.len(), k, |&a, &b| {
        scores[b].cmp(&scores[a]).then(a.cmp(&b))
    })
}

fn top_k_with<F>(len: usize, k: usize, rank: F) -> Vec<usize>
where
    F: Fn(&usize, &usize) -> Ordering,
{
    let k = k.min(len);
    if k == 0 {
        return Vec::new();
    }
    let mut order: Vec<usize> = (0..len).collect();
    if k < len {
        order.select_nth_unstable_by(k - 1, &rank);
        order.truncate(k);
    }
    order.sort_unstable_by(&rank);
    order
}

/// Number of indices present in both selections.
#[must_use]
pub fn overlap(a: &[usize], b: &[usize]) -> usize {
    let mut left = a.to_vec();
    let mut right = b.to_vec();
    left.sort_unstable();
    left.dedup();
    right.sort_unstable();
    right.dedup();

    let (mut i, mut j, mut shared) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
        }
    }
    shared
}

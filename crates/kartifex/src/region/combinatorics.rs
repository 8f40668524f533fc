//! Bounded enumeration helpers for the clip graph.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Every way of picking one element from each list, in lexicographic order.
///
/// If there would be more than `max` combinations, only the first (picking
/// the first element of every list) is returned.
pub fn combinations<T: Clone>(lists: &[Vec<T>], max: usize) -> Vec<Vec<T>> {
    if lists.iter().any(Vec::is_empty) {
        return Vec::new();
    }
    let count = lists
        .iter()
        .try_fold(1usize, |acc, l| acc.checked_mul(l.len()))
        .unwrap_or(usize::MAX);
    if count > max {
        return vec![lists.iter().map(|l| l[0].clone()).collect()];
    }

    let mut result = Vec::with_capacity(count);
    let mut indices = vec![0usize; lists.len()];
    loop {
        result.push(indices.iter().zip(lists).map(|(&i, l)| l[i].clone()).collect());
        // odometer increment, last position fastest
        let mut pos = lists.len();
        loop {
            if pos == 0 {
                return result;
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < lists[pos].len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}

/// All orderings of `items` if there are at most `max`, otherwise `max`
/// shuffles drawn from `rng`.
pub fn permutations<T: Clone>(items: &[T], max: usize, rng: &mut StdRng) -> Vec<Vec<T>> {
    let count = (1..=items.len()).try_fold(1usize, |acc, k| acc.checked_mul(k));
    match count {
        Some(n) if n <= max => heap_permutations(items),
        _ => (0..max)
            .map(|_| {
                let mut v = items.to_vec();
                v.shuffle(rng);
                v
            })
            .collect(),
    }
}

/// Heap's algorithm, iterative.
fn heap_permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let mut v = items.to_vec();
    let mut c = vec![0usize; v.len()];
    let mut result = vec![v.clone()];
    let mut i = 1;
    while i < v.len() {
        if c[i] < i {
            if i % 2 == 0 {
                v.swap(0, i);
            } else {
                v.swap(c[i], i);
            }
            result.push(v.clone());
            c[i] += 1;
            i = 1;
        } else {
            c[i] = 0;
            i += 1;
        }
    }
    result
}

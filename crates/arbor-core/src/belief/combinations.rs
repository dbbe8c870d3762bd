//! Index combinations over a pool of unseen cards.

use rand::Rng;
use rand::seq::index;

/// `n choose k`, saturating at `u64::MAX`. Zero when `k > n`.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for step in 0..k {
        acc = acc * (n - step) as u128 / (step + 1) as u128;
        if acc > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    acc as u64
}

/// Calls `visit` once for every size-`k` subset of `0..n`, in lexicographic
/// order. A size-zero subset is visited exactly once; nothing is visited when
/// `k > n`.
pub fn for_each_combination<F>(n: usize, k: usize, mut visit: F)
where
    F: FnMut(&[usize]),
{
    if k > n {
        return;
    }
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        visit(&indices);

        // Rightmost position that can still move forward.
        let mut pos = k;
        while pos > 0 {
            pos -= 1;
            if indices[pos] != pos + n - k {
                break;
            }
            if pos == 0 {
                return;
            }
        }
        if k == 0 {
            return;
        }
        indices[pos] += 1;
        for next in pos + 1..k {
            indices[next] = indices[next - 1] + 1;
        }
    }
}

/// Calls `visit` for `samples` uniformly drawn size-`k` subsets of `0..n`.
pub fn for_each_sampled_combination<R, F>(
    n: usize,
    k: usize,
    samples: usize,
    rng: &mut R,
    mut visit: F,
) where
    R: Rng + ?Sized,
    F: FnMut(&[usize]),
{
    if k > n {
        return;
    }
    let mut scratch = Vec::with_capacity(k);
    for _ in 0..samples {
        scratch.clear();
        scratch.extend(index::sample(rng, n, k).iter());
        visit(&scratch);
    }
}

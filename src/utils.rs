#[inline(always)]
pub fn from_2d_to_1d(ncol: usize, row: usize, col: usize) -> usize {
    row * ncol + col
}

#[inline(always)]
pub fn from_1d_to_2d(ncol: usize, pos: usize) -> (usize, usize) {
    (pos / ncol, pos % ncol)
}

/// Picks an index of `weights` using `random` in `[0, 1)`.
///
/// Weights are scaled by their total mass, so lists that do not sum to one
/// are sampled proportionally. Non-positive weights are never picked, and
/// `None` is returned when no weight is positive.
#[inline(always)]
pub fn categorical_sample(weights: &[f64], random: f64) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if !(total > 0.0) {
        return None;
    }
    let target: f64 = random * total;
    let mut acc: f64 = 0.0;
    let mut last: Option<usize> = None;
    for (i, w) in weights.iter().enumerate() {
        if *w <= 0.0 {
            continue;
        }
        acc += w;
        last = Some(i);
        if acc > target {
            return Some(i);
        }
    }
    // rounding can leave `acc` a hair under `target` when random is near 1
    last
}

#[inline(always)]
pub fn euclidean_distance(a: (usize, usize), b: (usize, usize)) -> f64 {
    let dr = a.0 as f64 - b.0 as f64;
    let dc = a.1 as f64 - b.1 as f64;
    (dr * dr + dc * dc).sqrt()
}

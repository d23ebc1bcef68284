//! Position-weighted edit distance over aligned token sequences.

/// Logistic decay `1 / (1 + exp(scale * x - nu))`.
///
/// With `nu = 0`, `scale = 1` the weight at position 1 is roughly `0.269`
/// and halves every position or so; raising `nu` shifts the knee towards
/// later positions.
pub fn logistic_decrease(x: f64, nu: f64, scale: f64) -> f64 {
    1.0 / (1.0 + (scale * x - nu).exp())
}

/// Sum of `inner(lhs_k, rhs_k) * weight(k)` over aligned token positions.
///
/// The two sequences are walked in lock step; the 1-based position counter
/// is incremented before each weight lookup. When one side runs out, the
/// walk continues against default (empty) elements until the other side
/// ends, the counter still advancing. No normalization is applied; callers
/// control the cutoff scale.
pub fn weighted_edit_distance<L, R, T, D, W>(lhs: L, rhs: R, mut inner: D, mut weight: W) -> f64
where
    L: Iterator<Item = T>,
    R: Iterator<Item = T>,
    T: Default,
    D: FnMut(&T, &T) -> f64,
    W: FnMut(usize) -> f64,
{
    let mut lhs = lhs.fuse();
    let mut rhs = rhs.fuse();
    let mut total = 0.0;
    let mut position = 0usize;
    loop {
        let (left, right) = match (lhs.next(), rhs.next()) {
            (None, None) => break,
            (left, right) => (left.unwrap_or_default(), right.unwrap_or_default()),
        };
        position += 1;
        total += inner(&left, &right) * weight(position);
    }
    total
}

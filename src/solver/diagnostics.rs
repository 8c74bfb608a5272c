use crate::state::idx;

/// Sum of a scalar field over interior cells.
pub fn total(x: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            sum += x[idx(i, j, n)];
        }
    }
    sum
}

/// Largest |div v| over interior cells, using the same central differences
/// as the projection.
pub fn max_divergence(vx: &[f64], vy: &[f64], n: usize, h: f64) -> f64 {
    let mut max = 0.0_f64;
    for j in 1..=n {
        for i in 1..=n {
            let d = 0.5
                * (vx[idx(i + 1, j, n)] - vx[idx(i - 1, j, n)]
                    + vy[idx(i, j + 1, n)] - vy[idx(i, j - 1, n)])
                / h;
            max = max.max(d.abs());
        }
    }
    max
}

/// Compute volume-averaged kinetic energy: KE = 0.5 * <vx² + vy²>.
pub fn kinetic_energy(vx: &[f64], vy: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            sum += vx[ii] * vx[ii] + vy[ii] * vy[ii];
        }
    }
    0.5 * sum / (n * n) as f64
}

/// (min, max) over interior cells.
pub fn field_range(x: &[f64], n: usize) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for j in 1..=n {
        for i in 1..=n {
            let v = x[idx(i, j, n)];
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    (lo, hi)
}

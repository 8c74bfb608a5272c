use crate::state::idx;
use super::boundary::{set_bnd, FieldType};

/// x += dt * s over every cell.
pub fn add_source(x: &mut [f64], s: &[f64], dt: f64) {
    for (xi, si) in x.iter_mut().zip(s) {
        *xi += dt * si;
    }
}

/// Gauss-Seidel iterative linear solver.
/// Solves: x[i,j] = (x0[i,j] + a * (neighbors)) / c
pub fn lin_solve(field_type: FieldType, x: &mut [f64], x0: &[f64], a: f64, c: f64, iter: usize, n: usize) {
    let c_inv = 1.0 / c;
    for _ in 0..iter {
        for j in 1..=n {
            for i in 1..=n {
                let neighbors = x[idx(i - 1, j, n)]
                    + x[idx(i + 1, j, n)]
                    + x[idx(i, j - 1, n)]
                    + x[idx(i, j + 1, n)];
                x[idx(i, j, n)] = (x0[idx(i, j, n)] + a * neighbors) * c_inv;
            }
        }
        set_bnd(field_type, x, n);
    }
}

/// Implicit diffusion with a per-cell coefficient.
/// a = dt * k[i,j] * (N / L)^2, c = 1 + 4a, relaxed for `iter` sweeps.
///
/// `coeff` is filled by the caller (see `mixed::fill_coefficients`), so the
/// sweep itself never branches on how the coefficient was obtained. Too few
/// sweeps under-diffuses; nothing downstream corrects for it.
#[allow(clippy::too_many_arguments)]
pub fn diffuse(
    field_type: FieldType,
    x: &mut [f64],
    x0: &[f64],
    coeff: &[f64],
    dt: f64,
    iter: usize,
    n: usize,
    cells_per_metre: f64,
) {
    let scale = dt * cells_per_metre * cells_per_metre;
    // Initialize x from x0
    x.copy_from_slice(x0);
    for _ in 0..iter {
        for j in 1..=n {
            for i in 1..=n {
                let ii = idx(i, j, n);
                let a = scale * coeff[ii];
                let neighbors = x[idx(i - 1, j, n)]
                    + x[idx(i + 1, j, n)]
                    + x[idx(i, j - 1, n)]
                    + x[idx(i, j + 1, n)];
                x[ii] = (x0[ii] + a * neighbors) / (1.0 + 4.0 * a);
            }
        }
        set_bnd(field_type, x, n);
    }
}

/// Semi-Lagrangian advection: traces each cell backwards through the velocity field.
#[allow(clippy::too_many_arguments)]
pub fn advect(
    field_type: FieldType,
    d: &mut [f64],
    d0: &[f64],
    vx: &[f64],
    vy: &[f64],
    dt: f64,
    n: usize,
    cells_per_metre: f64,
) {
    let dt0 = dt * cells_per_metre;
    let lo = 0.5;
    let hi = n as f64 + 0.5;

    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            // Trace backwards, clamped to interior plus half the boundary ring
            let x = (i as f64 - dt0 * vx[ii]).clamp(lo, hi);
            let y = (j as f64 - dt0 * vy[ii]).clamp(lo, hi);

            let i0 = x.floor() as usize;
            let i1 = i0 + 1;
            let j0 = y.floor() as usize;
            let j1 = j0 + 1;
            let s1 = x - i0 as f64;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f64;
            let t0 = 1.0 - t1;

            d[ii] = s0 * (t0 * d0[idx(i0, j0, n)] + t1 * d0[idx(i0, j1, n)])
                + s1 * (t0 * d0[idx(i1, j0, n)] + t1 * d0[idx(i1, j1, n)]);
        }
    }
    set_bnd(field_type, d, n);
}

/// Pressure projection: enforces incompressibility (divergence-free velocity field).
/// `h` is the grid spacing in metres. Accuracy is bounded by `iter`.
pub fn project(vx: &mut [f64], vy: &mut [f64], p: &mut [f64], div: &mut [f64], iter: usize, n: usize, h: f64) {
    // Calculate divergence
    for j in 1..=n {
        for i in 1..=n {
            div[idx(i, j, n)] = -0.5
                * h
                * (vx[idx(i + 1, j, n)] - vx[idx(i - 1, j, n)]
                    + vy[idx(i, j + 1, n)] - vy[idx(i, j - 1, n)]);
            p[idx(i, j, n)] = 0.0;
        }
    }
    set_bnd(FieldType::Scalar, div, n);
    set_bnd(FieldType::Scalar, p, n);

    // Solve for pressure
    lin_solve(FieldType::Scalar, p, div, 1.0, 4.0, iter, n);

    // Subtract pressure gradient from velocity
    for j in 1..=n {
        for i in 1..=n {
            vx[idx(i, j, n)] -= 0.5 * (p[idx(i + 1, j, n)] - p[idx(i - 1, j, n)]) / h;
            vy[idx(i, j, n)] -= 0.5 * (p[idx(i, j + 1, n)] - p[idx(i, j - 1, n)]) / h;
        }
    }
    set_bnd(FieldType::Vx, vx, n);
    set_bnd(FieldType::Vy, vy, n);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::diagnostics::max_divergence;
    use crate::state::grid_size;

    const N: usize = 32;
    const CPM: f64 = N as f64;

    /// Gaussian source/sink velocity field with plenty of divergence.
    fn radial_flow() -> (Vec<f64>, Vec<f64>) {
        let mut vx = vec![0.0; grid_size(N)];
        let mut vy = vec![0.0; grid_size(N)];
        let c = (N / 2) as f64;
        let sigma = (N * N) as f64 / 32.0;
        for j in 1..=N {
            for i in 1..=N {
                let dx = i as f64 - c;
                let dy = j as f64 - c;
                let g = (-(dx * dx + dy * dy) / sigma).exp();
                vx[idx(i, j, N)] = dx * 0.01 * g;
                vy[idx(i, j, N)] = dy * 0.01 * g;
            }
        }
        set_bnd(FieldType::Vx, &mut vx, N);
        set_bnd(FieldType::Vy, &mut vy, N);
        (vx, vy)
    }

    #[test]
    fn test_add_source_scales_by_dt() {
        let mut x = vec![1.0; 4];
        add_source(&mut x, &[2.0, 0.0, -1.0, 4.0], 0.5);
        assert_eq!(x, vec![2.0, 1.0, 0.5, 3.0]);
    }

    #[test]
    fn test_lin_solve_converges() {
        let mut x = vec![0.0; grid_size(N)];
        let mut x0 = vec![0.0; grid_size(N)];
        let mid = N / 2;
        x0[idx(mid, mid, N)] = 100.0;
        x.copy_from_slice(&x0);

        lin_solve(FieldType::Scalar, &mut x, &x0, 1.0, 5.0, 20, N);

        let center = x[idx(mid, mid, N)];
        let neighbor = x[idx(mid + 1, mid, N)];
        assert!(center > 0.0, "Center should still be positive");
        assert!(neighbor > 0.0, "Neighbors should get some value");
        assert!(center > neighbor, "Center should be larger than neighbor");
    }

    #[test]
    fn test_diffuse_smooths() {
        let mut x0 = vec![0.0; grid_size(N)];
        let mut x = vec![0.0; grid_size(N)];
        let coeff = vec![1e-3; grid_size(N)];
        let mid = N / 2;
        x0[idx(mid, mid, N)] = 100.0;

        diffuse(FieldType::Scalar, &mut x, &x0, &coeff, 0.1, 20, N, CPM);

        let center = x[idx(mid, mid, N)];
        let neighbor = x[idx(mid + 1, mid, N)];
        assert!(center < 100.0, "Center should be less than original spike");
        assert!(neighbor > 0.0, "Neighbors should gain some value");
    }

    #[test]
    fn test_diffuse_zero_coefficient_is_identity() {
        let mut x0 = vec![0.0; grid_size(N)];
        let mut x = vec![0.0; grid_size(N)];
        let coeff = vec![0.0; grid_size(N)];
        for j in 1..=N {
            for i in 1..=N {
                x0[idx(i, j, N)] = (i * j) as f64;
            }
        }
        diffuse(FieldType::Scalar, &mut x, &x0, &coeff, 0.1, 20, N, CPM);
        for j in 1..=N {
            for i in 1..=N {
                assert_eq!(x[idx(i, j, N)], x0[idx(i, j, N)]);
            }
        }
    }

    #[test]
    fn test_diffuse_variable_coefficient_spreads_more_where_larger() {
        let mut x0 = vec![0.0; grid_size(N)];
        let mut x = vec![0.0; grid_size(N)];
        let mut coeff = vec![1e-4; grid_size(N)];
        // Left spike sits in a region with ten times the diffusivity
        for j in 1..=N {
            for i in 1..=N / 2 {
                coeff[idx(i, j, N)] = 1e-3;
            }
        }
        x0[idx(8, 16, N)] = 100.0;
        x0[idx(24, 16, N)] = 100.0;

        diffuse(FieldType::Scalar, &mut x, &x0, &coeff, 0.1, 20, N, CPM);

        assert!(
            x[idx(8, 16, N)] < x[idx(24, 16, N)],
            "Spike in the high-diffusivity half should flatten more: {} vs {}",
            x[idx(8, 16, N)],
            x[idx(24, 16, N)]
        );
    }

    #[test]
    fn test_advect_zero_velocity_preserves() {
        let mut d0 = vec![0.0; grid_size(N)];
        let mut d = vec![0.0; grid_size(N)];
        let vx = vec![0.0; grid_size(N)];
        let vy = vec![0.0; grid_size(N)];

        for j in 1..=N {
            for i in 1..=N {
                d0[idx(i, j, N)] = i as f64 / N as f64;
            }
        }

        advect(FieldType::Scalar, &mut d, &d0, &vx, &vy, 0.1, N, CPM);

        for j in 1..=N {
            for i in 1..=N {
                let orig = d0[idx(i, j, N)];
                let advected = d[idx(i, j, N)];
                assert!(
                    (orig - advected).abs() < 1e-10,
                    "Zero velocity should preserve field at ({}, {}): {} vs {}",
                    i, j, orig, advected
                );
            }
        }
    }

    #[test]
    fn test_advect_uniform_field_unchanged() {
        let d0 = vec![5.0; grid_size(N)];
        let mut d = vec![0.0; grid_size(N)];
        let vx = vec![0.01; grid_size(N)];
        let vy = vec![0.01; grid_size(N)];

        advect(FieldType::Scalar, &mut d, &d0, &vx, &vy, 0.1, N, CPM);

        for j in 1..=N {
            for i in 1..=N {
                let val = d[idx(i, j, N)];
                assert!(
                    (val - 5.0).abs() < 1e-9,
                    "Uniform field should stay uniform: got {} at ({}, {})",
                    val, i, j
                );
            }
        }
    }

    #[test]
    fn test_advect_shifts_by_whole_cell() {
        // dt * cpm * vx = 1 cell to the right
        let mut d0 = vec![0.0; grid_size(N)];
        let mut d = vec![0.0; grid_size(N)];
        let vx = vec![1.0 / CPM; grid_size(N)];
        let vy = vec![0.0; grid_size(N)];
        d0[idx(10, 10, N)] = 1.0;

        advect(FieldType::Scalar, &mut d, &d0, &vx, &vy, 1.0, N, CPM);

        assert!((d[idx(11, 10, N)] - 1.0).abs() < 1e-12, "Blob should move one cell right");
        assert!(d[idx(10, 10, N)].abs() < 1e-12, "Old position should be empty");
    }

    #[test]
    fn test_advect_huge_velocity_clamps_inside() {
        let d0 = vec![1.0; grid_size(N)];
        let mut d = vec![0.0; grid_size(N)];
        let vx = vec![1e6; grid_size(N)];
        let vy = vec![-1e6; grid_size(N)];

        advect(FieldType::Scalar, &mut d, &d0, &vx, &vy, 10.0, N, CPM);

        for j in 1..=N {
            for i in 1..=N {
                let val = d[idx(i, j, N)];
                assert!((val - 1.0).abs() < 1e-12, "Clamped trace should stay in bounds, got {} at ({},{})", val, i, j);
            }
        }
    }

    #[test]
    fn test_project_reduces_divergence() {
        let (mut vx, mut vy) = radial_flow();
        let mut p = vec![0.0; grid_size(N)];
        let mut div = vec![0.0; grid_size(N)];
        let h = 1.0 / N as f64;

        let div_before = max_divergence(&vx, &vy, N, h);
        assert!(div_before > 0.0, "Should have some initial divergence");

        project(&mut vx, &mut vy, &mut p, &mut div, 40, N, h);

        let div_after = max_divergence(&vx, &vy, N, h);
        assert!(
            div_after < div_before,
            "Divergence should be reduced: before={}, after={}",
            div_before, div_after
        );
    }

    #[test]
    fn test_project_more_iterations_less_divergence() {
        let h = 1.0 / N as f64;
        let mut last = f64::INFINITY;
        for iter in [5, 20, 80] {
            let (mut vx, mut vy) = radial_flow();
            let mut p = vec![0.0; grid_size(N)];
            let mut div = vec![0.0; grid_size(N)];
            project(&mut vx, &mut vy, &mut p, &mut div, iter, N, h);
            let d = max_divergence(&vx, &vy, N, h);
            assert!(d < last, "Divergence should shrink with iterations: {} sweeps gave {}, previous {}", iter, d, last);
            last = d;
        }
    }

    #[test]
    fn test_project_keeps_divergence_free_field() {
        // Uniform flow has zero discrete divergence away from walls
        let mut vx = vec![0.0; grid_size(N)];
        let mut vy = vec![0.0; grid_size(N)];
        let mut p = vec![0.0; grid_size(N)];
        let mut div = vec![0.0; grid_size(N)];
        project(&mut vx, &mut vy, &mut p, &mut div, 20, N, 1.0 / N as f64);
        assert!(vx.iter().chain(vy.iter()).all(|&v| v == 0.0));
    }
}

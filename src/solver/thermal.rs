use crate::state::idx;
use super::boundary::{set_bnd, FieldType};
use super::mixed::mixture_density;
use super::SimParams;

/// Apply buoyancy force: light (hot or low-molar-mass) mixture rises, heavy sinks.
/// Upward acceleration is g * (rho_air - rho_mix) / rho_air. Rows grow downward,
/// so rising means `vy` decreases.
pub fn convect(vy: &mut [f64], dens: &[f64], temp: &[f64], params: &SimParams, dt: f64, n: usize) {
    if !params.gravity_on || params.air_dens <= 0.0 {
        return;
    }
    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            let rho = mixture_density(dens[ii], temp[ii], params);
            let lift = params.grav * (params.air_dens - rho) / params.air_dens;
            vy[ii] -= dt * lift;
        }
    }
    set_bnd(FieldType::Vy, vy, n);
}

/// Exponential relaxation of every interior cell toward `ambient`.
pub fn dissipate(field_type: FieldType, x: &mut [f64], rate: f64, ambient: f64, dt: f64, n: usize) {
    let keep = (-rate * dt).exp();
    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            x[ii] = ambient + (x[ii] - ambient) * keep;
        }
    }
    set_bnd(field_type, x, n);
}

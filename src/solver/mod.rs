pub mod boundary;
pub mod core;
pub mod diagnostics;
pub mod mixed;
mod params;
pub mod thermal;

// Re-export public API
pub use boundary::{set_bnd, FieldType};
pub use mixed::{
    adjusted_mass_diffusivity, adjusted_thermal_diffusivity, adjusted_viscosity, mixed_density,
    mixed_density_at_air_temp, mixed_temperature, Coefficient,
};
pub use params::SimParams;

use std::mem::swap;

use crate::error::{Result, SimError};
use crate::state::SimState;
use self::core::{add_source, advect, diffuse, project};
use mixed::fill_coefficients;
use thermal::{convect, dissipate};

/// Full simulation step: velocity, density, then temperature.
///
/// Source buffers are consumed and cleared, so they only last one step.
/// Fails fast on a non-positive or non-finite `dt` without touching state.
pub fn simulation_step(state: &mut SimState, dt: f64) -> Result<()> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SimError::InvalidTimeStep { dt });
    }

    velocity_step(state, dt);
    density_step(state, dt);
    if state.params.temperature_on {
        temperature_step(state, dt);
    }
    state.fields.clear_sources();

    if log::log_enabled!(log::Level::Debug) {
        let n = state.n();
        let h = state.params.length_scale / n as f64;
        let f = &state.fields;
        log::debug!(
            "step dt={dt} mass={:.6e} KE={:.6e} max|div|={:.3e}",
            diagnostics::total(&f.dens, n),
            diagnostics::kinetic_energy(&f.x_vel, &f.y_vel, n),
            diagnostics::max_divergence(&f.x_vel, &f.y_vel, n, h),
        );
    }
    Ok(())
}

/// Velocity update: diffuse, project, self-advect, buoyancy, project again.
pub fn velocity_step(state: &mut SimState, dt: f64) {
    let n = state.n();
    let iter = state.params.solver_steps;
    let cpm = state.params.cells_per_metre(n);
    let h = 1.0 / cpm;

    fill_coefficients(Coefficient::Viscosity, &state.params, &state.fields, &mut state.coeff);
    let f = &mut state.fields;

    // 1. Add forcing
    add_source(&mut f.x_vel, &f.x_vel_source, dt);
    add_source(&mut f.y_vel, &f.y_vel_source, dt);

    // 2. Diffuse velocity
    swap(&mut f.x_vel, &mut f.x_vel_prev);
    swap(&mut f.y_vel, &mut f.y_vel_prev);
    diffuse(FieldType::Vx, &mut f.x_vel, &f.x_vel_prev, &state.coeff, dt, iter, n, cpm);
    diffuse(FieldType::Vy, &mut f.y_vel, &f.y_vel_prev, &state.coeff, dt, iter, n, cpm);

    // 3. Project so the advecting field is divergence-free
    project(&mut f.x_vel, &mut f.y_vel, &mut f.x_vel_prev, &mut f.y_vel_prev, iter, n, h);

    // 4. Advect velocity through itself
    swap(&mut f.x_vel, &mut f.x_vel_prev);
    swap(&mut f.y_vel, &mut f.y_vel_prev);
    advect(FieldType::Vx, &mut f.x_vel, &f.x_vel_prev, &f.x_vel_prev, &f.y_vel_prev, dt, n, cpm);
    advect(FieldType::Vy, &mut f.y_vel, &f.y_vel_prev, &f.x_vel_prev, &f.y_vel_prev, dt, n, cpm);

    // 5. Buoyancy from the current density/temperature
    convect(&mut f.y_vel, &f.dens, &f.temp, &state.params, dt, n);

    // 6. Project again; advection and buoyancy reintroduce divergence
    project(&mut f.x_vel, &mut f.y_vel, &mut f.x_vel_prev, &mut f.y_vel_prev, iter, n, h);
}

/// Density update: add source, diffuse, advect with the final velocity, decay.
pub fn density_step(state: &mut SimState, dt: f64) {
    let n = state.n();
    let iter = state.params.solver_steps;
    let cpm = state.params.cells_per_metre(n);

    fill_coefficients(Coefficient::MassDiffusivity, &state.params, &state.fields, &mut state.coeff);
    let f = &mut state.fields;

    add_source(&mut f.dens, &f.dens_source, dt);
    swap(&mut f.dens, &mut f.dens_prev);
    diffuse(FieldType::Scalar, &mut f.dens, &f.dens_prev, &state.coeff, dt, iter, n, cpm);
    swap(&mut f.dens, &mut f.dens_prev);
    advect(FieldType::Scalar, &mut f.dens, &f.dens_prev, &f.x_vel, &f.y_vel, dt, n, cpm);

    if state.params.dens_decay > 0.0 {
        dissipate(FieldType::Scalar, &mut f.dens, state.params.dens_decay, 0.0, dt, n);
    }
}

/// Temperature update, same shape as density. The field is the excess over
/// ambient, so dissipation relaxes it toward zero.
pub fn temperature_step(state: &mut SimState, dt: f64) {
    let n = state.n();
    let iter = state.params.solver_steps;
    let cpm = state.params.cells_per_metre(n);

    fill_coefficients(Coefficient::ThermalDiffusivity, &state.params, &state.fields, &mut state.coeff);
    let f = &mut state.fields;

    add_source(&mut f.temp, &f.temp_source, dt);
    swap(&mut f.temp, &mut f.temp_prev);
    diffuse(FieldType::Scalar, &mut f.temp, &f.temp_prev, &state.coeff, dt, iter, n, cpm);
    swap(&mut f.temp, &mut f.temp_prev);
    advect(FieldType::Scalar, &mut f.temp, &f.temp_prev, &f.x_vel, &f.y_vel, dt, n, cpm);

    if state.params.temp_decay > 0.0 {
        dissipate(FieldType::Scalar, &mut f.temp, state.params.temp_decay, 0.0, dt, n);
    }
}

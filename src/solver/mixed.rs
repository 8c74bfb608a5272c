//! Effective ("mixed") air/gas state per cell and the state-dependent
//! transport coefficients derived from it.
//!
//! The density field is the partial density of the emitted gas and the
//! temperature field is the excess over `air_temp`; these functions fold
//! both back into the ambient constants with an ideal-gas density law.

use crate::state::SimFields;
use super::SimParams;

/// Floor on absolute temperature so the ideal-gas ratio stays finite.
pub const MIN_TEMPERATURE: f64 = 1.0;

/// Temperature exponents for the adjusted coefficients.
const VISCOSITY_EXPONENT: f64 = 0.7;
const MASS_DIFFUSIVITY_EXPONENT: f64 = 1.75;
const THERMAL_CONDUCTIVITY_EXPONENT: f64 = 0.8;

/// Which transport coefficient a diffusion pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coefficient {
    Viscosity,
    MassDiffusivity,
    ThermalDiffusivity,
}

impl Coefficient {
    /// Uniform value from the parameters.
    pub fn base(self, params: &SimParams) -> f64 {
        match self {
            Coefficient::Viscosity => params.visc,
            Coefficient::MassDiffusivity => params.diff,
            Coefficient::ThermalDiffusivity => params.diff_temp,
        }
    }

    /// Value at cell `ind`, adjusted for local state when enabled.
    pub fn at(self, ind: usize, params: &SimParams, fields: &SimFields) -> f64 {
        match self {
            Coefficient::Viscosity => adjusted_viscosity(ind, params, fields),
            Coefficient::MassDiffusivity => adjusted_mass_diffusivity(ind, params, fields),
            Coefficient::ThermalDiffusivity => adjusted_thermal_diffusivity(ind, params, fields),
        }
    }
}

/// Fill `out` with one coefficient per cell, ready for `core::diffuse`.
pub fn fill_coefficients(kind: Coefficient, params: &SimParams, fields: &SimFields, out: &mut [f64]) {
    if params.advanced_coefficients {
        for (ind, k) in out.iter_mut().enumerate() {
            *k = kind.at(ind, params, fields);
        }
    } else {
        out.fill(kind.base(params));
    }
}

/// Volume fraction of gas at ambient temperature for partial density `dens`, in `[0, 1]`.
fn gas_fraction(dens: f64, params: &SimParams) -> f64 {
    let pure_gas = params.air_dens * params.mass_ratio;
    if pure_gas <= 0.0 {
        return 0.0;
    }
    (dens / pure_gas).clamp(0.0, 1.0)
}

fn density_at_air_temp(dens: f64, params: &SimParams) -> f64 {
    params.air_dens * (1.0 + gas_fraction(dens, params) * (params.mass_ratio - 1.0))
}

/// Absolute temperature for a temperature excess `temp` (K).
pub fn mixture_temperature(temp: f64, params: &SimParams) -> f64 {
    if params.temperature_on {
        (params.air_temp + temp).max(MIN_TEMPERATURE)
    } else {
        params.air_temp
    }
}

/// Mixture density for gas partial density `dens` and temperature excess `temp`.
pub fn mixture_density(dens: f64, temp: f64, params: &SimParams) -> f64 {
    density_at_air_temp(dens, params) * (params.air_temp / mixture_temperature(temp, params))
}

/// Density of the air/gas mixture if it were at `air_temp`.
pub fn mixed_density_at_air_temp(ind: usize, params: &SimParams, fields: &SimFields) -> f64 {
    density_at_air_temp(fields.dens[ind], params)
}

/// Absolute temperature of the mixture (K).
pub fn mixed_temperature(ind: usize, params: &SimParams, fields: &SimFields) -> f64 {
    mixture_temperature(fields.temp[ind], params)
}

/// Density of the mixture at its actual temperature (constant pressure).
pub fn mixed_density(ind: usize, params: &SimParams, fields: &SimFields) -> f64 {
    mixture_density(fields.dens[ind], fields.temp[ind], params)
}

fn temperature_ratio(ind: usize, params: &SimParams, fields: &SimFields) -> f64 {
    mixed_temperature(ind, params, fields) / params.air_temp
}

/// Kinematic viscosity: Sutherland-style dynamic viscosity over mixture density.
pub fn adjusted_viscosity(ind: usize, params: &SimParams, fields: &SimFields) -> f64 {
    if !params.advanced_coefficients {
        return params.visc;
    }
    let t = temperature_ratio(ind, params, fields);
    params.visc * t.powf(VISCOSITY_EXPONENT) * params.air_dens / mixed_density(ind, params, fields)
}

/// Binary gas diffusivity, growing with temperature at constant pressure.
pub fn adjusted_mass_diffusivity(ind: usize, params: &SimParams, fields: &SimFields) -> f64 {
    if !params.advanced_coefficients {
        return params.diff;
    }
    params.diff * temperature_ratio(ind, params, fields).powf(MASS_DIFFUSIVITY_EXPONENT)
}

/// Thermal diffusivity k / (rho cp) with conductivity rising with temperature.
pub fn adjusted_thermal_diffusivity(ind: usize, params: &SimParams, fields: &SimFields) -> f64 {
    if !params.advanced_coefficients {
        return params.diff_temp;
    }
    let t = temperature_ratio(ind, params, fields);
    params.diff_temp * t.powf(THERMAL_CONDUCTIVITY_EXPONENT) * params.air_dens / mixed_density(ind, params, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::grid_size;

    fn fields_with(dens: f64, temp: f64) -> SimFields {
        let mut f = SimFields::new(grid_size(2));
        f.dens[5] = dens;
        f.temp[5] = temp;
        f
    }

    #[test]
    fn test_ambient_cell_is_air() {
        let p = SimParams::default();
        let f = fields_with(0.0, 0.0);
        assert!((mixed_density(5, &p, &f) - p.air_dens).abs() < 1e-12);
        assert!((mixed_temperature(5, &p, &f) - p.air_temp).abs() < 1e-12);
    }

    #[test]
    fn test_heavy_gas_raises_density() {
        let p = SimParams::default().with_buoyancy(9.81, 1.2, 1.5);
        let f = fields_with(0.6, 0.0);
        // phi = 0.6 / 1.8 = 1/3 -> 1.2 * (1 + 0.5/3) = 1.4
        let rho = mixed_density_at_air_temp(5, &p, &f);
        assert!((rho - 1.4).abs() < 1e-12, "rho={}", rho);
    }

    #[test]
    fn test_gas_fraction_saturates() {
        let p = SimParams::default().with_buoyancy(9.81, 1.0, 2.0);
        let f = fields_with(100.0, 0.0);
        assert!((mixed_density_at_air_temp(5, &p, &f) - 2.0).abs() < 1e-12, "pure gas density is air * ratio");
    }

    #[test]
    fn test_hot_cell_is_lighter() {
        let p = SimParams::default();
        let f = fields_with(0.0, 50.0);
        let rho = mixed_density(5, &p, &f);
        let expected = p.air_dens * p.air_temp / (p.air_temp + 50.0);
        assert!((rho - expected).abs() < 1e-12);
        assert!(rho < p.air_dens);
    }

    #[test]
    fn test_temperature_off_ignores_field() {
        let mut p = SimParams::default();
        p.temperature_on = false;
        let f = fields_with(0.0, 80.0);
        assert_eq!(mixed_temperature(5, &p, &f), p.air_temp);
    }

    #[test]
    fn test_temperature_floor() {
        let p = SimParams::default();
        let f = fields_with(0.0, -1e6);
        assert_eq!(mixed_temperature(5, &p, &f), MIN_TEMPERATURE);
        assert!(mixed_density(5, &p, &f).is_finite());
    }

    #[test]
    fn test_adjusted_equals_base_when_disabled() {
        let p = SimParams::default();
        let f = fields_with(0.3, 120.0);
        assert_eq!(adjusted_viscosity(5, &p, &f), p.visc);
        assert_eq!(adjusted_mass_diffusivity(5, &p, &f), p.diff);
        assert_eq!(adjusted_thermal_diffusivity(5, &p, &f), p.diff_temp);
    }

    #[test]
    fn test_adjusted_equals_base_at_ambient() {
        let mut p = SimParams::default();
        p.advanced_coefficients = true;
        let f = fields_with(0.0, 0.0);
        assert!((adjusted_viscosity(5, &p, &f) - p.visc).abs() < 1e-18);
        assert!((adjusted_mass_diffusivity(5, &p, &f) - p.diff).abs() < 1e-18);
        assert!((adjusted_thermal_diffusivity(5, &p, &f) - p.diff_temp).abs() < 1e-18);
    }

    #[test]
    fn test_hot_cells_diffuse_faster() {
        let mut p = SimParams::default();
        p.advanced_coefficients = true;
        let f = fields_with(0.0, 100.0);
        assert!(adjusted_viscosity(5, &p, &f) > p.visc);
        assert!(adjusted_mass_diffusivity(5, &p, &f) > p.diff);
        assert!(adjusted_thermal_diffusivity(5, &p, &f) > p.diff_temp);
    }

    #[test]
    fn test_fill_coefficients_uniform_and_adjusted() {
        let mut p = SimParams::default();
        let f = fields_with(0.0, 100.0);
        let mut out = vec![0.0; grid_size(2)];

        fill_coefficients(Coefficient::MassDiffusivity, &p, &f, &mut out);
        assert!(out.iter().all(|&k| k == p.diff));

        p.advanced_coefficients = true;
        fill_coefficients(Coefficient::MassDiffusivity, &p, &f, &mut out);
        assert!(out[5] > p.diff, "hot cell should get a larger coefficient");
        assert!((out[0] - p.diff).abs() < 1e-18, "ambient cell keeps the base value");
    }
}

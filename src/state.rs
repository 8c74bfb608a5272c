use crate::error::{Result, SimError};
use crate::solver::{self, SimParams};

/// Linear offset of cell `(i, j)` on a grid with `n` interior cells per side.
/// `i` is the column (x), `j` the row (y); both range over `0..=n + 1`,
/// with 0 and `n + 1` being the boundary ring.
#[inline(always)]
pub const fn idx(i: usize, j: usize, n: usize) -> usize {
    i + (n + 2) * j
}

/// Total cell count, boundary ring included.
pub const fn grid_size(n: usize) -> usize {
    (n + 2) * (n + 2)
}

/// One flat array per (field x generation), all of length `(n + 2)^2`.
///
/// `*_prev` doubles as solver scratch during a step; `*_source` holds
/// per-step injection rates and is zeroed at the end of every step.
#[derive(Debug, Clone, PartialEq)]
pub struct SimFields {
    pub x_vel: Vec<f64>,
    pub y_vel: Vec<f64>,
    pub dens: Vec<f64>,
    pub temp: Vec<f64>,

    pub x_vel_prev: Vec<f64>,
    pub y_vel_prev: Vec<f64>,
    pub dens_prev: Vec<f64>,
    pub temp_prev: Vec<f64>,

    pub x_vel_source: Vec<f64>,
    pub y_vel_source: Vec<f64>,
    pub dens_source: Vec<f64>,
    pub temp_source: Vec<f64>,
}

impl SimFields {
    pub fn new(size: usize) -> Self {
        Self {
            x_vel: vec![0.0; size],
            y_vel: vec![0.0; size],
            dens: vec![0.0; size],
            temp: vec![0.0; size],
            x_vel_prev: vec![0.0; size],
            y_vel_prev: vec![0.0; size],
            dens_prev: vec![0.0; size],
            temp_prev: vec![0.0; size],
            x_vel_source: vec![0.0; size],
            y_vel_source: vec![0.0; size],
            dens_source: vec![0.0; size],
            temp_source: vec![0.0; size],
        }
    }

    pub(crate) fn clear_sources(&mut self) {
        self.x_vel_source.fill(0.0);
        self.y_vel_source.fill(0.0);
        self.dens_source.fill(0.0);
        self.temp_source.fill(0.0);
    }

    fn zero(&mut self) {
        for field in [
            &mut self.x_vel,
            &mut self.y_vel,
            &mut self.dens,
            &mut self.temp,
            &mut self.x_vel_prev,
            &mut self.y_vel_prev,
            &mut self.dens_prev,
            &mut self.temp_prev,
        ] {
            field.fill(0.0);
        }
        self.clear_sources();
    }
}

/// Simulation state: parameters, field arrays and grid resolution.
pub struct SimState {
    pub(crate) params: SimParams,
    pub(crate) fields: SimFields,
    /// Per-cell diffusion coefficient, refilled before every diffuse call.
    pub(crate) coeff: Vec<f64>,
    n: usize,
    size: usize,
}

impl SimState {
    /// Zeroed `n x n` grid with default parameters.
    pub fn new(n: usize) -> Result<Self> {
        Self::with_params(n, SimParams::default())
    }

    pub fn with_params(n: usize, params: SimParams) -> Result<Self> {
        if n == 0 {
            return Err(SimError::InvalidResolution { n });
        }
        let size = grid_size(n);
        log::info!(
            "simulation grid {n}x{n} ({size} cells), {} relaxation sweeps",
            params.solver_steps
        );
        Ok(Self {
            params,
            fields: SimFields::new(size),
            coeff: vec![0.0; size],
            n,
            size,
        })
    }

    /// Interior resolution N.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Total cell count `(N + 2)^2`.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SimParams) {
        self.params = params;
    }

    pub fn fields(&self) -> &SimFields {
        &self.fields
    }

    pub fn density(&self) -> &[f64] {
        &self.fields.dens
    }

    pub fn x_velocity(&self) -> &[f64] {
        &self.fields.x_vel
    }

    pub fn y_velocity(&self) -> &[f64] {
        &self.fields.y_vel
    }

    /// Temperature excess over `air_temp` (K).
    pub fn temperature(&self) -> &[f64] {
        &self.fields.temp
    }

    /// Density at interior coordinates `(i, j)`, both in `1..=N`.
    pub fn density_at(&self, i: usize, j: usize) -> f64 {
        self.fields.dens[idx(i, j, self.n)]
    }

    /// Copy caller-supplied per-cell rates into the source buffers.
    ///
    /// Every slice is checked before anything is copied, so a mismatched
    /// call leaves the buffers untouched.
    pub fn set_sources(
        &mut self,
        density: &[f64],
        x_velocity: &[f64],
        y_velocity: &[f64],
        temperature: &[f64],
    ) -> Result<()> {
        for (field, data) in [
            ("density", density),
            ("x_velocity", x_velocity),
            ("y_velocity", y_velocity),
            ("temperature", temperature),
        ] {
            if data.len() != self.size {
                return Err(SimError::SizeMismatch {
                    field,
                    expected: self.size,
                    actual: data.len(),
                });
            }
        }
        self.fields.dens_source.copy_from_slice(density);
        self.fields.x_vel_source.copy_from_slice(x_velocity);
        self.fields.y_vel_source.copy_from_slice(y_velocity);
        self.fields.temp_source.copy_from_slice(temperature);
        Ok(())
    }

    /// Advance every field by `dt` seconds and clear the source buffers.
    pub fn simulation_step(&mut self, dt: f64) -> Result<()> {
        solver::simulation_step(self, dt)
    }

    /// Return every field, sources included, to zero.
    pub fn reset(&mut self) {
        self.fields.zero();
    }
}

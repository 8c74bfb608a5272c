/// Physical constants and solver options for the smoke simulation.
///
/// All quantities are SI. The temperature *field* stores the excess over
/// `air_temp`, so `air_temp` is the absolute reference every mixed-field
/// accessor works from.
#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    /// Use state-dependent viscosity/diffusivities instead of the uniform ones.
    pub advanced_coefficients: bool,
    /// Apply the buoyancy force to the vertical velocity.
    pub gravity_on: bool,
    /// Simulate the temperature field at all.
    pub temperature_on: bool,
    /// Relaxation sweeps for every iterative solve (diffusion and projection).
    pub solver_steps: usize,

    /// Width of the square domain in metres.
    pub length_scale: f64,
    /// Kinematic viscosity (m^2/s).
    pub visc: f64,
    /// Mass diffusivity of the emitted gas (m^2/s).
    pub diff: f64,
    /// Gravitational acceleration (m/s^2).
    pub grav: f64,
    /// Reference air density (kg/m^3).
    pub air_dens: f64,
    /// Ratio of gas molar mass to air molar mass.
    pub mass_ratio: f64,
    /// Ambient air temperature (K).
    pub air_temp: f64,
    /// Thermal diffusivity (m^2/s).
    pub diff_temp: f64,
    /// Exponential decay rate of density (1/s).
    pub dens_decay: f64,
    /// Exponential decay rate of the temperature excess (1/s).
    pub temp_decay: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            advanced_coefficients: false,
            gravity_on: true,
            temperature_on: true,
            solver_steps: 20,
            length_scale: 1.0,
            visc: 1.5e-5,
            diff: 2.0e-5,
            grav: 9.81,
            air_dens: 1.225,
            mass_ratio: 1.0,
            air_temp: 293.15,
            diff_temp: 2.2e-5,
            dens_decay: 0.0,
            temp_decay: 0.0,
        }
    }
}

impl SimParams {
    /// Domain size and transport coefficients; everything else defaulted.
    pub fn new(length_scale: f64, visc: f64, diff: f64) -> Self {
        Self {
            length_scale,
            visc,
            diff,
            ..Self::default()
        }
    }

    pub fn with_buoyancy(mut self, grav: f64, air_dens: f64, mass_ratio: f64) -> Self {
        self.grav = grav;
        self.air_dens = air_dens;
        self.mass_ratio = mass_ratio;
        self
    }

    pub fn with_temperature(mut self, air_temp: f64, diff_temp: f64) -> Self {
        self.air_temp = air_temp;
        self.diff_temp = diff_temp;
        self
    }

    pub fn with_decay(mut self, dens_decay: f64, temp_decay: f64) -> Self {
        self.dens_decay = dens_decay;
        self.temp_decay = temp_decay;
        self
    }

    /// Still-air parameters: no transport coefficients, gravity or decay.
    /// The grid stays exactly where the caller puts it apart from advection.
    pub fn inviscid() -> Self {
        Self {
            gravity_on: false,
            visc: 0.0,
            diff: 0.0,
            diff_temp: 0.0,
            grav: 0.0,
            ..Self::default()
        }
    }

    /// Grid cells per metre for a grid of `n` interior cells.
    pub fn cells_per_metre(&self, n: usize) -> f64 {
        n as f64 / self.length_scale
    }
}

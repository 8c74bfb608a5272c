use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::Result;
use crate::solver::SimParams;
use crate::source::{EmitterId, Shape, Sources};

pub const DEFAULT_PATH: &str = "plume.yaml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interior grid resolution N.
    pub grid: usize,
    pub physics: PhysicsConfig,
    pub run: RunConfig,
    pub emitters: Vec<EmitterConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub advanced_coefficients: bool,
    pub gravity_on: bool,
    pub temperature_on: bool,
    pub solver_steps: usize,
    pub length_scale: f64,
    pub visc: f64,
    pub diff: f64,
    pub grav: f64,
    pub air_dens: f64,
    pub mass_ratio: f64,
    pub air_temp: f64,
    pub diff_temp: f64,
    pub dens_decay: f64,
    pub temp_decay: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub dt: f64,
    pub steps: usize,
    /// Print the density grid every this many steps (0 = only at the end).
    pub print_every: usize,
    /// Display threshold; cells below it render blank.
    pub threshold: f64,
    pub log_level: String,
}

/// One emitter as written in the config file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmitterConfig {
    Gas { shape: Shape, flow_rate: f64, temp: f64, x: f64, y: f64, radius: f64 },
    Wind { shape: Shape, angle: f64, speed: f64, x: f64, y: f64, radius: f64 },
    Heat { shape: Shape, temp: f64, x: f64, y: f64, radius: f64 },
    Energy { shape: Shape, flux: f64, reference_temp: f64, x: f64, y: f64, radius: f64 },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: 48,
            physics: PhysicsConfig::default(),
            run: RunConfig::default(),
            emitters: Vec::new(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let p = SimParams::default();
        Self {
            advanced_coefficients: p.advanced_coefficients,
            gravity_on: p.gravity_on,
            temperature_on: p.temperature_on,
            solver_steps: p.solver_steps,
            length_scale: p.length_scale,
            visc: p.visc,
            diff: p.diff,
            grav: p.grav,
            air_dens: p.air_dens,
            mass_ratio: p.mass_ratio,
            air_temp: p.air_temp,
            diff_temp: p.diff_temp,
            dens_decay: p.dens_decay,
            temp_decay: p.temp_decay,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,
            steps: 100,
            print_every: 25,
            threshold: 0.01,
            log_level: "info".to_string(),
        }
    }
}

impl PhysicsConfig {
    pub fn to_params(&self) -> SimParams {
        SimParams {
            advanced_coefficients: self.advanced_coefficients,
            gravity_on: self.gravity_on,
            temperature_on: self.temperature_on,
            solver_steps: self.solver_steps,
            length_scale: self.length_scale,
            visc: self.visc,
            diff: self.diff,
            grav: self.grav,
            air_dens: self.air_dens,
            mass_ratio: self.mass_ratio,
            air_temp: self.air_temp,
            diff_temp: self.diff_temp,
            dens_decay: self.dens_decay,
            temp_decay: self.temp_decay,
        }
    }
}

impl EmitterConfig {
    /// Create the described emitter in `sources`.
    pub fn register(&self, sources: &mut Sources) -> Result<EmitterId> {
        match *self {
            EmitterConfig::Gas { shape, flow_rate, temp, x, y, radius } => {
                sources.create_gas_source(shape, flow_rate, temp, x, y, radius)
            }
            EmitterConfig::Wind { shape, angle, speed, x, y, radius } => {
                sources.create_wind_source(shape, angle, speed, x, y, radius)
            }
            EmitterConfig::Heat { shape, temp, x, y, radius } => {
                sources.create_heat_source(shape, temp, x, y, radius)
            }
            EmitterConfig::Energy { shape, flux, reference_temp, x, y, radius } => {
                sources.create_energy_source(shape, flux, reference_temp, x, y, radius)
            }
        }
    }
}

/// Why a config file could not be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Parse the config at `path`. A missing file is not an error: it yields defaults.
pub fn read(path: &Path) -> std::result::Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Like `read`, but logs the problem and falls back to defaults.
pub fn load_from(path: &Path) -> Config {
    read(path).unwrap_or_else(|e| {
        log::warn!("{e}; using defaults");
        Config::default()
    })
}

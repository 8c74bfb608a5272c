//! Shaped emitters that write per-step rates into the source buffers.
//!
//! Each emitter resolves its footprint to a fixed list of interior cell
//! indices when it is created. `Sources::update_sources` then only walks
//! those lists, adding each active emitter's contribution; overlapping
//! emitters accumulate.

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::solver::mixed_temperature;
use crate::state::{idx, SimState};

/// Footprint of an emitter around its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned box: |dx| <= r and |dy| <= r.
    Square,
    /// Euclidean disc: dx^2 + dy^2 <= r^2.
    Circle,
    /// L1 ball: |dx| + |dy| <= r.
    Diamond,
}

impl Shape {
    fn contains(self, dx: f64, dy: f64, radius: f64) -> bool {
        match self {
            Shape::Square => dx.abs() <= radius && dy.abs() <= radius,
            Shape::Circle => dx * dx + dy * dy <= radius * radius,
            Shape::Diamond => dx.abs() + dy.abs() <= radius,
        }
    }
}

/// What an emitter injects.
#[derive(Debug, Clone, PartialEq)]
pub enum EmitterKind {
    /// Gas at `flow_rate` kg/m^3/s per cell, carrying heat at `temp` (K).
    Gas { flow_rate: f64, temp: f64 },
    /// Velocity forcing of `speed` toward `angle` degrees (counter-clockwise from +x).
    Wind { angle: f64, speed: f64 },
    /// Fixed heating rate `temp` (K/s).
    Heat { temp: f64 },
    /// Heat exchange of `flux` (1/s) toward `reference_temp` (K).
    Energy { flux: f64, reference_temp: f64 },
}

/// Emitter with its precomputed footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    kind: EmitterKind,
    shape: Shape,
    center: (f64, f64),
    radius: f64,
    active: bool,
    indices: Vec<usize>,
}

impl Emitter {
    /// Active emitter on a grid of `n` interior cells. Center and radius are
    /// in cell units; interior cell centers sit at `1..=n` on both axes.
    pub fn new(n: usize, kind: EmitterKind, shape: Shape, center: (f64, f64), radius: f64) -> Result<Self> {
        let indices = shape_indices(n, shape, center, radius)?;
        Ok(Self {
            kind,
            shape,
            center,
            radius,
            active: true,
            indices,
        })
    }

    pub fn kind(&self) -> &EmitterKind {
        &self.kind
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Linear indices of affected interior cells, in ascending order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    fn inject(&self, state: &mut SimState) {
        let params = &state.params;
        let f = &mut state.fields;
        match self.kind {
            EmitterKind::Gas { flow_rate, temp } => {
                for &ind in &self.indices {
                    let t = mixed_temperature(ind, params, f);
                    f.dens_source[ind] += flow_rate;
                    if params.air_dens > 0.0 {
                        f.temp_source[ind] += flow_rate / params.air_dens * (temp - t);
                    }
                }
            }
            EmitterKind::Wind { angle, speed } => {
                let (sin, cos) = angle.to_radians().sin_cos();
                for &ind in &self.indices {
                    f.x_vel_source[ind] += speed * cos;
                    // Rows grow downward, so "up" is -y
                    f.y_vel_source[ind] -= speed * sin;
                }
            }
            EmitterKind::Heat { temp } => {
                for &ind in &self.indices {
                    f.temp_source[ind] += temp;
                }
            }
            EmitterKind::Energy { flux, reference_temp } => {
                for &ind in &self.indices {
                    let t = mixed_temperature(ind, params, f);
                    f.temp_source[ind] += flux * (reference_temp - t);
                }
            }
        }
    }
}

/// Interior cells whose center lies within `shape` around `center`.
pub fn shape_indices(n: usize, shape: Shape, center: (f64, f64), radius: f64) -> Result<Vec<usize>> {
    let (cx, cy) = center;
    if !(radius.is_finite() && radius > 0.0) {
        return Err(SimError::shape(format!("radius must be positive, got {radius}")));
    }
    let lo = 0.5;
    let hi = n as f64 + 0.5;
    if !(cx >= lo && cx <= hi && cy >= lo && cy <= hi) {
        return Err(SimError::shape(format!(
            "center ({cx}, {cy}) outside grid [{lo}, {hi}]"
        )));
    }

    // Bounding box, clipped to the interior
    let i_lo = (cx - radius).floor().max(1.0) as usize;
    let i_hi = (cx + radius).ceil().min(n as f64) as usize;
    let j_lo = (cy - radius).floor().max(1.0) as usize;
    let j_hi = (cy + radius).ceil().min(n as f64) as usize;

    let mut indices = Vec::new();
    for j in j_lo..=j_hi {
        for i in i_lo..=i_hi {
            if shape.contains(i as f64 - cx, j as f64 - cy, radius) {
                indices.push(idx(i, j, n));
            }
        }
    }
    Ok(indices)
}

/// Stable handle to an emitter in a `Sources` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmitterId(usize);

impl EmitterId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Collection of emitters bound to one grid resolution.
///
/// Removal leaves a vacant slot, so handles never shift.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    n: usize,
    emitters: Vec<Option<Emitter>>,
}

impl Sources {
    /// Empty collection sized for `state`'s grid.
    pub fn new(state: &SimState) -> Self {
        Self::for_grid(state.n())
    }

    pub fn for_grid(n: usize) -> Self {
        Self {
            n,
            emitters: Vec::new(),
        }
    }

    pub fn create_gas_source(
        &mut self,
        shape: Shape,
        flow_rate: f64,
        temp: f64,
        x_center: f64,
        y_center: f64,
        radius: f64,
    ) -> Result<EmitterId> {
        self.add(EmitterKind::Gas { flow_rate, temp }, shape, (x_center, y_center), radius)
    }

    pub fn create_wind_source(
        &mut self,
        shape: Shape,
        angle: f64,
        speed: f64,
        x_center: f64,
        y_center: f64,
        radius: f64,
    ) -> Result<EmitterId> {
        self.add(EmitterKind::Wind { angle, speed }, shape, (x_center, y_center), radius)
    }

    pub fn create_heat_source(
        &mut self,
        shape: Shape,
        temp: f64,
        x_center: f64,
        y_center: f64,
        radius: f64,
    ) -> Result<EmitterId> {
        self.add(EmitterKind::Heat { temp }, shape, (x_center, y_center), radius)
    }

    pub fn create_energy_source(
        &mut self,
        shape: Shape,
        flux: f64,
        reference_temp: f64,
        x_center: f64,
        y_center: f64,
        radius: f64,
    ) -> Result<EmitterId> {
        self.add(EmitterKind::Energy { flux, reference_temp }, shape, (x_center, y_center), radius)
    }

    /// Append an active emitter and return its handle.
    pub fn add(&mut self, kind: EmitterKind, shape: Shape, center: (f64, f64), radius: f64) -> Result<EmitterId> {
        let emitter = Emitter::new(self.n, kind, shape, center, radius)?;
        let id = EmitterId(self.emitters.len());
        log::info!(
            "emitter {} {:?} {:?} at ({}, {}) r={} covers {} cells",
            id.0,
            emitter.kind,
            shape,
            center.0,
            center.1,
            radius,
            emitter.indices.len()
        );
        if emitter.indices.is_empty() {
            log::warn!("emitter {} covers no interior cell", id.0);
        }
        self.emitters.push(Some(emitter));
        Ok(id)
    }

    pub fn get(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.get(id.0).and_then(Option::as_ref)
    }

    pub fn set_active(&mut self, id: EmitterId, active: bool) -> Result<()> {
        match self.emitters.get_mut(id.0).and_then(Option::as_mut) {
            Some(emitter) => {
                emitter.set_active(active);
                Ok(())
            }
            None => Err(SimError::UnknownEmitter(id.0)),
        }
    }

    /// Take an emitter out of the collection; its handle becomes stale.
    pub fn remove(&mut self, id: EmitterId) -> Result<Emitter> {
        self.emitters
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(SimError::UnknownEmitter(id.0))
    }

    /// Live emitters with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (EmitterId, &Emitter)> {
        self.emitters
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EmitterId(i), e)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add every active emitter's contribution to `state`'s source buffers.
    /// Run after `SimState::set_sources` and before `simulation_step`.
    pub fn update_sources(&self, state: &mut SimState) -> Result<()> {
        if state.n() != self.n {
            return Err(SimError::GridMismatch {
                expected: self.n,
                actual: state.n(),
            });
        }
        for (_, emitter) in self.iter().filter(|(_, e)| e.is_active()) {
            emitter.inject(state);
        }
        Ok(())
    }
}

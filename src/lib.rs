//! Stable-fluids smoke, gas and heat simulation on a fixed square grid.
//!
//! A caller builds a [`SimState`], optionally registers shaped emitters in
//! a [`Sources`] arena, and then per update cycle runs
//! [`Sources::update_sources`] followed by [`SimState::simulation_step`],
//! reading fields back through the accessors.

pub mod config;
pub mod display;
pub mod error;
pub mod solver;
pub mod source;
pub mod state;

pub use error::{Result, SimError};
pub use solver::SimParams;
pub use source::{Emitter, EmitterId, EmitterKind, Shape, Sources};
pub use state::{grid_size, idx, SimFields, SimState};

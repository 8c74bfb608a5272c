use thiserror::Error;

/// Result type for every fallible call on the simulation core.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors detected at the call boundary of the simulation core.
///
/// The solver performs no I/O, so none of these are transient: each one
/// describes a caller-supplied value that was rejected before any state
/// was touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid grid resolution: N = {n} (must be at least 1)")]
    InvalidResolution { n: usize },

    #[error("size mismatch for {field}: expected {expected} cells, got {actual}")]
    SizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid time step: dt = {dt} (must be finite and positive)")]
    InvalidTimeStep { dt: f64 },

    #[error("invalid shape parameters: {reason}")]
    InvalidShapeParameters { reason: String },

    #[error("unknown emitter handle {0}")]
    UnknownEmitter(usize),

    #[error("emitters were built for N = {expected}, simulation has N = {actual}")]
    GridMismatch { expected: usize, actual: usize },
}

impl SimError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        SimError::InvalidShapeParameters { reason: reason.into() }
    }
}

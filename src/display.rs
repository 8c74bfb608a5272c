use crate::solver::diagnostics::field_range;
use crate::state::{idx, SimState};

/// Character ramp from faint to dense.
pub(crate) const RAMP: [char; 9] = ['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Render the interior of `field` as text, one line per grid row (row 1 on top).
/// Cells below `minimum` print as a space; the rest map linearly from
/// `minimum` to the field maximum onto `RAMP`.
pub fn render_field(field: &[f64], n: usize, minimum: f64) -> String {
    let (_, max) = field_range(field, n);
    let span = max - minimum;
    let mut out = String::with_capacity(n * (n + 1));
    for j in 1..=n {
        for i in 1..=n {
            let v = field[idx(i, j, n)];
            if v < minimum || !v.is_finite() {
                out.push(' ');
                continue;
            }
            let t = if span > 0.0 { (v - minimum) / span } else { 1.0 };
            let k = ((t * (RAMP.len() - 1) as f64).round() as usize).min(RAMP.len() - 1);
            out.push(RAMP[k]);
        }
        out.push('\n');
    }
    out
}

/// Density view of the simulation for terminal output.
pub fn display_grid(state: &SimState, minimum: f64) -> String {
    render_field(state.density(), state.n(), minimum)
}

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use log::LevelFilter;

use plume::config::{self, Config};
use plume::display::display_grid;
use plume::solver::diagnostics;
use plume::{Shape, SimState, Sources};

fn init_logging(level: &str) {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .or_else(|| level.parse().ok())
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();
}

fn run(cfg: &Config) -> plume::Result<()> {
    let mut state = SimState::with_params(cfg.grid, cfg.physics.to_params())?;
    let mut sources = Sources::new(&state);

    if cfg.emitters.is_empty() {
        // Hot smoke rising from the bottom center
        let n = state.n() as f64;
        let radius = (n / 16.0).max(1.0);
        sources.create_gas_source(Shape::Circle, 1.0, 400.0, (n + 1.0) / 2.0, n - 2.0 * radius, radius)?;
    } else {
        for emitter in &cfg.emitters {
            emitter.register(&mut sources)?;
        }
    }

    let n = state.n();
    for step in 1..=cfg.run.steps {
        sources.update_sources(&mut state)?;
        state.simulation_step(cfg.run.dt)?;

        let last = step == cfg.run.steps;
        if last || (cfg.run.print_every > 0 && step % cfg.run.print_every == 0) {
            let (t_min, t_max) = diagnostics::field_range(state.temperature(), n);
            log::info!(
                "step={} t={:.3} mass={:.4e} KE={:.4e} T=[{:.2}, {:.2}]",
                step,
                step as f64 * cfg.run.dt,
                diagnostics::total(state.density(), n),
                diagnostics::kinetic_energy(state.x_velocity(), state.y_velocity(), n),
                t_min,
                t_max,
            );
            print!("{}", display_grid(&state, cfg.run.threshold));
            println!("{}", "-".repeat(n));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_PATH));
    let (cfg, warning) = match config::read(&path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&cfg.run.log_level);
    if let Some(e) = warning {
        log::warn!("{e}; using defaults");
    }

    match run(&cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

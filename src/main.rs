//! Headless scenario runner
//!
//! Usage: `steerkit [scenario.ron|scenario.json]`. Without an argument the
//! built-in patrol scenario runs.

use std::process::ExitCode;

use steerkit::prelude::*;

/// Ticks between progress lines
const REPORT_EVERY: u32 = 60;

fn run(scenario: &Scenario) -> Result<(), ConfigError> {
    let obstacles = scenario.build_obstacles();
    let mut world = World::new();

    let agent = world.spawn_agent("Agent", scenario.build_agent()?);
    if let Some(target) = &scenario.target {
        let target = world.spawn_drifter("Target", target.position, target.velocity);
        if let Err(e) = world.set_target(agent, target) {
            log::warn!("Could not attach target: {e}");
        }
    }

    log::info!(
        "Running '{}': {} ticks at dt {}, {} obstacles",
        scenario.name,
        scenario.ticks,
        scenario.dt,
        obstacles.len()
    );

    for tick in 1..=scenario.ticks {
        world.update_drifters(scenario.dt);
        world.update_steering(scenario.dt, &obstacles);

        if tick % REPORT_EVERY == 0 {
            if let Ok(agent) = world.get::<Agent>(agent) {
                let state = agent.state();
                log::info!(
                    "tick {tick}: {} pos {:.2?} speed {:.2} waypoint {}",
                    agent.behavior(),
                    state.position(),
                    state.speed(),
                    agent.path().cursor()
                );
            }
        }
    }

    if let Ok(agent) = world.get::<Agent>(agent) {
        let state = agent.state();
        println!(
            "{}: {} ticks, final position {:.3?}, velocity {:.3?}",
            scenario.name,
            scenario.ticks,
            state.position(),
            state.velocity()
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scenario = match std::env::args().nth(1) {
        Some(path) => match Scenario::load(&path) {
            Ok(scenario) => scenario,
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Scenario::patrol(),
    };

    if let Err(e) = run(&scenario) {
        log::error!("Scenario error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

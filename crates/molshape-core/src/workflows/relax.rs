use crate::core::models::ids::GroupId;
use crate::engine::config::RelaxConfig;
use crate::engine::error::EngineError;
use crate::engine::molecule::Molecule;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Vector3;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationResult {
    /// Ticks actually simulated.
    pub ticks: usize,
    /// Simulated seconds, after clamping each tick to the molecule's maximum step.
    pub simulated_time: f64,
    /// Whether the molecule came to rest before the time limit was reached.
    pub settled: bool,
    /// Fastest group speed measured during the last tick.
    pub max_speed: f64,
}

#[instrument(skip_all, name = "relaxation_workflow")]
pub fn run(
    molecule: &mut Molecule,
    config: &RelaxConfig,
    reporter: &ProgressReporter,
) -> Result<RelaxationResult, EngineError> {
    let dt = molecule.effective_time_step(config.time_step);
    let total_ticks = config.ticks_for(dt);
    reporter.report(Progress::RelaxStart {
        total_ticks: total_ticks as u64,
    });
    info!(
        groups = molecule.group_count(),
        total_ticks, dt, "Starting relaxation."
    );

    let mut result = RelaxationResult {
        ticks: 0,
        simulated_time: 0.0,
        settled: false,
        max_speed: 0.0,
    };
    let mut calm_ticks = 0;

    for tick in 1..=total_ticks {
        let before = positions(molecule);
        molecule.update(config.time_step)?;
        let speed = max_speed(molecule, &before, dt);

        result.ticks = tick;
        result.simulated_time += dt;
        result.max_speed = speed;
        reporter.report(Progress::Tick {
            tick: tick as u64,
            max_speed: speed,
        });

        if speed <= config.settle_speed {
            calm_ticks += 1;
        } else {
            calm_ticks = 0;
        }
        if calm_ticks >= config.settle_ticks {
            result.settled = true;
            reporter.report(Progress::Settled { tick: tick as u64 });
            debug!(tick, "Molecule settled.");
            break;
        }
    }

    reporter.report(Progress::RelaxFinish);
    if result.settled {
        info!(
            ticks = result.ticks,
            "Relaxation complete. Molecule settled after {:.3} simulated seconds.",
            result.simulated_time
        );
    } else {
        info!(
            ticks = result.ticks,
            max_speed = result.max_speed,
            "Relaxation stopped at the time limit before the molecule settled."
        );
    }
    Ok(result)
}

fn positions(molecule: &Molecule) -> Vec<(GroupId, Vector3<f64>)> {
    molecule
        .groups()
        .map(|(id, group)| (id, group.position))
        .collect()
}

fn max_speed(molecule: &Molecule, before: &[(GroupId, Vector3<f64>)], dt: f64) -> f64 {
    before
        .iter()
        .filter_map(|(id, old)| molecule.group(*id).map(|g| (g.position - old).norm()))
        .fold(0.0, f64::max)
        / dt
}

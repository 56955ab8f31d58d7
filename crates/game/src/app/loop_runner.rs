use std::process::ExitCode;

use hamlet_engine::run_sim;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        mut scene,
        mut world,
        mut renderer,
    } = app;

    match run_sim(config, scene.as_mut(), &mut world, &mut renderer) {
        Ok(report) => {
            info!(
                ticks_run = report.ticks_run,
                renders_run = report.renders_run,
                stopped_by_scene = report.stopped_by_scene,
                draw_commands = renderer.command_count(),
                "sim_complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "sim_failed");
            ExitCode::FAILURE
        }
    }
}

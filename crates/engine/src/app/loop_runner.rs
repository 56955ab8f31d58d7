use std::time::Instant;

use thiserror::Error;
use tracing::info;

use super::metrics::MetricsAccumulator;
use super::rendering::Renderer;
use super::scene::{Scene, SceneCommand, SceneWorld};

/// Headless fixed-timestep loop settings. The loop never sleeps; ticks
/// run back to back at a fixed simulated `dt`.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    pub target_tps: u32,
    pub max_ticks: u64,
    pub render_every_ticks: u64,
    pub log_every_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_ticks: 600,
            render_every_ticks: 6,
            log_every_ticks: 60,
        }
    }
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("target ticks per second must be positive")]
    ZeroTicksPerSecond,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimReport {
    pub ticks_run: u64,
    pub renders_run: u64,
    pub stopped_by_scene: bool,
}

pub fn run_sim(
    config: SimConfig,
    scene: &mut dyn Scene,
    world: &mut SceneWorld,
    renderer: &mut dyn Renderer,
) -> Result<SimReport, SimError> {
    if config.target_tps == 0 {
        return Err(SimError::ZeroTicksPerSecond);
    }
    let dt_ms = 1000.0 / config.target_tps as f32;

    scene.load(world);
    world.apply_pending();

    let mut metrics = MetricsAccumulator::new(Instant::now());
    let mut report = SimReport::default();

    while report.ticks_run < config.max_ticks {
        let tick_started = Instant::now();
        let command = scene.update(dt_ms, world);
        world.apply_pending();
        report.ticks_run += 1;
        metrics.record_tick(tick_started.elapsed());

        if config.render_every_ticks > 0 && report.ticks_run % config.render_every_ticks == 0 {
            renderer.begin_frame();
            scene.render(world, renderer);
            report.renders_run += 1;
        }

        if config.log_every_ticks > 0 && report.ticks_run % config.log_every_ticks == 0 {
            let snapshot = metrics.snapshot_and_reset(Instant::now());
            info!(
                tick = report.ticks_run,
                entity_count = world.entity_count(),
                tps = snapshot.tps,
                tick_time_ms = snapshot.tick_time_ms,
                "sim_metrics"
            );
        }

        if command == SceneCommand::Stop {
            report.stopped_by_scene = true;
            break;
        }
    }

    scene.unload(world);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use crate::app::rendering::RecordingRenderer;
    use crate::content::ModelLibrary;

    use super::*;

    #[derive(Default)]
    struct CountingScene {
        loads: u32,
        updates: u32,
        unloads: u32,
        last_dt_ms: f32,
        stop_after: Option<u32>,
    }

    impl Scene for CountingScene {
        fn load(&mut self, _world: &mut SceneWorld) {
            self.loads += 1;
        }

        fn update(&mut self, dt_ms: f32, _world: &mut SceneWorld) -> SceneCommand {
            self.updates += 1;
            self.last_dt_ms = dt_ms;
            match self.stop_after {
                Some(stop) if self.updates >= stop => SceneCommand::Stop,
                _ => SceneCommand::None,
            }
        }

        fn render(&mut self, _world: &SceneWorld, _renderer: &mut dyn Renderer) {}

        fn unload(&mut self, _world: &mut SceneWorld) {
            self.unloads += 1;
        }
    }

    fn empty_world() -> SceneWorld {
        SceneWorld::new(ModelLibrary::new())
    }

    #[test]
    fn run_sim_ticks_to_max_and_renders_periodically() {
        let config = SimConfig {
            target_tps: 10,
            max_ticks: 10,
            render_every_ticks: 5,
            log_every_ticks: 0,
        };
        let mut scene = CountingScene::default();
        let mut world = empty_world();
        let mut renderer = RecordingRenderer::new();

        let report =
            run_sim(config, &mut scene, &mut world, &mut renderer).expect("run");
        assert_eq!(report.ticks_run, 10);
        assert_eq!(report.renders_run, 2);
        assert!(!report.stopped_by_scene);
        assert_eq!(scene.loads, 1);
        assert_eq!(scene.updates, 10);
        assert_eq!(scene.unloads, 1);
        assert!((scene.last_dt_ms - 100.0).abs() < 1e-4);
    }

    #[test]
    fn scene_stop_ends_the_run_early() {
        let config = SimConfig {
            target_tps: 60,
            max_ticks: 100,
            render_every_ticks: 0,
            log_every_ticks: 0,
        };
        let mut scene = CountingScene {
            stop_after: Some(3),
            ..CountingScene::default()
        };
        let mut world = empty_world();
        let mut renderer = RecordingRenderer::new();

        let report =
            run_sim(config, &mut scene, &mut world, &mut renderer).expect("run");
        assert_eq!(report.ticks_run, 3);
        assert!(report.stopped_by_scene);
        assert_eq!(scene.unloads, 1);
    }

    #[test]
    fn zero_target_tps_is_rejected() {
        let config = SimConfig {
            target_tps: 0,
            ..SimConfig::default()
        };
        let mut scene = CountingScene::default();
        let mut world = empty_world();
        let mut renderer = RecordingRenderer::new();

        let result = run_sim(config, &mut scene, &mut world, &mut renderer);
        assert!(matches!(result, Err(SimError::ZeroTicksPerSecond)));
    }
}
